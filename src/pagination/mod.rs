//! Pagination module
//!
//! Adaptive-batch iteration over a [`crate::source::Source`].
//!
//! # Overview
//!
//! A paginator hides chunking from its caller. It asks the source for
//! `base_limit` items at or before its cursor, drops anything already seen,
//! and hands the rest out one by one. When a batch holds nothing new, the
//! batch size doubles (up to `max_limit`) and the fetch is retried at once;
//! after a productive fetch it drops back to `base_limit`. A short batch with
//! nothing new ends the session for good.
//!
//! [`FetchWindow`] holds that logic without doing I/O. [`Paginator`] drives it
//! against a blocking source, [`AsyncPaginator`] against an async one.

mod paginator;
mod stream;
mod types;
mod window;

pub use paginator::Paginator;
pub use stream::AsyncPaginator;
pub use types::{
    FetchRequest, PaginatorState, PaginatorStats, ParameterOrder, Progress,
};
pub use window::FetchWindow;
