// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # adaptive-pager
//!
//! Adaptive-batch pagination over data sources that can only be queried in
//! bounded chunks sorted by a comparable key.
//!
//! ## Features
//!
//! - **Lazy iteration**: chunking is hidden behind `Iterator` / `Stream`
//! - **Adaptive batches**: the batch size doubles while fetches return only
//!   duplicates and resets after fresh progress
//! - **Order inference**: ascending or descending sources, detected from the data
//! - **Bounded payloads**: optional ceiling on the batch size, with skipping
//!   past runs of equal parameters longer than the ceiling
//! - **Blocking and async sources**
//!
//! ## Quick Start
//!
//! ```rust
//! use adaptive_pager::{MemorySource, Paginator};
//!
//! let mut source = MemorySource::new(|item: &(u32, char)| item.0);
//! source.extend([(1, 'A'), (2, 'B'), (2, 'C'), (3, 'D'), (4, 'E')]);
//!
//! let paginator = Paginator::with_max_limit(source, 3, 12)?;
//! for item in paginator {
//!     let (weight, label) = item?;
//!     println!("{weight} {label}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │          Paginator (Iterator) / AsyncPaginator (Stream)  │
//! │         has_next() → bool     next_item() → T            │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┴─────────────────────────────┐
//! │                        FetchWindow                       │
//! │  cursor │ limit doubling │ order hint │ seen set │ buffer│
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┴─────────────────────────────┐
//! │               Source / AsyncSource (caller)              │
//! │  fetch(parameter, limit) → Vec<T>   parameter_of(&T) → P │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Limits configuration
pub mod config;

/// Source traits and provided sources
pub mod source;

/// Adaptive paginators
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::PaginatorConfig;
pub use error::{Error, PageError, Result};
pub use pagination::{AsyncPaginator, Paginator, PaginatorState, PaginatorStats, ParameterOrder};
pub use source::{AsyncSource, MemorySource, Source};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
