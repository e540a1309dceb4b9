//! Source module
//!
//! Sources are the only collaborator of the paginator. A source returns up to
//! `limit` items at or before a parameter value, sorted by that parameter,
//! and can report the parameter of any item it returned.
//!
//! # Provided sources
//!
//! - [`MemorySource`] - sorted in-memory list keyed by a closure
//! - [`RecordSource`] - JSON records keyed by a field path

mod memory;
mod records;
mod types;

pub use memory::{MemorySource, SortDirection};
pub use records::{extract_path, ParamKind, Record, RecordFormat, RecordKey, RecordSource};
pub use types::{AsyncSource, Source};
