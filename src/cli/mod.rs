//! CLI module
//!
//! Command-line interface for paging through record files.
//!
//! # Commands
//!
//! - `page` - Page through a JSON/JSONL/YAML record file by one field
//! - `check-config` - Validate a limits configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands, KindArg, OrderArg, PageArgs};
pub use runner::Runner;
