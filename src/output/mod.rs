//! Output module for persisting harvest results
//!
//! This module handles:
//! - Writing the record set through a `ResultStore`
//! - Recording and printing run statistics

mod json;
pub mod stats;
mod traits;

pub use json::{format_records, JsonFileStore};
pub use stats::{print_summary, RunSummary};
pub use traits::{OutputError, OutputResult, ResultStore};
