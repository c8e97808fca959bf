//! Report rendering modules.
//!
//! This module renders the aggregated benchmark view and the submission
//! status check as Markdown or JSON.

pub mod generator;

pub use generator::*;
