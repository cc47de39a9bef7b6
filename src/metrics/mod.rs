//! Run metrics
//!
//! Aggregates emitted result records into a per-run summary. The learner
//! never reads these numbers back.

pub mod summary;

pub use summary::RunSummary;
