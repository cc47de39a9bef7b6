//! Error types
//!
//! Configuration problems are rejected before the loop starts. Round-trip
//! failures are not errors at all: they travel inside the result record.

use thiserror::Error;

use crate::types::Action;

/// An out-of-range or malformed configuration value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("learning_rate must be in (0, 1], got {0}")]
    LearningRate(f64),

    #[error("discount_factor must be in (0, 1], got {0}")]
    DiscountFactor(f64),

    #[error("explore_rate must be in [0, 1], got {0}")]
    ExploreRate(f64),

    #[error("iteration_count must be at least 1")]
    IterationCount,

    #[error("report_interval must be at least 1")]
    ReportInterval,

    #[error("history_capacity must be at least 1")]
    HistoryCapacity,

    #[error("action set is empty")]
    EmptyActionSet,

    #[error("action '{0}' listed more than once")]
    DuplicateAction(Action),

    #[error("unknown action '{0}' (expected one of: xor, add, sub)")]
    UnknownAction(String),
}
