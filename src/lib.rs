//! byteq - Tabular Q-learning over reversible byte transforms
//!
//! For every observed byte the learner:
//! - picks a transform (`xor`, `add`, `sub`) with an epsilon-greedy policy
//! - applies it and its inverse, checking that the byte comes back
//! - scores the step by how far the byte moved
//! - folds the outcome into a 256-row value table
//!
//! # Example
//!
//! ```
//! use byteq::learning::{Learner, LearningParams};
//! use byteq::types::ActionSet;
//!
//! let mut learner = Learner::seeded(ActionSet::default(), LearningParams::default(), 42);
//! let record = learner.step(0, 200);
//! assert_eq!(record.recovered, Some(200));
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod error;
pub mod types;
pub mod transform;
pub mod learning;
pub mod config;

// Loop plumbing
pub mod metrics;
pub mod source;
pub mod sink;
pub mod driver;
pub mod cli;

// Re-export commonly used types for convenience
pub use learning::{
    Learner,
    LearningParams,
    ResultRecord,
    ValueTable,
};

pub use config::{Config, RunPlan};
pub use driver::{CancelToken, Driver};
pub use error::ConfigError;
pub use types::{Action, ActionSet, State};
