//! Tabular Q-learning over byte transforms
//!
//! A value table scores each (byte, action) pair, an epsilon-greedy policy
//! reads it, the step evaluator applies and checks a transform, and the
//! update rule folds the outcome back into exactly one table cell.

pub mod table;
pub mod policy;
pub mod evaluator;
pub mod update;
pub mod record;
pub mod learner;

pub use table::ValueTable;
pub use policy::{Policy, Choice};
pub use evaluator::{StepEvaluator, Transition, RoundTrip, reward};
pub use update::UpdateRule;
pub use record::ResultRecord;
pub use learner::{Learner, LearningParams};
