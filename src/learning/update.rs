//! Temporal-difference update rule

use super::evaluator::Transition;
use super::table::ValueTable;

/// Step size and discount for the Q-learning update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateRule {
    pub learning_rate: f64,
    pub discount_factor: f64,
}

impl UpdateRule {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self { learning_rate, discount_factor }
    }

    /// The new estimate for a cell, without writing it
    pub fn target(&self, current: f64, reward: f64, next_best: f64) -> f64 {
        current + self.learning_rate * (reward + self.discount_factor * next_best - current)
    }

    /// Fold a transition into the table, bootstrapping from the row of the
    /// transformed byte. Writes exactly one cell and returns its new value,
    /// or `None` if the transition's action is not a table column.
    pub fn apply(&self, table: &mut ValueTable, transition: &Transition) -> Option<f64> {
        let current = table.get(transition.state, transition.action)?;
        let next_best = table.best_value(transition.transformed);
        let updated = self.target(current, transition.reward, next_best);
        table.set(transition.state, transition.action, updated)?;
        Some(updated)
    }
}
