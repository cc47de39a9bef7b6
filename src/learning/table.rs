//! Value table - dense (state, action) -> estimate storage

use crate::types::{Action, ActionSet, State, STATE_COUNT};

/// Dense table of value estimates, one row per byte state and one column
/// per action in the run's action set.
///
/// Starts at zero and never changes shape.
#[derive(Debug, Clone)]
pub struct ValueTable {
    actions: ActionSet,
    values: Vec<f64>,
}

impl ValueTable {
    pub fn new(actions: ActionSet) -> Self {
        let values = vec![0.0; STATE_COUNT * actions.len()];
        Self { actions, values }
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    fn row(&self, state: State) -> &[f64] {
        let width = self.actions.len();
        let start = state as usize * width;
        &self.values[start..start + width]
    }

    fn cell(&self, state: State, action: Action) -> Option<usize> {
        self.actions
            .index_of(action)
            .map(|col| state as usize * self.actions.len() + col)
    }

    /// Estimate for a pair, or `None` if the action is not in the set
    pub fn get(&self, state: State, action: Action) -> Option<f64> {
        self.cell(state, action).map(|i| self.values[i])
    }

    /// Overwrite one estimate. Returns the previous value, or `None` (and
    /// writes nothing) if the action is not in the set.
    pub fn set(&mut self, state: State, action: Action, value: f64) -> Option<f64> {
        let i = self.cell(state, action)?;
        Some(std::mem::replace(&mut self.values[i], value))
    }

    /// Highest estimate in a state's row
    pub fn best_value(&self, state: State) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the highest estimate; the first listed action wins ties
    pub fn best_action(&self, state: State) -> Action {
        let mut best = 0;
        let row = self.row(state);
        for (col, value) in row.iter().enumerate().skip(1) {
            if *value > row[best] {
                best = col;
            }
        }
        // the set is never empty, so column 0 always exists
        self.actions.get(best).unwrap_or(Action::ALL[0])
    }

    /// Raw values, row-major by state
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
