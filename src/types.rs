//! Shared types used across modules
//!
//! This module contains the state and action vocabulary that the
//! transform, learning and reporting modules all speak.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A byte-valued observation. Indexes one row of the value table.
pub type State = u8;

/// Number of distinct states (one per byte value)
pub const STATE_COUNT: usize = 256;

/// A reversible byte transform the learner can choose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Xor,
    Add,
    Sub,
}

impl Action {
    /// Every action in enumeration order
    pub const ALL: [Action; 3] = [Action::Xor, Action::Add, Action::Sub];

    /// Short lowercase name used in config files and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Xor => "xor",
            Action::Add => "add",
            Action::Sub => "sub",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xor" => Ok(Action::Xor),
            "add" => Ok(Action::Add),
            "sub" => Ok(Action::Sub),
            other => Err(ConfigError::UnknownAction(other.to_string())),
        }
    }
}

/// Ordered, non-empty, duplicate-free set of actions fixed for a run.
///
/// The order matters: it is the column order of the value table and the
/// tie-break order for greedy selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet {
    actions: Vec<Action>,
}

impl ActionSet {
    pub fn new(actions: Vec<Action>) -> Result<Self, ConfigError> {
        if actions.is_empty() {
            return Err(ConfigError::EmptyActionSet);
        }
        for (i, action) in actions.iter().enumerate() {
            if actions[..i].contains(action) {
                return Err(ConfigError::DuplicateAction(*action));
            }
        }
        Ok(Self { actions })
    }

    /// Column index of an action, if it belongs to the set
    pub fn index_of(&self, action: Action) -> Option<usize> {
        self.actions.iter().position(|a| *a == action)
    }

    pub fn get(&self, index: usize) -> Option<Action> {
        self.actions.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.iter().copied()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }
}

impl Default for ActionSet {
    fn default() -> Self {
        Self { actions: Action::ALL.to_vec() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!("xor".parse::<Action>().unwrap(), Action::Xor);
        assert_eq!(" ADD ".parse::<Action>().unwrap(), Action::Add);
        assert!(matches!("rot".parse::<Action>(), Err(ConfigError::UnknownAction(_))));
    }

    #[test]
    fn test_action_set_rejects_bad_input() {
        assert_eq!(ActionSet::new(vec![]), Err(ConfigError::EmptyActionSet));
        assert_eq!(
            ActionSet::new(vec![Action::Add, Action::Xor, Action::Add]),
            Err(ConfigError::DuplicateAction(Action::Add))
        );
    }

    #[test]
    fn test_action_set_order() {
        let set = ActionSet::new(vec![Action::Sub, Action::Xor]).unwrap();
        assert_eq!(set.index_of(Action::Sub), Some(0));
        assert_eq!(set.index_of(Action::Xor), Some(1));
        assert_eq!(set.index_of(Action::Add), None);
        assert_eq!(set.get(1), Some(Action::Xor));
    }
}
