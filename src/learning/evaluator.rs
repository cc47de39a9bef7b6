//! Step evaluator - apply a transform, undo it, check the round trip, score it

use tracing::warn;

use crate::transform::{ByteTransforms, TransformSet};
use crate::types::{Action, State};

/// Whether the inverse recovered the original byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTrip {
    Verified(u8),
    /// The inverse produced this byte instead of the original
    Failed { got: u8 },
}

impl RoundTrip {
    /// The recovered byte, or `None` when the round trip failed
    pub fn recovered(&self) -> Option<u8> {
        match self {
            RoundTrip::Verified(v) => Some(*v),
            RoundTrip::Failed { .. } => None,
        }
    }
}

/// One observed step, consumed by the update rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: State,
    pub action: Action,
    /// Also the bootstrap state for the update
    pub transformed: u8,
    pub round_trip: RoundTrip,
    pub reward: f64,
}

/// Larger distance from the original scores higher
pub fn reward(original: u8, transformed: u8) -> f64 {
    original.abs_diff(transformed) as f64
}

#[derive(Debug, Clone, Default)]
pub struct StepEvaluator<T: TransformSet = ByteTransforms> {
    transforms: T,
}

impl<T: TransformSet> StepEvaluator<T> {
    pub fn new(transforms: T) -> Self {
        Self { transforms }
    }

    pub fn evaluate(&self, state: State, action: Action) -> Transition {
        let transformed = self.transforms.transform(action, state);
        let recovered = self.transforms.inverse(action, transformed);

        let round_trip = if recovered == state {
            RoundTrip::Verified(recovered)
        } else {
            warn!(
                "Round trip failed for {}: {} -> {} -> {}",
                action, state, transformed, recovered
            );
            RoundTrip::Failed { got: recovered }
        };

        Transition {
            state,
            action,
            transformed,
            round_trip,
            reward: reward(state, transformed),
        }
    }
}
