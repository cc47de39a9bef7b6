//! Per-step result records handed to sinks

use serde::{Deserialize, Serialize};

use crate::types::{Action, State};

/// Outcome of one learning step.
///
/// `recovered` is `None` when the round trip failed; the mismatched byte is
/// never reported as if it were a recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub iteration: u64,
    pub original: State,
    pub action: Action,
    pub transformed: u8,
    pub recovered: Option<u8>,
    pub reward: f64,
    /// Highest estimate in the transformed byte's row, after the update
    pub best_value: f64,
    /// Whether the action came from exploration rather than the greedy pick
    pub explored: bool,
}

impl ResultRecord {
    pub fn round_trip_failed(&self) -> bool {
        self.recovered.is_none()
    }

    /// Recovered byte for display, `FAILED` on a round-trip failure
    pub fn recovered_display(&self) -> String {
        self.recovered
            .map(|v| v.to_string())
            .unwrap_or_else(|| "FAILED".to_string())
    }
}
