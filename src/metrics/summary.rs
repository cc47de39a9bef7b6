//! Run summary - aggregate counters over all emitted records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::learning::ResultRecord;
use crate::types::Action;

/// Totals for one run of the loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub iterations_completed: u64,
    pub round_trip_failures: u64,
    pub total_reward: f64,
    pub exploration_count: u64,
    pub action_counts: BTreeMap<Action, u64>,
    /// Highest estimate reported by the last record
    pub last_best_value: Option<f64>,
    /// True when the loop stopped on a cancellation request
    pub cancelled: bool,
}

impl RunSummary {
    pub fn begin() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            finished_at: None,
            iterations_completed: 0,
            round_trip_failures: 0,
            total_reward: 0.0,
            exploration_count: 0,
            action_counts: BTreeMap::new(),
            last_best_value: None,
            cancelled: false,
        }
    }

    /// Fold one record into the totals
    pub fn observe(&mut self, record: &ResultRecord) {
        self.iterations_completed += 1;
        self.total_reward += record.reward;
        if record.round_trip_failed() {
            self.round_trip_failures += 1;
        }
        if record.explored {
            self.exploration_count += 1;
        }
        *self.action_counts.entry(record.action).or_default() += 1;
        self.last_best_value = Some(record.best_value);
    }

    pub fn finish(&mut self, cancelled: bool) {
        self.finished_at = Some(Utc::now());
        self.cancelled = cancelled;
    }

    pub fn mean_reward(&self) -> f64 {
        if self.iterations_completed == 0 {
            0.0
        } else {
            self.total_reward / self.iterations_completed as f64
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds().max(0))
            .unwrap_or(0)
    }
}
