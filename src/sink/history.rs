//! Bounded history of reward and value points for plotting consumers

use anyhow::Result;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::ResultSink;
use crate::learning::ResultRecord;

/// One plotted point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub iteration: u64,
    pub reward: f64,
    pub best_value: f64,
}

/// Shared read handle on the ring buffer; the oldest points drop first
#[derive(Debug, Clone)]
pub struct History {
    points: Arc<Mutex<VecDeque<HistoryPoint>>>,
    capacity: usize,
}

impl History {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<HistoryPoint>> {
        // a panicked writer leaves whole points behind, never partial ones
        self.points.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, point: HistoryPoint) {
        let mut points = self.lock();
        if points.len() == self.capacity {
            points.pop_front();
        }
        points.push_back(point);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the retained points, oldest first
    pub fn snapshot(&self) -> Vec<HistoryPoint> {
        self.lock().iter().copied().collect()
    }

    pub fn latest(&self) -> Option<HistoryPoint> {
        self.lock().back().copied()
    }

    /// Mean reward over the retained window
    pub fn mean_reward(&self) -> Option<f64> {
        let points = self.lock();
        if points.is_empty() {
            return None;
        }
        Some(points.iter().map(|p| p.reward).sum::<f64>() / points.len() as f64)
    }
}

/// Sink that appends every record to a [`History`]
pub struct HistorySink {
    history: History,
}

impl HistorySink {
    pub fn new(capacity: usize) -> Self {
        Self { history: History::new(capacity) }
    }

    /// Handle for readers; stays valid after the sink is moved or dropped
    pub fn history(&self) -> History {
        self.history.clone()
    }
}

impl ResultSink for HistorySink {
    fn accept(&mut self, record: ResultRecord) -> Result<()> {
        self.history.push(HistoryPoint {
            iteration: record.iteration,
            reward: record.reward,
            best_value: record.best_value,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    fn record(iteration: u64, reward: f64) -> ResultRecord {
        ResultRecord {
            iteration,
            original: 0,
            action: Action::Xor,
            transformed: 0x55,
            recovered: Some(0),
            reward,
            best_value: 0.0,
            explored: false,
        }
    }

    #[test]
    fn test_drops_oldest_beyond_capacity() {
        let mut sink = HistorySink::new(3);
        let history = sink.history();
        for i in 0..5 {
            sink.accept(record(i, i as f64)).unwrap();
        }
        let iterations: Vec<u64> = history.snapshot().iter().map(|p| p.iteration).collect();
        assert_eq!(iterations, vec![2, 3, 4]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.capacity(), 3);
        assert_eq!(history.mean_reward(), Some(3.0));
        assert_eq!(history.latest().map(|p| p.iteration), Some(4));
    }

    #[test]
    fn test_empty_history() {
        let history = HistorySink::new(4).history();
        assert!(history.is_empty());
        assert_eq!(history.mean_reward(), None);
        assert_eq!(history.latest(), None);
    }
}
