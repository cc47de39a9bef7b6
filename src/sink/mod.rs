//! Result sinks
//!
//! Sinks receive one record per iteration for display, logging or plotting.
//! A sink error is logged and dropped; it never reaches the learner.

pub mod console;
pub mod history;
pub mod jsonl;

use anyhow::Result;
use tracing::warn;

use crate::learning::ResultRecord;
use crate::metrics::RunSummary;

pub use console::ConsoleReporter;
pub use history::{History, HistoryPoint, HistorySink};
pub use jsonl::JsonlSink;

/// Consumer of per-step result records
#[cfg_attr(test, mockall::automock)]
pub trait ResultSink {
    /// Take ownership of one record
    fn accept(&mut self, record: ResultRecord) -> Result<()>;

    /// Called once after the last iteration
    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}

/// Sink that discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn accept(&mut self, _record: ResultRecord) -> Result<()> {
        Ok(())
    }
}

/// Fans each record out to several sinks, isolating their failures
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<(String, Box<dyn ResultSink + Send>)>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, sink: impl ResultSink + Send + 'static) {
        self.sinks.push((name.into(), Box::new(sink)));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ResultSink for SinkSet {
    fn accept(&mut self, record: ResultRecord) -> Result<()> {
        for (name, sink) in &mut self.sinks {
            if let Err(e) = sink.accept(record.clone()) {
                warn!("Sink '{}' rejected record {}: {}", name, record.iteration, e);
            }
        }
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        for (name, sink) in &mut self.sinks {
            if let Err(e) = sink.finish(summary) {
                warn!("Sink '{}' failed to finish: {}", name, e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    fn record(iteration: u64) -> ResultRecord {
        ResultRecord {
            iteration,
            original: 0,
            action: Action::Add,
            transformed: 10,
            recovered: Some(0),
            reward: 10.0,
            best_value: 0.0,
            explored: false,
        }
    }

    #[test]
    fn test_failing_sink_does_not_starve_others() {
        let mut failing = MockResultSink::new();
        failing
            .expect_accept()
            .times(2)
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        failing.expect_finish().times(1).returning(|_| Err(anyhow::anyhow!("disk full")));

        let history = HistorySink::new(8);
        let handle = history.history();

        let mut set = SinkSet::new();
        set.push("failing", failing);
        set.push("history", history);
        assert_eq!(set.len(), 2);

        assert!(set.accept(record(0)).is_ok());
        assert!(set.accept(record(1)).is_ok());
        assert!(set.finish(&RunSummary::begin()).is_ok());
        assert_eq!(handle.len(), 2);
    }
}
