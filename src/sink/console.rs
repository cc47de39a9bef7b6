//! Console reporter - periodic progress lines and a final summary

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

use super::ResultSink;
use crate::learning::ResultRecord;
use crate::metrics::RunSummary;

/// Prints every `report_interval`-th record and a closing summary.
///
/// With a visible progress bar attached, the bar is suspended while a line
/// is written. A hidden bar (no terminal) leaves the output untouched.
pub struct ConsoleReporter {
    report_interval: u64,
    progress: Option<ProgressBar>,
    out: Box<dyn Write + Send>,
    summary: bool,
}

impl ConsoleReporter {
    pub fn new(report_interval: u64) -> Self {
        Self {
            report_interval: report_interval.max(1),
            progress: None,
            out: Box::new(std::io::stdout()),
            summary: true,
        }
    }

    /// Write reports somewhere other than stdout
    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Skip the text summary when the run ends
    pub fn without_summary(mut self) -> Self {
        self.summary = false;
        self
    }

    /// Show a progress bar sized for `total` iterations
    pub fn with_progress(mut self, total: u64) -> Self {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.progress = Some(pb);
        self
    }

    /// Whether this record falls on a reporting boundary
    pub fn should_report(&self, iteration: u64) -> bool {
        iteration % self.report_interval == 0
    }

    fn emit(&mut self, line: &str) -> std::io::Result<()> {
        let out = &mut self.out;
        match &self.progress {
            Some(pb) if !pb.is_hidden() => pb.suspend(|| writeln!(out, "{}", line)),
            _ => writeln!(out, "{}", line),
        }
    }
}

/// Two-line progress report for one record
pub fn format_record(record: &ResultRecord) -> String {
    format!(
        "Iteration: {}\n  Original: {}, Action: {}, Transformed: {}\n  Recovered: {}, Reward: {}, Max value: {:.4}",
        record.iteration,
        record.original,
        record.action,
        record.transformed,
        record.recovered_display(),
        record.reward,
        record.best_value,
    )
}

/// Multi-line run summary
pub fn format_summary(summary: &RunSummary) -> String {
    let status = if summary.cancelled {
        "Process interrupted by user."
    } else {
        "Simulation completed."
    };
    let counts: Vec<String> = summary
        .action_counts
        .iter()
        .map(|(action, n)| format!("{}={}", action, n))
        .collect();

    format!(
        "{}\n  Run: {}\n  Iterations: {} ({} ms)\n  Mean reward: {:.2}\n  Round-trip failures: {}\n  Explored: {}\n  Actions: {}",
        status,
        summary.run_id,
        summary.iterations_completed,
        summary.duration_ms(),
        summary.mean_reward(),
        summary.round_trip_failures,
        summary.exploration_count,
        counts.join(", "),
    )
}

impl ResultSink for ConsoleReporter {
    fn accept(&mut self, record: ResultRecord) -> Result<()> {
        if let Some(pb) = &self.progress {
            pb.inc(1);
            pb.set_message(format!("reward {}", record.reward));
        }
        if self.should_report(record.iteration) {
            self.emit(&format_record(&record))?;
        }
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        if self.summary {
            self.emit(&format_summary(summary))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn record(iteration: u64) -> ResultRecord {
        ResultRecord {
            iteration,
            original: 0,
            action: Action::Add,
            transformed: 10,
            recovered: Some(0),
            reward: 10.0,
            best_value: 1.0,
            explored: false,
        }
    }

    #[test]
    fn test_reports_on_interval_boundaries() {
        let reporter = ConsoleReporter::new(10);
        assert!(reporter.should_report(0));
        assert!(!reporter.should_report(9));
        assert!(reporter.should_report(10));
        assert!(ConsoleReporter::new(0).should_report(3));
    }

    #[test]
    fn test_format_record_marks_failure() {
        let record = ResultRecord {
            iteration: 20,
            original: 200,
            action: Action::Xor,
            transformed: 117,
            recovered: None,
            reward: 83.0,
            best_value: 8.3,
            explored: false,
        };
        let text = format_record(&record);
        assert!(text.contains("Iteration: 20"));
        assert!(text.contains("Action: xor"));
        assert!(text.contains("Recovered: FAILED"));
        assert!(text.contains("Max value: 8.3000"));
    }

    #[test]
    fn test_format_summary_status() {
        let mut summary = RunSummary::begin();
        summary.finish(true);
        assert!(format_summary(&summary).starts_with("Process interrupted by user."));
        summary.finish(false);
        assert!(format_summary(&summary).starts_with("Simulation completed."));
    }

    #[test]
    fn test_hidden_progress_bar_still_reports() {
        let buf = SharedBuf::default();
        let mut reporter = ConsoleReporter::new(2).with_output(buf.clone());
        reporter.progress = Some(ProgressBar::hidden());

        for i in 0..4 {
            reporter.accept(record(i)).unwrap();
        }
        let mut summary = RunSummary::begin();
        summary.finish(false);
        reporter.finish(&summary).unwrap();

        let text = buf.text();
        assert!(text.contains("Iteration: 0"));
        assert!(!text.contains("Iteration: 1"));
        assert!(text.contains("Iteration: 2"));
        assert!(text.contains("Simulation completed."));
    }

    #[test]
    fn test_without_summary_writes_no_summary() {
        let buf = SharedBuf::default();
        let mut reporter = ConsoleReporter::new(1).with_output(buf.clone()).without_summary();
        reporter.accept(record(0)).unwrap();

        let mut summary = RunSummary::begin();
        summary.finish(false);
        reporter.finish(&summary).unwrap();

        let text = buf.text();
        assert!(text.contains("Iteration: 0"));
        assert!(!text.contains("Simulation completed."));
    }
}
