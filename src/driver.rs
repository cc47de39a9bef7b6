//! Loop driver - observation in, record out, once per iteration
//!
//! The loop is synchronous. Cancellation is only honoured between
//! iterations, so the value table is always left fully updated.

use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::RunPlan;
use crate::learning::Learner;
use crate::metrics::RunSummary;
use crate::sink::ResultSink;
use crate::source::ObservationSource;
use crate::transform::TransformSet;

/// Cooperative stop request shared between the loop and a signal handler
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Runs a learner for a fixed number of iterations
pub struct Driver<T: TransformSet, R: Rng> {
    learner: Learner<T, R>,
    iteration_count: u64,
    step_delay: Duration,
    cancel: CancelToken,
}

impl<T: TransformSet, R: Rng> Driver<T, R> {
    pub fn new(learner: Learner<T, R>, iteration_count: u64) -> Self {
        Self {
            learner,
            iteration_count,
            step_delay: Duration::ZERO,
            cancel: CancelToken::new(),
        }
    }

    /// Take iteration count and pacing from a validated plan
    pub fn from_plan(learner: Learner<T, R>, plan: &RunPlan) -> Self {
        Self::new(learner, plan.iteration_count).with_step_delay(plan.step_delay)
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn learner(&self) -> &Learner<T, R> {
        &self.learner
    }

    pub fn into_learner(self) -> Learner<T, R> {
        self.learner
    }

    /// Run until the iteration count is reached or a stop is requested
    pub fn run(
        &mut self,
        source: &mut dyn ObservationSource,
        sink: &mut dyn ResultSink,
    ) -> RunSummary {
        let mut summary = RunSummary::begin();
        let mut cancelled = false;
        info!(
            "Starting run {} ({} iterations, explore_rate {})",
            summary.run_id,
            self.iteration_count,
            self.learner.explore_rate()
        );

        for iteration in 0..self.iteration_count {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let state = source.next_observation();
            let record = self.learner.step(iteration, state);
            summary.observe(&record);

            if let Err(e) = sink.accept(record) {
                warn!("Result sink error at iteration {}: {}", iteration, e);
            }

            if !self.step_delay.is_zero() {
                std::thread::sleep(self.step_delay);
            }
        }

        summary.finish(cancelled);
        if let Err(e) = sink.finish(&summary) {
            warn!("Result sink failed to finish: {}", e);
        }

        if cancelled {
            info!("Run {} interrupted after {} iterations", summary.run_id, summary.iterations_completed);
        } else {
            info!("Run {} completed: mean reward {:.2}", summary.run_id, summary.mean_reward());
        }
        summary
    }
}
