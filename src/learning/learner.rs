//! Learner - the value table together with the rules that read and write it

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::evaluator::StepEvaluator;
use super::policy::Policy;
use super::record::ResultRecord;
use super::table::ValueTable;
use super::update::UpdateRule;
use crate::transform::{ByteTransforms, TransformSet};
use crate::types::{ActionSet, State};

/// Validated learning constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningParams {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub explore_rate: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            explore_rate: 0.1,
        }
    }
}

/// Single owner of the value table.
///
/// The policy only reads the table; the update rule is the only writer and
/// runs once per step.
pub struct Learner<T: TransformSet = ByteTransforms, R: Rng = ChaCha8Rng> {
    table: ValueTable,
    policy: Policy<R>,
    evaluator: StepEvaluator<T>,
    rule: UpdateRule,
    explore_rate: f64,
}

impl Learner<ByteTransforms, ChaCha8Rng> {
    /// Learner over the standard transforms with a seeded policy
    pub fn seeded(actions: ActionSet, params: LearningParams, seed: u64) -> Self {
        Self::new(actions, params, StepEvaluator::default(), Policy::seeded(seed))
    }
}

impl<T: TransformSet, R: Rng> Learner<T, R> {
    pub fn new(
        actions: ActionSet,
        params: LearningParams,
        evaluator: StepEvaluator<T>,
        policy: Policy<R>,
    ) -> Self {
        Self {
            table: ValueTable::new(actions),
            policy,
            evaluator,
            rule: UpdateRule::new(params.learning_rate, params.discount_factor),
            explore_rate: params.explore_rate,
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn explore_rate(&self) -> f64 {
        self.explore_rate
    }

    /// Select, evaluate, update, and describe one step
    pub fn step(&mut self, iteration: u64, state: State) -> ResultRecord {
        let choice = self.policy.choose(&self.table, state, self.explore_rate);
        let transition = self.evaluator.evaluate(state, choice.action);

        if self.rule.apply(&mut self.table, &transition).is_none() {
            // policy only returns actions from the table's own set
            debug!("No table column for {}, skipping update", transition.action);
        }

        let best_value = self.table.best_value(transition.transformed);
        debug!(
            iteration,
            state,
            action = %transition.action,
            transformed = transition.transformed,
            reward = transition.reward,
            explored = choice.explored,
            "step"
        );

        ResultRecord {
            iteration,
            original: state,
            action: transition.action,
            transformed: transition.transformed,
            recovered: transition.round_trip.recovered(),
            reward: transition.reward,
            best_value,
            explored: choice.explored,
        }
    }
}
