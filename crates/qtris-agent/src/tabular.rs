use std::collections::HashMap;

use rand::Rng;

use crate::{Action, Agent, AgentState, Transition, greedy_action, random_action};

/// Step size of the one-step Q-learning update.
const LEARNING_RATE: f32 = 0.1;
/// Discount applied to the bootstrapped next-state value.
const DISCOUNT: f32 = 0.95;
/// Unseen states start with small random values in `[0, 0.1)`.
const INIT_SCALE: f32 = 0.1;

/// Q-table agent over the bounded state key.
///
/// Rows are created lazily the first time a state is looked up, so the
/// table only ever holds states the agent has actually visited.
#[derive(Debug, Clone, Default)]
pub struct TabularAgent {
    q_table: HashMap<String, [f32; Action::COUNT]>,
}

impl TabularAgent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct states the table has seen.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.q_table.len()
    }

    /// Keys of the states the table has seen, for diagnostics.
    pub fn state_keys(&self) -> impl Iterator<Item = &str> {
        self.q_table.keys().map(String::as_str)
    }

    fn row<R>(&mut self, key: &str, rng: &mut R) -> &mut [f32; Action::COUNT]
    where
        R: Rng + ?Sized,
    {
        self.q_table
            .entry(key.to_owned())
            .or_insert_with(|| std::array::from_fn(|_| rng.random::<f32>() * INIT_SCALE))
    }
}

impl Agent for TabularAgent {
    fn select_action<R>(
        &mut self,
        state: &AgentState,
        epsilon: f64,
        actions: &[Action],
        rng: &mut R,
    ) -> Action
    where
        R: Rng + ?Sized,
    {
        if rng.random::<f64>() < epsilon {
            return random_action(actions, rng);
        }
        let values = *self.row(state.table_key(), rng);
        greedy_action(actions, &values)
    }

    fn learn<R>(&mut self, transition: Transition, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let Transition {
            state,
            action,
            reward,
            next_state,
            ..
        } = transition;

        let next_best = self
            .row(next_state.table_key(), rng)
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);

        let row = self.row(state.table_key(), rng);
        let current = row[action.index()];
        row[action.index()] = current + LEARNING_RATE * (reward + DISCOUNT * next_best - current);
    }

    fn reset<R>(&mut self, _rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.q_table.clear();
    }
}
