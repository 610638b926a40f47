use rand::Rng;

use crate::{
    Action, Agent, AgentState, PrioritizedReplay, Transition, greedy_action, network::ValueNetwork,
    random_action,
};

/// Hidden layer widths of the value estimator.
const HIDDEN_LAYERS: [usize; 2] = [32, 32];
/// Discount applied to the bootstrapped target value.
const DISCOUNT: f32 = 0.999;
/// Transitions drawn per training step.
const BATCH_SIZE: usize = 128;
/// Replay buffer capacity before FIFO eviction starts.
const REPLAY_CAPACITY: usize = 30_000;
/// Target network resyncs after this many stored transitions.
const SYNC_INTERVAL: usize = 200;

/// Simplified Double-DQN over the six-feature vector.
///
/// Two copies of the same [`ValueNetwork`]: the primary picks actions
/// and trains every step, the target supplies stable bootstrap values
/// and only catches up every [`SYNC_INTERVAL`] stored transitions.
/// Action selection for the bootstrap uses the primary (the Double-DQN
/// decoupling); valuation uses the target.
#[derive(Debug, Clone)]
pub struct DqnAgent {
    primary: ValueNetwork,
    target: ValueNetwork,
    replay: PrioritizedReplay,
    stored_since_sync: usize,
}

impl DqnAgent {
    #[must_use]
    pub fn new<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let primary = ValueNetwork::new(6, &HIDDEN_LAYERS, Action::COUNT, rng);
        let mut target = ValueNetwork::new(6, &HIDDEN_LAYERS, Action::COUNT, rng);
        target.copy_weights_from(&primary);
        Self {
            primary,
            target,
            replay: PrioritizedReplay::new(REPLAY_CAPACITY),
            stored_since_sync: 0,
        }
    }

    /// Transitions currently held in the replay buffer.
    #[must_use]
    pub fn replay_len(&self) -> usize {
        self.replay.len()
    }

    fn action_values(&self, state: &AgentState) -> [f32; Action::COUNT] {
        let output = self.primary.forward(&state.features().as_array());
        let mut values = [0.0; Action::COUNT];
        values.copy_from_slice(&output);
        values
    }

    fn train_batch<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for transition in self.replay.sample(BATCH_SIZE, rng) {
            let input = transition.state.features().as_array();
            let target_value = if transition.terminal {
                transition.reward
            } else {
                let next_input = transition.next_state.features().as_array();
                let primary_next = self.primary.forward(&next_input);
                let best = argmax(&primary_next);
                transition.reward + DISCOUNT * self.target.forward(&next_input)[best]
            };
            self.primary
                .nudge(&input, transition.action.index(), target_value, rng);
        }
    }
}

impl Agent for DqnAgent {
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
        greedy_action(actions, &self.action_values(state))
    }

    fn learn<R>(&mut self, transition: Transition, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.replay.push(transition);
        if self.replay.len() >= BATCH_SIZE {
            self.train_batch(rng);
        }
        self.stored_since_sync += 1;
        if self.stored_since_sync >= SYNC_INTERVAL {
            self.target.copy_weights_from(&self.primary);
            self.stored_since_sync = 0;
        }
    }

    fn reset<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.primary = ValueNetwork::new(6, &HIDDEN_LAYERS, Action::COUNT, rng);
        self.target.copy_weights_from(&self.primary);
        self.replay.clear();
        self.stored_since_sync = 0;
    }
}

fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}
