//! The two interchangeable decision policies.
//!
//! Both agents honour the same contract and callers never branch on
//! which one is active:
//!
//! - [`TabularAgent`] - Q-table keyed by a bounded state string, with a
//!   one-step Q-learning update
//! - [`DqnAgent`] - a simplified Double-DQN imitation: a small
//!   feed-forward value estimator with primary/target copies and a
//!   FIFO replay buffer
//!
//! The closed set is exposed as [`PolicyAgent`]; the shared contract is
//! the [`Agent`] trait (epsilon-greedy selection, per-transition
//! learning, full reset).

pub use self::{dqn::*, replay::*, tabular::*};

mod dqn;
mod network;
mod replay;
mod tabular;

use qtris_engine::{Board, Piece};
use qtris_features::FeatureVector;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The fixed action set, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Move the falling piece one column left.
    Left,
    /// Move the falling piece one column right.
    Right,
    /// Rotate the falling piece 90° clockwise.
    Rotate,
    /// Hard drop: descend until collision, back up one step.
    Drop,
    /// No-op: let the piece fall naturally.
    Wait,
}

impl Action {
    /// All actions in the fixed order used for value indexing and
    /// greedy tie-breaking.
    pub const ALL: [Action; 5] = [
        Action::Left,
        Action::Right,
        Action::Rotate,
        Action::Drop,
        Action::Wait,
    ];

    /// Number of actions in the fixed set.
    pub const COUNT: usize = Self::ALL.len();

    /// Position in the fixed action order.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-tick snapshot of everything an agent may condition on.
///
/// Carries the six-feature vector for the value network and the
/// ingredients of the tabular agent's bounded state key.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    features: FeatureVector,
    table_key: String,
}

/// Board-occupancy serializations longer than this are truncated; the
/// key stays cheap at the cost of aliasing distant board states.
const TABLE_KEY_GRID_LIMIT: usize = 50;

impl AgentState {
    /// Captures the agent-visible state for the current tick.
    #[must_use]
    pub fn capture(board: &Board, piece: &Piece, features: FeatureVector) -> Self {
        let mut grid_key = String::with_capacity(TABLE_KEY_GRID_LIMIT);
        'grid: for row in board.rows() {
            for cell in row {
                if grid_key.len() >= TABLE_KEY_GRID_LIMIT {
                    break 'grid;
                }
                grid_key.push(if cell.is_filled() { '1' } else { '0' });
            }
        }

        let max_height = qtris_features::max_height(board);
        let table_key = format!(
            "{grid_key}_{},{},{}_{}_{}",
            piece.x(),
            piece.y(),
            piece.shape_key(),
            max_height,
            features.holes,
        );

        Self {
            features,
            table_key,
        }
    }

    #[must_use]
    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    /// The bounded serialization used as the tabular agent's lookup key.
    #[must_use]
    pub fn table_key(&self) -> &str {
        &self.table_key
    }
}

/// One experience tuple fed to [`Agent::learn`].
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: AgentState,
    pub action: Action,
    pub reward: f32,
    pub next_state: AgentState,
    pub terminal: bool,
}

/// The shared decision-policy contract.
pub trait Agent {
    /// Epsilon-greedy selection: with probability `epsilon` a uniform
    /// random action from `actions`, otherwise the action with the
    /// highest estimated value (ties go to the first action in the
    /// fixed order).
    fn select_action<R>(
        &mut self,
        state: &AgentState,
        epsilon: f64,
        actions: &[Action],
        rng: &mut R,
    ) -> Action
    where
        R: Rng + ?Sized;

    /// Incorporates one transition.
    fn learn<R>(&mut self, transition: Transition, rng: &mut R)
    where
        R: Rng + ?Sized;

    /// Discards all learned state and replay history, returning the
    /// agent to its initial randomly-initialized condition.
    fn reset<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized;
}

/// Which agent variant an episode runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Tabular,
    Dqn,
}

/// The closed set of agent variants behind the [`Agent`] contract.
#[derive(Debug, Clone)]
pub enum PolicyAgent {
    Tabular(TabularAgent),
    Dqn(DqnAgent),
}

impl PolicyAgent {
    #[must_use]
    pub fn new<R>(kind: AgentKind, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        match kind {
            AgentKind::Tabular => Self::Tabular(TabularAgent::new()),
            AgentKind::Dqn => Self::Dqn(DqnAgent::new(rng)),
        }
    }
}

impl Agent for PolicyAgent {
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
        match self {
            Self::Tabular(agent) => agent.select_action(state, epsilon, actions, rng),
            Self::Dqn(agent) => agent.select_action(state, epsilon, actions, rng),
        }
    }

    fn learn<R>(&mut self, transition: Transition, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Tabular(agent) => agent.learn(transition, rng),
            Self::Dqn(agent) => agent.learn(transition, rng),
        }
    }

    fn reset<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Tabular(agent) => agent.reset(rng),
            Self::Dqn(agent) => agent.reset(rng),
        }
    }
}

/// Uniform random choice from the action set.
pub(crate) fn random_action<R>(actions: &[Action], rng: &mut R) -> Action
where
    R: Rng + ?Sized,
{
    assert!(!actions.is_empty(), "action set must be nonempty");
    actions[rng.random_range(0..actions.len())]
}

/// Greedy choice over `actions` given per-action value estimates in the
/// fixed order; strict comparison keeps the first-encountered action on
/// ties.
pub(crate) fn greedy_action(actions: &[Action], values: &[f32; Action::COUNT]) -> Action {
    assert!(!actions.is_empty(), "action set must be nonempty");
    let mut best = actions[0];
    let mut best_value = values[best.index()];
    for &action in &actions[1..] {
        let value = values[action.index()];
        if value > best_value {
            best = action;
            best_value = value;
        }
    }
    best
}
