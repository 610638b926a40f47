use std::collections::VecDeque;

use rand::Rng;

use crate::Transition;

/// Experience buffer with FIFO eviction.
///
/// The name is aspirational: every entry carries a constant priority of
/// `1.0` and sampling is uniform with replacement, which makes this
/// plain experience replay wearing a prioritized-replay interface. The
/// priority field is kept so a real scheme can slot in without touching
/// callers.
#[derive(Debug, Clone)]
pub struct PrioritizedReplay {
    entries: VecDeque<(Transition, f32)>,
    capacity: usize,
}

/// Priority assigned to every stored transition.
const UNIFORM_PRIORITY: f32 = 1.0;

impl PrioritizedReplay {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay capacity must be nonzero");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Stores a transition, evicting the oldest entry when full.
    pub fn push(&mut self, transition: Transition) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((transition, UNIFORM_PRIORITY));
    }

    /// Draws `count` transitions uniformly, with replacement.
    #[must_use]
    pub fn sample<R>(&self, count: usize, rng: &mut R) -> Vec<Transition>
    where
        R: Rng + ?Sized,
    {
        assert!(!self.entries.is_empty(), "cannot sample an empty buffer");
        (0..count)
            .map(|_| self.entries[rng.random_range(0..self.entries.len())].0.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use qtris_engine::{Board, Piece, PieceKind};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use crate::{Action, AgentState};

    use super::*;

    fn transition_with_reward(reward: f32) -> Transition {
        let board = Board::new(10, 20);
        let piece = Piece::spawn(PieceKind::O, 10);
        let features = qtris_features::extract(&board, &piece, 0);
        let state = AgentState::capture(&board, &piece, features);
        Transition {
            state: state.clone(),
            action: Action::Wait,
            reward,
            next_state: state,
            terminal: false,
        }
    }

    #[test]
    fn eviction_is_oldest_first() {
        let mut buffer = PrioritizedReplay::new(3);
        for i in 0..5_u8 {
            buffer.push(transition_with_reward(f32::from(i)));
        }
        assert_eq!(buffer.len(), 3);
        let rewards: Vec<f32> = buffer.entries.iter().map(|(t, _)| t.reward).collect();
        assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn stored_priorities_are_constant() {
        let mut buffer = PrioritizedReplay::new(8);
        buffer.push(transition_with_reward(-100.0));
        buffer.push(transition_with_reward(50.0));
        assert!(buffer.entries.iter().all(|&(_, p)| p == 1.0));
    }

    #[test]
    fn sampling_is_with_replacement() {
        let mut rng = Pcg64Mcg::seed_from_u64(20);
        let mut buffer = PrioritizedReplay::new(8);
        buffer.push(transition_with_reward(7.0));
        // More draws than entries only works with replacement.
        let sampled = buffer.sample(5, &mut rng);
        assert_eq!(sampled.len(), 5);
        assert!(sampled.iter().all(|t| t.reward == 7.0));
    }
}
