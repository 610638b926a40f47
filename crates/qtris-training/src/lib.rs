//! Training-run orchestration.
//!
//! [`TrainingRun`] is the episode controller: it owns the playfield,
//! the agent, and the run-wide state (episode counter, epsilon, phase)
//! and advances everything one step per [`TrainingRun::tick`]. The
//! host drives ticks from a [`TickClock`] and renders the returned
//! [`TickOutcome`] snapshots.
//!
//! ```
//! use qtris_training::{EpisodeConfig, TrainingRun};
//!
//! let mut run = TrainingRun::new(EpisodeConfig::tabular_demo(42));
//! let outcome = run.tick();
//! assert_eq!(outcome.board.width(), 10);
//! ```

pub use self::{phase::*, reward::*, run::*, scheduler::*};

mod phase;
mod reward;
mod run;
mod scheduler;
