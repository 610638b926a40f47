use qtris_agent::{Action, Agent as _, AgentKind, AgentState, PolicyAgent, Transition};
use qtris_engine::{Board, Piece, Playfield};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use serde::Serialize;

use crate::{Phase, reward::placement_reward};

/// Epsilon the run pins when the exploitation phase begins.
const EXPLOITATION_EPSILON: f64 = 0.0001;

/// Multiplicative epsilon decay toward a floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpsilonSchedule {
    pub initial: f64,
    pub decay: f64,
    pub min: f64,
}

impl EpsilonSchedule {
    /// One decay step: `max(min, epsilon × decay)`.
    #[must_use]
    pub fn decayed(&self, epsilon: f64) -> f64 {
        (epsilon * self.decay).max(self.min)
    }
}

/// Everything a host chooses when starting a run.
#[derive(Debug, Clone)]
pub struct EpisodeConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub actions: Vec<Action>,
    pub agent: AgentKind,
    pub epsilon: EpsilonSchedule,
    pub max_episodes: u32,
    pub games_per_phase: u32,
    pub seed: u64,
}

impl EpisodeConfig {
    /// The short tabular run: heavy exploration over a hundred games.
    /// It finishes well inside the first phase, so the per-phase game
    /// count is effectively unreachable.
    #[must_use]
    pub fn tabular_demo(seed: u64) -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            actions: Action::ALL.to_vec(),
            agent: AgentKind::Tabular,
            epsilon: EpsilonSchedule {
                initial: 0.9,
                decay: 0.995,
                min: 0.1,
            },
            max_episodes: 100,
            games_per_phase: u32::MAX,
            seed,
        }
    }

    /// The long neural run: a thousand games cycling through the named
    /// phases every five hundred.
    #[must_use]
    pub fn dqn_demo(seed: u64) -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            actions: Action::ALL.to_vec(),
            agent: AgentKind::Dqn,
            epsilon: EpsilonSchedule {
                initial: 0.3,
                decay: 0.9995,
                min: 0.0001,
            },
            max_episodes: 1000,
            games_per_phase: 500,
            seed,
        }
    }
}

/// Mutable run-wide training state, kept explicit rather than ambient.
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    /// Current episode number, starting at 1. Keeps counting through
    /// demonstration games.
    pub episode: u32,
    pub epsilon: f64,
    pub phase: Phase,
    /// Games started since the last phase change.
    pub phase_games: u32,
    /// Score of the episode in progress.
    pub score: u32,
    /// Best episode score seen across the whole run.
    pub best_score: u32,
    /// Lines cleared by the episode in progress.
    pub lines_cleared: u32,
    /// Reward accumulated by the episode in progress.
    pub reward_total: f32,
    /// Training is over; the agent replays greedily, indefinitely.
    pub demonstrating: bool,
}

/// Per-episode record emitted when a game ends, captured before the
/// per-episode counters reset.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub score: u32,
    pub lines_cleared: u32,
    pub reward_total: f32,
    /// Epsilon after this episode's decay step.
    pub epsilon: f64,
    pub phase: Phase,
}

/// What one tick did, for the host to render.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub board: Board,
    pub piece: Piece,
    /// Reward granted this tick; zero unless the tick locked a piece.
    pub reward_delta: f32,
    /// Lines cleared this tick.
    pub lines_cleared: usize,
    /// The tick ended an episode (the lock caused game-over).
    pub episode_ended: bool,
    /// Present exactly when `episode_ended` is true.
    pub summary: Option<EpisodeSummary>,
}

/// The episode controller: owns the field, the agent, and the run
/// state, and advances all three one decision/physics step per tick.
///
/// Single-threaded by construction. The host drives `tick` from its
/// own timer (see [`TickClock`](crate::TickClock)); a tick runs to
/// completion before anything else can observe the run.
#[derive(Debug)]
pub struct TrainingRun {
    config: EpisodeConfig,
    rng: Pcg64Mcg,
    field: Playfield,
    agent: PolicyAgent,
    state: RunState,
    paused: bool,
}

impl TrainingRun {
    /// Starts a new run on episode 1 of the exploration phase.
    ///
    /// # Panics
    ///
    /// Panics if the config carries an empty action set; that is a host
    /// misconfiguration, not a recoverable error.
    #[must_use]
    pub fn new(config: EpisodeConfig) -> Self {
        assert!(!config.actions.is_empty(), "action set must be nonempty");
        let mut rng = Pcg64Mcg::seed_from_u64(config.seed);
        let field = Playfield::new(config.board_width, config.board_height, &mut rng);
        let agent = PolicyAgent::new(config.agent, &mut rng);
        let state = RunState {
            episode: 0,
            epsilon: config.epsilon.initial,
            phase: Phase::Exploration,
            phase_games: 0,
            score: 0,
            best_score: 0,
            lines_cleared: 0,
            reward_total: 0.0,
            demonstrating: false,
        };
        let mut run = Self {
            config,
            rng,
            field,
            agent,
            state,
            paused: false,
        };
        run.start_next_episode();
        run
    }

    #[must_use]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stops ticks from having any effect; episode state is retained.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Drops everything the agent has learned and restarts the run
    /// from episode 1 with the initial epsilon and phase.
    pub fn reset_agent(&mut self) {
        self.agent.reset(&mut self.rng);
        self.state.episode = 0;
        self.state.epsilon = self.config.epsilon.initial;
        self.state.phase = Phase::Exploration;
        self.state.phase_games = 0;
        self.state.best_score = 0;
        self.state.demonstrating = false;
        self.start_next_episode();
    }

    /// One decision/physics step.
    ///
    /// Extracts features, lets the agent pick and apply an action,
    /// gravity-steps the piece, and on collision locks it, clears and
    /// scores rows, rewards, and feeds the transition back to the
    /// agent. A lock that blocks the next spawn (or leaves the top row
    /// occupied) ends the episode.
    pub fn tick(&mut self) -> TickOutcome {
        if self.paused {
            return self.idle_outcome();
        }

        let features = qtris_features::extract(
            self.field.board(),
            self.field.falling_piece(),
            self.state.lines_cleared,
        );
        let state_before =
            AgentState::capture(self.field.board(), self.field.falling_piece(), features);
        let action = self.agent.select_action(
            &state_before,
            self.state.epsilon,
            &self.config.actions,
            &mut self.rng,
        );
        self.apply(action);

        if self.field.try_soft_drop().is_ok() {
            return self.idle_outcome();
        }

        // The gravity step collided: lock, clear, score, reward, learn,
        // and only then hand the field to the successor piece.
        let cleared = self.field.lock_and_clear();
        self.state.score += Board::line_score(cleared);
        // A lock clears at most four rows.
        self.state.lines_cleared += u32::try_from(cleared).unwrap_or(u32::MAX);

        let topped_out = self.field.board().is_top_row_occupied();
        let new_best = self.state.score > self.state.best_score;
        if new_best {
            self.state.best_score = self.state.score;
        }

        let reward = placement_reward(cleared, &features, topped_out, new_best);
        self.state.reward_total += reward;

        // The agent learns from the post-lock state while the locked
        // piece is still current; the successor spawns afterwards.
        let next_features = qtris_features::extract(
            self.field.board(),
            self.field.falling_piece(),
            self.state.lines_cleared,
        );
        let next_state =
            AgentState::capture(self.field.board(), self.field.falling_piece(), next_features);
        self.agent.learn(
            Transition {
                state: state_before,
                action,
                reward,
                next_state,
                terminal: topped_out,
            },
            &mut self.rng,
        );

        let spawn_blocked = self.field.spawn_next(&mut self.rng);
        let game_over = topped_out || spawn_blocked;

        let summary = game_over.then(|| self.finish_episode());
        TickOutcome {
            board: self.field.board().clone(),
            piece: *self.field.falling_piece(),
            reward_delta: reward,
            lines_cleared: cleared,
            episode_ended: game_over,
            summary,
        }
    }

    /// Host-facing progress line.
    #[must_use]
    pub fn status_text(&self) -> String {
        if self.state.demonstrating {
            "Demonstration Mode: Watch the trained agent play!".to_owned()
        } else {
            format!(
                "{} Phase - Episode {}/{} - Epsilon: {:.4}",
                self.state.phase.label(),
                self.state.episode,
                self.config.max_episodes,
                self.state.epsilon,
            )
        }
    }

    fn apply(&mut self, action: Action) {
        // Rejected moves self-revert, so failures are simply ignored.
        match action {
            Action::Left => {
                let _ = self.field.try_move_left();
            }
            Action::Right => {
                let _ = self.field.try_move_right();
            }
            Action::Rotate => {
                let _ = self.field.try_rotate();
            }
            Action::Drop => self.field.hard_drop(),
            Action::Wait => {}
        }
    }

    fn idle_outcome(&self) -> TickOutcome {
        TickOutcome {
            board: self.field.board().clone(),
            piece: *self.field.falling_piece(),
            reward_delta: 0.0,
            lines_cleared: 0,
            episode_ended: false,
            summary: None,
        }
    }

    /// Closes out the finished episode (epsilon decay, demonstration
    /// handoff) and starts the next one. Returns the summary of the
    /// episode that just ended.
    fn finish_episode(&mut self) -> EpisodeSummary {
        if self.state.demonstrating {
            self.state.epsilon = 0.0;
        } else {
            self.state.epsilon = self.config.epsilon.decayed(self.state.epsilon);
            if self.state.episode >= self.config.max_episodes {
                self.state.demonstrating = true;
                self.state.epsilon = 0.0;
            }
        }
        let summary = EpisodeSummary {
            episode: self.state.episode,
            score: self.state.score,
            lines_cleared: self.state.lines_cleared,
            reward_total: self.state.reward_total,
            epsilon: self.state.epsilon,
            phase: self.state.phase,
        };
        self.start_next_episode();
        summary
    }

    fn start_next_episode(&mut self) {
        self.state.episode += 1;
        self.state.score = 0;
        self.state.lines_cleared = 0;
        self.state.reward_total = 0.0;
        self.field = Playfield::new(
            self.config.board_width,
            self.config.board_height,
            &mut self.rng,
        );

        if self.state.demonstrating {
            return;
        }
        self.state.phase_games += 1;
        if self.state.phase_games >= self.config.games_per_phase {
            self.state.phase_games = 0;
            let next = self.state.phase.next();
            if next != self.state.phase {
                self.state.phase = next;
                if next == Phase::Exploitation {
                    self.state.epsilon = EXPLOITATION_EPSILON;
                }
            }
        }
    }

    #[cfg(test)]
    fn set_field(&mut self, field: Playfield) {
        self.field = field;
    }

    #[cfg(test)]
    fn agent(&self) -> &PolicyAgent {
        &self.agent
    }
}
