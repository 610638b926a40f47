use std::{thread, time::Duration};

use qtris_training::{TickClock, TrainingRun};

use crate::{command::AgentArg, util::render_field};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DemoArg {
    /// Agent variant to train and demonstrate
    #[arg(long, value_enum, default_value = "tabular")]
    agent: AgentArg,
    /// Override the preset training episode count
    #[arg(long)]
    episodes: Option<u32>,
    /// RNG seed for the whole run
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Tick period of the rendered demonstration, in milliseconds
    #[arg(long, default_value_t = 100)]
    period_ms: u64,
    /// Demonstration games to play before exiting
    #[arg(long, default_value_t = 3)]
    games: u32,
}

pub(crate) fn run(arg: &DemoArg) -> anyhow::Result<()> {
    let mut config = arg.agent.preset(arg.seed);
    if let Some(episodes) = arg.episodes {
        config.max_episodes = episodes;
    }

    // Train unthrottled and silently; the demonstration is the show.
    let mut run = TrainingRun::new(config);
    while !run.state().demonstrating {
        run.tick();
    }
    println!("{}", run.status_text());

    let mut clock = TickClock::new(Duration::from_millis(arg.period_ms));
    let mut games_played = 0;
    while games_played < arg.games {
        if !clock.poll() {
            thread::sleep(Duration::from_millis(1));
            continue;
        }
        let outcome = run.tick();
        println!("{}", render_field(&outcome.board, &outcome.piece));
        println!(
            "game {:>2}/{}  score {:>5}  lines {:>3}",
            games_played + 1,
            arg.games,
            run.state().score,
            run.state().lines_cleared,
        );
        if outcome.episode_ended {
            games_played += 1;
        }
    }
    Ok(())
}
