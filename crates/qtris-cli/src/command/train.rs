use std::{thread, time::Duration};

use qtris_training::{TickClock, TrainingRun};

use crate::command::AgentArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Agent variant to train
    #[arg(long, value_enum, default_value = "tabular")]
    agent: AgentArg,
    /// Override the preset episode count
    #[arg(long)]
    episodes: Option<u32>,
    /// RNG seed for the whole run
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Tick period in milliseconds; zero runs unthrottled
    #[arg(long, default_value_t = 0)]
    period_ms: u64,
    /// Emit one JSON record per finished episode instead of text
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let mut config = arg.agent.preset(arg.seed);
    if let Some(episodes) = arg.episodes {
        config.max_episodes = episodes;
    }
    let max_episodes = config.max_episodes;

    let mut run = TrainingRun::new(config);
    let mut clock = TickClock::new(Duration::from_millis(arg.period_ms));
    if !arg.json {
        println!("{}", run.status_text());
    }

    while !run.state().demonstrating {
        if !clock.poll() {
            thread::sleep(Duration::from_millis(1));
            continue;
        }
        let outcome = run.tick();
        let Some(summary) = outcome.summary else {
            continue;
        };
        if arg.json {
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            println!(
                "episode {:>4}/{max_episodes}  score {:>5}  lines {:>3}  reward {:>9.2}  epsilon {:.4}",
                summary.episode,
                summary.score,
                summary.lines_cleared,
                summary.reward_total,
                summary.epsilon,
            );
        }
    }

    if !arg.json {
        println!(
            "training complete; best score {}",
            run.state().best_score
        );
    }
    Ok(())
}
