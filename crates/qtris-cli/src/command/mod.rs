use clap::{Parser, Subcommand};
use qtris_training::EpisodeConfig;

use self::{demo::DemoArg, train::TrainArg};

mod demo;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train an agent and report per-episode progress
    Train(#[clap(flatten)] TrainArg),
    /// Train an agent, then render its greedy demonstration play
    Demo(#[clap(flatten)] DemoArg),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum AgentArg {
    /// Q-table agent, 100-episode preset
    #[default]
    Tabular,
    /// Double-DQN agent, 1000-episode preset
    Dqn,
}

impl AgentArg {
    pub(crate) fn preset(self, seed: u64) -> EpisodeConfig {
        match self {
            AgentArg::Tabular => EpisodeConfig::tabular_demo(seed),
            AgentArg::Dqn => EpisodeConfig::dqn_demo(seed),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Train(TrainArg::default())) {
        Mode::Train(arg) => train::run(&arg),
        Mode::Demo(arg) => demo::run(&arg),
    }
}
