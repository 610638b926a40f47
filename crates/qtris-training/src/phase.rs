use serde::{Deserialize, Serialize};

/// Named phases of a training run.
///
/// Phases rotate after a fixed number of games and exist to vary the
/// exploration rate and the status text. The `Genetic` phase is a label
/// only: no genetic optimization runs behind it, a simplification
/// carried over deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Exploration,
    Exploitation,
    Genetic,
}

impl Phase {
    /// Uppercase label used in status text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Phase::Exploration => "EXPLORATION",
            Phase::Exploitation => "EXPLOITATION",
            Phase::Genetic => "GENETIC ALGORITHM",
        }
    }

    /// The phase that follows this one; `Genetic` is terminal.
    #[must_use]
    pub fn next(self) -> Phase {
        match self {
            Phase::Exploration => Phase::Exploitation,
            Phase::Exploitation | Phase::Genetic => Phase::Genetic,
        }
    }
}
