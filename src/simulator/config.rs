//! Simulation configuration.

/// Configuration for a batch of simulated runs.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of runs to play
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random). Run `i` uses
    /// `seed + i`, wrapping at `u64::MAX`.
    pub seed: Option<u64>,

    /// A run that reaches this floor counts as a success and stops
    pub max_floor: u32,

    /// Turns after which the bot gives up on a fight and tries to flee
    pub max_turns_per_fight: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            max_floor: 30,
            max_turns_per_fight: 200,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Small reproducible batch for smoke tests.
    pub fn quick(seed: u64) -> Self {
        Self {
            num_runs: 20,
            seed: Some(seed),
            max_floor: 10,
            verbosity: 0,
            ..Default::default()
        }
    }
}
