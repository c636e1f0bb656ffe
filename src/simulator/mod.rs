//! Balance simulator for Monte Carlo analysis.
//!
//! Plays thousands of seeded runs through the real engine with a simple bot
//! to show how deep runs get, how often they die, and what they earn.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, simulate_single_run};
