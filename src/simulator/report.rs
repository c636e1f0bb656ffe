//! Simulation report generation.

use serde::Serialize;
use std::collections::BTreeMap;

/// What one simulated run achieved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub final_floor: u32,
    pub final_level: u32,
    pub final_gold: u32,
    pub kills: u32,
    pub elite_kills: u32,
    pub flees: u32,
    pub rests: u32,
    pub purchases: u32,
    pub items_found: u32,
    pub skills_learned: u32,
    pub shards: u64,
    pub died: bool,
    pub reached_target: bool,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub target_floor: u32,
    pub runs_reached_target: u32,
    pub runs_died: u32,

    pub avg_final_floor: f64,
    pub avg_final_level: f64,
    pub avg_kills: f64,
    pub avg_elite_kills: f64,
    pub avg_final_gold: f64,
    pub avg_items_found: f64,
    pub avg_shards: f64,

    /// Runs ending on each floor
    pub floor_distribution: BTreeMap<u32, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn average(runs: &[RunStats], f: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(f).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, target_floor: u32) -> Self {
        let mut floor_distribution = BTreeMap::new();
        for run in &runs {
            *floor_distribution.entry(run.final_floor).or_insert(0) += 1;
        }

        Self {
            num_runs: runs.len() as u32,
            target_floor,
            runs_reached_target: runs.iter().filter(|r| r.reached_target).count() as u32,
            runs_died: runs.iter().filter(|r| r.died).count() as u32,
            avg_final_floor: average(&runs, |r| r.final_floor as f64),
            avg_final_level: average(&runs, |r| r.final_level as f64),
            avg_kills: average(&runs, |r| r.kills as f64),
            avg_elite_kills: average(&runs, |r| r.elite_kills as f64),
            avg_final_gold: average(&runs, |r| r.final_gold as f64),
            avg_items_found: average(&runs, |r| r.items_found as f64),
            avg_shards: average(&runs, |r| r.shards as f64),
            floor_distribution,
            run_stats: runs,
        }
    }

    /// Share of runs that died, in percent.
    pub fn death_rate(&self) -> f64 {
        if self.num_runs == 0 {
            return 0.0;
        }
        self.runs_died as f64 / self.num_runs as f64 * 100.0
    }

    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} reached floor {}, {} died ({:.1}%)\n\n",
            self.num_runs,
            self.runs_reached_target,
            self.target_floor,
            self.runs_died,
            self.death_rate()
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Floor:     {:.1}\n", self.avg_final_floor));
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Kills:           {:.1}\n", self.avg_kills));
        report.push_str(&format!("  Avg Elite Kills:     {:.2}\n\n", self.avg_elite_kills));

        report.push_str("── REWARDS ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Gold:      {:.0}\n", self.avg_final_gold));
        report.push_str(&format!("  Avg Items Found:     {:.1}\n", self.avg_items_found));
        report.push_str(&format!("  Avg Shards:          {:.3}\n\n", self.avg_shards));

        report.push_str("── RUN END FLOOR ────────────────────────────────────────────────\n");
        for (floor, count) in &self.floor_distribution {
            let pct = *count as f64 / self.num_runs.max(1) as f64 * 100.0;
            let bar = "█".repeat((pct / 2.0).round() as usize);
            report.push_str(&format!("  Floor {:>3}: {:>5.1}% {}\n", floor, pct, bar));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
