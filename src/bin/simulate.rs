//! Dungeon balance simulator CLI.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # 1000 runs to floor 30
//!   cargo run --bin simulate -- -n 100 -f 10      # 100 runs to floor 10
//!   cargo run --bin simulate -- --seed 42 --json  # Reproducible, with JSON report
//!
//! Engine diagnostics follow `RUST_LOG` (default `warn`).

use crawler::simulator::{run_simulation, SimConfig};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let (config, write_json) = parse_args(&args);

    if config.verbosity >= 1 {
        println!("╔═══════════════════════════════════════════════════════════════╗");
        println!("║              CRAWLER BALANCE SIMULATOR                        ║");
        println!("╚═══════════════════════════════════════════════════════════════╝");
        println!();
        println!("Configuration:");
        println!("  Runs:           {}", config.num_runs);
        println!("  Target Floor:   {}", config.max_floor);
        println!("  Turn Cap:       {}", config.max_turns_per_fight);
        if let Some(seed) = config.seed {
            println!("  Seed:           {}", seed);
        }
        println!();
        println!("Running simulation...");
        println!();
    }

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    if write_json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write {}: {}", filename, e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> (SimConfig, bool) {
    let mut config = SimConfig::default();
    let mut write_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-f" | "--max-floor" => {
                if i + 1 < args.len() {
                    config.max_floor = args[i + 1].parse().unwrap_or(30);
                    i += 1;
                }
            }
            "-t" | "--turns" => {
                if i + 1 < args.len() {
                    config.max_turns_per_fight = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
            }
            "--json" => {
                write_json = true;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {} (see --help)", other);
            }
        }
        i += 1;
    }

    (config, write_json)
}

fn print_help() {
    println!("Crawler Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>        Number of simulated runs (default: 1000)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    -f, --max-floor <F>   Floor that counts as a full clear (default: 30)");
    println!("    -t, --turns <T>       Turns before the bot flees a fight (default: 200)");
    println!("    -v, --verbose         Print every run");
    println!("    -q, --quiet           Only print the report");
    println!("        --json            Also write sim_report_<timestamp>.json");
    println!("    -h, --help            Show this help");
}
