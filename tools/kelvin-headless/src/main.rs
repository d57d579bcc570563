//! kelvin-headless: run the simulation without a front end.
//!
//! Usage:
//!   kelvin-headless run --ticks 120 --seed 7 --generate 12
//!   kelvin-headless run --config sim.json --commands orders.json --json

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use kelvin_core::commands::Command;
use kelvin_sim::world_setup::{self, LocalCluster};
use kelvin_sim::{SimConfig, SimulationEngine};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kelvin_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "kelvin-headless: light-speed fleet simulation driver\n\
         \n\
         Commands:\n\
         \n\
         run       Build the local cluster, send each side's fleet at the\n\
                   other's home and print the Federation log\n\
         \n\
           --ticks <N>        Ticks to run (default: 120)\n\
           --seed <N>         RNG seed, overrides the config file\n\
           --generate <N>     Add N random stars around the cluster\n\
           --config <path>    SimConfig as JSON (missing fields use defaults)\n\
           --commands <path>  JSON array of commands executed before the first tick\n\
           --tick-ms <N>      Wall-clock milliseconds per tick (default: 0, as fast as possible)\n\
           --json             Print the final world snapshot as JSON\n\
         \n\
         Logging is controlled with RUST_LOG (default: kelvin_sim=info).\n"
    );
}

fn parse_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            match args[i + 1].parse::<T>() {
                Ok(value) => return Some(value),
                Err(_) => {
                    eprintln!("Error: invalid value for {flag}: {}", args[i + 1]);
                    process::exit(1);
                }
            }
        }
    }
    None
}

fn parse_path(args: &[String], flag: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn load_config(path: &Path) -> SimConfig {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn load_commands(path: &Path) -> Vec<Command> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(commands) => commands,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            process::exit(1);
        }
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let mut config = parse_path(args, "--config")
        .map(|path| load_config(&path))
        .unwrap_or_default();
    if let Some(seed) = parse_value(args, "--seed") {
        config.seed = seed;
    }
    let ticks: u64 = parse_value(args, "--ticks").unwrap_or(120);
    let generate: usize = parse_value(args, "--generate").unwrap_or(0);
    let tick_ms: u64 = parse_value(args, "--tick-ms").unwrap_or(0);

    let mut engine = SimulationEngine::new(config);
    let cluster = match world_setup::setup_local_cluster(&mut engine) {
        Ok(cluster) => cluster,
        Err(e) => {
            eprintln!("Error building local cluster: {e}");
            process::exit(1);
        }
    };
    if generate > 0 {
        if let Err(e) = world_setup::generate_cluster(&mut engine, generate) {
            eprintln!("Error generating cluster: {e}");
            process::exit(1);
        }
    }

    issue_opening_orders(&mut engine, &cluster);
    if let Some(path) = parse_path(args, "--commands") {
        for command in load_commands(&path) {
            match engine.execute(command.clone()) {
                Ok(outcome) => info!(?outcome, "command applied"),
                Err(e) => warn!(?command, error = %e, "command rejected"),
            }
        }
    }

    info!(
        ticks,
        stars = engine.graph().len(),
        fleets = engine.fleets().len(),
        "simulation starting"
    );
    run_loop(&mut engine, ticks, Duration::from_millis(tick_ms));

    if let Some(federation) = engine.observer(cluster.federation) {
        println!("{} log at tick {}:", federation.name, engine.time().tick);
        for entry in federation.log() {
            println!("  [{:>4}] {}", entry.tick, entry.message);
        }
    }

    if has_flag(args, "--json") {
        match serde_json::to_string_pretty(&engine.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        }
    }
}

/// Each side sends its home fleet at the other's home star.
fn issue_opening_orders(engine: &mut SimulationEngine, cluster: &LocalCluster) {
    let orders = [
        (
            cluster.federation_fleet,
            cluster.sol,
            cluster.epsilon_eridani,
            cluster.federation,
        ),
        (
            cluster.hegemony_fleet,
            cluster.epsilon_eridani,
            cluster.sol,
            cluster.hegemony,
        ),
    ];
    for (fleet, from, to, by) in orders {
        if let Err(e) = engine.issue_move_order(fleet, from, to, by) {
            warn!(fleet = %fleet, error = %e, "opening order rejected");
        }
    }
}

/// Fixed-cadence loop. A zero period runs flat out.
fn run_loop(engine: &mut SimulationEngine, ticks: u64, period: Duration) {
    let mut next_tick_time = Instant::now();

    for _ in 0..ticks {
        if let Err(e) = engine.tick() {
            eprintln!("Error at tick {}: {e}", engine.time().tick + 1);
            process::exit(1);
        }

        if period.is_zero() {
            continue;
        }
        next_tick_time += period;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > period * 2 {
            // Fell behind; don't try to catch up.
            next_tick_time = now;
        }
    }
}
