//! Idle Miner Headless Balance Simulator
//!
//! Runs the tick scheduler without any UI, with a greedy buyer spending
//! coins, and reports how fast the economy grows. Uses the exact same
//! `game_tick()` function as the real game.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --ticks N       Ticks to simulate (default: 36000 = 1 hour game time)
//!   --seed N        RNG seed (default: 42)
//!   --runs N        Number of runs with incrementing seeds (default: 1)
//!   --miners N      Miners owned at the start (default: 1)
//!   --coins N       Starting coins (default: 0)
//!   --no-buy        Disable the greedy buyer
//!   --verbose       Per-tick event logging
//!   --csv FILE      Write time-series CSV
//!   --quiet         Only final summary line

use idle_miner::core::constants::{
    MAX_MAP_EXPANSIONS, MAX_RADIUS_LEVEL, MAX_SPEED_LEVEL, TICK_INTERVAL_MS,
};
use idle_miner::core::game_state::GameState;
use idle_miner::core::tick::{game_tick, TickEvent, TickResult};
use idle_miner::core::upgrades::*;
use idle_miner::mining::Mine;
use idle_miner::resources::{can_increase_ore_generation, Ore, ORE_COUNT};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{self, BufWriter, Write};

const DT_SECONDS: f64 = TICK_INTERVAL_MS as f64 / 1000.0;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    ticks: u64,
    seed: u64,
    runs: u32,
    miners: usize,
    coins: f64,
    buy: bool,
    verbose: bool,
    csv_path: Option<String>,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 36_000,
            seed: 42,
            runs: 1,
            miners: 1,
            coins: 0.0,
            buy: true,
            verbose: false,
            csv_path: None,
            quiet: false,
        }
    }
}

fn value_of<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).and_then(|v| v.parse().ok()) {
        Some(value) => value,
        None => {
            eprintln!("{flag} requires a number");
            std::process::exit(1);
        }
    }
}

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => {
                i += 1;
                config.ticks = value_of(&args, i, "--ticks");
            }
            "--seed" => {
                i += 1;
                config.seed = value_of(&args, i, "--seed");
            }
            "--runs" => {
                i += 1;
                config.runs = value_of(&args, i, "--runs");
            }
            "--miners" => {
                i += 1;
                config.miners = value_of(&args, i, "--miners");
            }
            "--coins" => {
                i += 1;
                config.coins = value_of(&args, i, "--coins");
            }
            "--no-buy" => config.buy = false,
            "--verbose" => config.verbose = true,
            "--csv" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config.csv_path = Some(path.clone()),
                    None => {
                        eprintln!("--csv requires a file path");
                        std::process::exit(1);
                    }
                }
            }
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn print_usage() {
    eprintln!(
        "Idle Miner Headless Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --ticks N       Ticks to simulate (default: 36000 = 1 hour)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --runs N        Number of runs with incrementing seeds (default: 1)\n\
         \x20 --miners N      Miners owned at the start (default: 1)\n\
         \x20 --coins N       Starting coins (default: 0)\n\
         \x20 --no-buy        Disable the greedy buyer\n\
         \x20 --verbose       Per-tick event logging\n\
         \x20 --csv FILE      Write time-series CSV\n\
         \x20 --quiet         Only final summary line\n\
         \x20 --help, -h      Show this help"
    );
}

// ── Simulation Statistics ────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct SimStats {
    total_ticks: u64,
    triggers: u64,
    activations: u64,
    respawns: u64,
    crits: u64,
    chain_reactions: u64,
    chain_hops: u64,
    double_activations: u64,
    budget_exhausted_ticks: u64,
    ores_mined: [u64; ORE_COUNT],
    purchases: u64,
    /// Tick at which the roster first reached each size.
    miner_count_tick: Vec<(usize, u64)>,
    final_coins: f64,
    lifetime_coins: f64,
    final_miners: usize,
    final_side: usize,
}

impl SimStats {
    fn process_tick(&mut self, tick: u64, result: &TickResult, state: &GameState) {
        self.total_ticks = tick + 1;
        self.triggers += u64::from(result.triggers);
        self.activations += u64::from(result.activations);
        self.respawns += u64::from(result.respawns);
        if result.budget_exhausted {
            self.budget_exhausted_ticks += 1;
        }

        for event in &result.events {
            match event {
                TickEvent::TileMined { outcome, .. } => {
                    self.ores_mined[outcome.ore.index()] += u64::from(outcome.units);
                    if outcome.crit {
                        self.crits += 1;
                    }
                }
                TickEvent::ChainReaction { hops, .. } => {
                    self.chain_reactions += 1;
                    self.chain_hops += u64::from(*hops);
                }
                TickEvent::DoubleActivation { extra, .. } => {
                    self.double_activations += u64::from(*extra);
                }
                TickEvent::TileRespawned { .. } => {}
            }
        }

        let owned = state.roster.len();
        if self.miner_count_tick.last().map(|(n, _)| *n) != Some(owned) && owned > 0 {
            self.miner_count_tick.push((owned, tick));
        }
    }

    fn finalize(&mut self, state: &GameState) {
        self.final_coins = state.coins;
        self.lifetime_coins = state.lifetime_coins;
        self.final_miners = state.roster.len();
        self.final_side = state.side();
    }
}

// ── Greedy Buyer ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Purchase {
    Miner,
    Speed(usize),
    Radius(usize),
    OreGeneration(Ore),
    MapExpansion,
}

/// Every purchase currently on offer, with its price.
fn offers(state: &GameState) -> Vec<(f64, Purchase)> {
    let mut offers = Vec::new();
    if !state.roster.is_full() {
        offers.push((miner_cost(state.roster.len()), Purchase::Miner));
    }
    for (i, unit) in state.roster.iter().enumerate() {
        if unit.speed_level < MAX_SPEED_LEVEL {
            offers.push((speed_upgrade_cost(unit.speed_level), Purchase::Speed(i)));
        }
        if unit.radius_level < MAX_RADIUS_LEVEL {
            offers.push((radius_upgrade_cost(unit.radius_level), Purchase::Radius(i)));
        }
    }
    let ores = Ore::LADDER.iter().copied().chain(std::iter::once(Ore::Amethyst));
    for ore in ores {
        if can_increase_ore_generation(&state.resources, ore) {
            if let Some(cost) = ore_generation_cost(state, ore) {
                offers.push((cost, Purchase::OreGeneration(ore)));
            }
        }
    }
    if state.map_expansions < MAX_MAP_EXPANSIONS {
        offers.push((map_expansion_cost(state.map_expansions), Purchase::MapExpansion));
    }
    offers
}

/// Buys the cheapest affordable offer until nothing is affordable.
fn spend_greedily(state: &mut GameState, mine: &mut Mine, rng: &mut ChaCha8Rng) -> u64 {
    let mut bought = 0;
    loop {
        let cheapest = offers(state)
            .into_iter()
            .filter(|(cost, _)| *cost <= state.coins)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        let Some((_, purchase)) = cheapest else {
            return bought;
        };
        let ok = match purchase {
            Purchase::Miner => buy_miner(state),
            Purchase::Speed(i) => buy_miner_speed_upgrade(state, i),
            Purchase::Radius(i) => buy_miner_radius_upgrade(state, i),
            Purchase::OreGeneration(ore) => buy_ore_generation(state, ore),
            Purchase::MapExpansion => buy_map_expansion(state, mine, rng),
        };
        if !ok {
            return bought;
        }
        bought += 1;
    }
}

// ── Core Simulation Loop ─────────────────────────────────────────────

fn run_simulation(config: &SimConfig, seed: u64) -> io::Result<(SimStats, GameState)> {
    let mut state = GameState::new(0);
    state.coins = config.coins.max(0.0);
    let side = state.side();
    state.roster.resize(config.miners, side);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut mine = Mine::generate(state.side(), &state.weights(), &mut rng);
    let mut stats = SimStats::default();

    let mut csv_writer = match &config.csv_path {
        Some(path) => {
            let mut w = BufWriter::new(File::create(path)?);
            writeln!(
                w,
                "tick,game_time_s,coins,lifetime_coins,miners,side,triggers,activations,income_per_s"
            )?;
            Some(w)
        }
        None => None,
    };

    for tick in 0..config.ticks {
        let result = game_tick(&mut state, &mut mine, DT_SECONDS, &mut rng);
        stats.process_tick(tick, &result, &state);

        if config.verbose {
            print_tick_events(tick, &result);
        }

        if config.buy {
            stats.purchases += spend_greedily(&mut state, &mut mine, &mut rng);
        }

        // CSV snapshot every 100 ticks
        if let Some(w) = csv_writer.as_mut() {
            if tick % 100 == 0 {
                writeln!(
                    w,
                    "{},{:.1},{:.0},{:.0},{},{},{},{},{:.3}",
                    tick,
                    tick as f64 * DT_SECONDS,
                    state.coins,
                    state.lifetime_coins,
                    state.roster.len(),
                    state.side(),
                    stats.triggers,
                    stats.activations,
                    estimate_income(&state),
                )?;
            }
        }
    }

    if let Some(w) = csv_writer.as_mut() {
        w.flush()?;
    }

    stats.finalize(&state);
    Ok((stats, state))
}

fn estimate_income(state: &GameState) -> f64 {
    idle_miner::core::estimate_coins_per_second(state)
}

// ── Verbose Output ───────────────────────────────────────────────────

fn print_tick_events(tick: u64, result: &TickResult) {
    for event in &result.events {
        let label = match event {
            TickEvent::TileMined { miner, outcome } => {
                let crit = if outcome.crit { " CRIT" } else { "" };
                format!(
                    "miner {} mined {} x{} for {:.1}{crit}",
                    miner + 1,
                    outcome.ore.name(),
                    outcome.units,
                    outcome.payout
                )
            }
            TickEvent::ChainReaction { miner, source, hops } => {
                format!("miner {} chained {hops} tiles from {source}", miner + 1)
            }
            TickEvent::DoubleActivation { miner, extra } => {
                format!("miner {} double activation +{extra}", miner + 1)
            }
            TickEvent::TileRespawned { tile, ore, .. } => {
                format!("tile {tile} respawned as {}", ore.name())
            }
        };
        println!("[t={tick:>6}] {label}");
    }
}

// ── Output ───────────────────────────────────────────────────────────

fn ticks_to_time(ticks: u64) -> String {
    let total_secs = ticks * TICK_INTERVAL_MS / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}

fn print_summary(stats: &SimStats, seed: u64) {
    println!("============================================================");
    println!("  Idle Miner Simulation Report  (seed={seed})");
    println!("============================================================");
    println!();

    let game_time = ticks_to_time(stats.total_ticks);
    println!("Duration: {} ticks ({game_time})", stats.total_ticks);
    println!();

    println!("--- Final State ---");
    println!(
        "Coins: {:.0}  |  Lifetime: {:.0}  |  Miners: {}  |  Map: {}x{}",
        stats.final_coins,
        stats.lifetime_coins,
        stats.final_miners,
        stats.final_side,
        stats.final_side
    );
    let per_hour = if stats.total_ticks > 0 {
        stats.lifetime_coins / (stats.total_ticks as f64 * DT_SECONDS) * 3600.0
    } else {
        0.0
    };
    println!("Average income: {per_hour:.0} coins/hour  |  Purchases: {}", stats.purchases);
    println!();

    println!("--- Mining ---");
    println!(
        "Triggers: {}  |  Activations: {}  |  Respawns: {}",
        stats.triggers, stats.activations, stats.respawns
    );
    println!(
        "Crits: {}  |  Chains: {} ({} hops)  |  Double activations: {}",
        stats.crits, stats.chain_reactions, stats.chain_hops, stats.double_activations
    );
    if stats.budget_exhausted_ticks > 0 {
        println!("Ticks hitting the trigger budget: {}", stats.budget_exhausted_ticks);
    }
    println!();

    println!("--- Ore Mined ---");
    for ore in Ore::ALL {
        let count = stats.ores_mined[ore.index()];
        if count > 0 {
            println!("  {}: {count}", ore.name());
        }
    }
    println!();

    if stats.miner_count_tick.len() > 1 {
        println!("--- Roster Milestones ---");
        for (owned, tick) in stats.miner_count_tick.iter().filter(|(n, _)| n % 5 == 0) {
            println!("  {owned} miners @ {}", ticks_to_time(*tick));
        }
        println!();
    }
}

fn print_multi_run_summary(all_stats: &[SimStats]) {
    let n = all_stats.len() as f64;
    println!("============================================================");
    println!("  Aggregate Results ({} runs)", all_stats.len());
    println!("============================================================");
    println!();

    let rows: [(&str, Vec<f64>); 4] = [
        ("Lifetime coins", all_stats.iter().map(|s| s.lifetime_coins).collect()),
        ("Final miners", all_stats.iter().map(|s| s.final_miners as f64).collect()),
        ("Activations", all_stats.iter().map(|s| s.activations as f64).collect()),
        ("Chain hops", all_stats.iter().map(|s| s.chain_hops as f64).collect()),
    ];

    println!("{:<20} {:>12} {:>12} {:>12}", "Metric", "Min", "Avg", "Max");
    println!("{}", "-".repeat(58));
    for (name, values) in &rows {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / n;
        println!("{:<20} {:>12.0} {:>12.1} {:>12.0}", name, min, avg, max);
    }
    println!();
}

fn main() -> io::Result<()> {
    let config = parse_args();
    let level = if config.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
    let mut all_stats = Vec::with_capacity(config.runs as usize);

    for run in 0..config.runs.max(1) {
        let seed = config.seed + u64::from(run);
        let (stats, _state) = run_simulation(&config, seed)?;
        if config.quiet {
            println!(
                "seed={seed} ticks={} lifetime_coins={:.0} miners={} activations={}",
                stats.total_ticks, stats.lifetime_coins, stats.final_miners, stats.activations
            );
        } else {
            print_summary(&stats, seed);
        }
        all_stats.push(stats);
    }

    if all_stats.len() > 1 && !config.quiet {
        print_multi_run_summary(&all_stats);
    }
    Ok(())
}
