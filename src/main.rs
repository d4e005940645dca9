mod ui;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use idle_miner::build_info;
use idle_miner::core::constants::{AUTOSAVE_INTERVAL_SECONDS, LOG_FILE_NAME, TICK_INTERVAL_MS};
use idle_miner::core::upgrades::*;
use idle_miner::core::{game_tick, process_offline_progression_at, GameState};
use idle_miner::map::geometry::tile_bounds;
use idle_miner::miners::ClassUpgrade;
use idle_miner::mining::{mine_tile_manually, Mine};
use idle_miner::persistence::{game_dir, load_game, save_game, FileStore, LoadOutcome};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use ui::{draw_ui, format_coins, UiState};

struct Options {
    save_path: Option<PathBuf>,
    seed: Option<u64>,
    fresh: bool,
}

fn print_help() {
    println!("Idle Miner - terminal tile-mining idle game\n");
    println!("Usage: idle-miner [options]\n");
    println!("Options:");
    println!("  --save PATH  Use PATH instead of ~/.idle-miner/save.json");
    println!("  --seed N     Seed the random number generator");
    println!("  --fresh      Ignore any existing save");
    println!("  --version    Show version information");
    println!("  --help       Show this help message");
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut options = Options {
        save_path: None,
        seed: None,
        fresh: false,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--save" if i + 1 < args.len() => {
                options.save_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--seed" if i + 1 < args.len() => match args[i + 1].parse() {
                Ok(seed) => {
                    options.seed = Some(seed);
                    i += 1;
                }
                Err(_) => {
                    eprintln!("--seed expects a number, got '{}'", args[i + 1]);
                    std::process::exit(1);
                }
            },
            "--fresh" => options.fresh = true,
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'idle-miner --help' for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    options
}

/// Logs go to ~/.idle-miner/idle-miner.log; the terminal belongs to the UI.
fn init_logging() -> io::Result<()> {
    let path = game_dir()?.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    let options = parse_args();
    if let Err(e) = init_logging() {
        eprintln!("Warning: logging disabled: {}", e);
    }
    info!(version = build_info::BUILD_VERSION, "starting");

    let mut store = match options.save_path {
        Some(path) => FileStore::at(path),
        None => FileStore::new()?,
    };

    let now = Utc::now().timestamp_millis();
    let mut ui_state = UiState::new();
    let mut state = if options.fresh {
        GameState::new(now)
    } else {
        match load_game(&store, now) {
            LoadOutcome::Loaded(state) => state,
            LoadOutcome::Fresh => GameState::new(now),
            LoadOutcome::Invalid(e) => {
                ui_state.status = format!("Save could not be read ({}); started fresh.", e);
                GameState::new(now)
            }
        }
    };

    let report = process_offline_progression_at(&mut state, now);
    if report.coins_earned > 0.0 {
        ui_state.status = format!(
            "While you were away ({}m): +{} coins",
            report.credited_seconds / 60,
            format_coins(report.coins_earned)
        );
    }

    let seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "rng seeded");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut mine = Mine::generate(state.side(), &state.weights(), &mut rng);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut last_tick = Instant::now();
    let mut last_autosave = Instant::now();
    let mut ticks_since_draw: u32 = 0;
    let mut dirty = true;

    loop {
        if dirty {
            ui_state.clamp(&state);
            terminal.draw(|frame| draw_ui(frame, &state, &mine, &ui_state))?;
            dirty = false;
            ticks_since_draw = 0;
        }

        // Poll for input (50ms non-blocking)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if !handle_key(key_event.code, &mut state, &mut mine, &mut ui_state, &mut rng) {
                        break;
                    }
                    dirty = true;
                }
            }
        }

        // Game tick every 100ms
        let elapsed = last_tick.elapsed();
        if elapsed >= Duration::from_millis(TICK_INTERVAL_MS) {
            let result = game_tick(&mut state, &mut mine, elapsed.as_secs_f64(), &mut rng);
            last_tick = Instant::now();
            ticks_since_draw += 1;
            // Countdowns still need an occasional refresh.
            if result.render_requested || ticks_since_draw >= 10 {
                dirty = true;
            }
        }

        // Auto-save every 30 seconds
        if last_autosave.elapsed() >= Duration::from_secs(AUTOSAVE_INTERVAL_SECONDS) {
            if let Err(e) = save_game(&mut store, &mut state, Utc::now().timestamp_millis()) {
                warn!(error = %e, "autosave failed");
                ui_state.status = format!("Autosave failed: {}", e);
            }
            last_autosave = Instant::now();
        }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;

    match save_game(&mut store, &mut state, Utc::now().timestamp_millis()) {
        Ok(()) => println!("Game saved to {}", store.path().display()),
        Err(e) => eprintln!("Could not save: {}", e),
    }
    info!(coins = state.coins, "exiting");
    println!("Goodbye!");

    Ok(())
}

/// Applies one key press. Returns false when the player quits.
fn handle_key(
    code: KeyCode,
    state: &mut GameState,
    mine: &mut Mine,
    ui: &mut UiState,
    rng: &mut ChaCha8Rng,
) -> bool {
    if ui.confirm_reset {
        if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            reset_game(state, mine, Utc::now().timestamp_millis(), rng);
            *ui = UiState::new();
            ui.status = "Progress reset.".to_string();
        } else {
            ui.confirm_reset = false;
            ui.status = "Reset cancelled.".to_string();
        }
        return true;
    }

    let miner = ui.selected_miner;
    let side = state.side();
    let status = match code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Up => {
            ui.move_cursor(side, 0, -1);
            return true;
        }
        KeyCode::Down => {
            ui.move_cursor(side, 0, 1);
            return true;
        }
        KeyCode::Left => {
            ui.move_cursor(side, -1, 0);
            return true;
        }
        KeyCode::Right => {
            ui.move_cursor(side, 1, 0);
            return true;
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            match mine_tile_manually(state, mine, ui.cursor, rng) {
                Some(outcome) => format!(
                    "Mined {} x{} for {}",
                    outcome.ore.name(),
                    outcome.units,
                    format_coins(outcome.payout)
                ),
                None => "That tile is still cooling.".to_string(),
            }
        }
        KeyCode::Tab | KeyCode::Char(']') => {
            if !state.roster.is_empty() {
                ui.selected_miner = (miner + 1) % state.roster.len();
            }
            return true;
        }
        KeyCode::BackTab | KeyCode::Char('[') => {
            if !state.roster.is_empty() {
                ui.selected_miner = (miner + state.roster.len() - 1) % state.roster.len();
            }
            return true;
        }
        KeyCode::Char('b') => {
            let cost = miner_cost(state.roster.len());
            if buy_miner(state) {
                ui.selected_miner = state.roster.len() - 1;
                format!("Hired miner #{} for {}", state.roster.len(), format_coins(cost))
            } else {
                "Cannot hire another miner.".to_string()
            }
        }
        KeyCode::Char('s') => outcome(buy_miner_speed_upgrade(state, miner), "Speed upgraded."),
        KeyCode::Char('r') => outcome(buy_miner_radius_upgrade(state, miner), "Radius upgraded."),
        KeyCode::Char('u') => outcome(unlock_specialization(state, miner), "Classes unlocked."),
        KeyCode::Char('c') => match state.roster.get(miner).map(|u| u.kind().next()) {
            Some(next) if set_specialization(state, miner, next) => {
                format!("Miner #{} is now a {}.", miner + 1, next.name())
            }
            _ => "Unlock classes first.".to_string(),
        },
        KeyCode::Char(digit @ '1'..='3') => {
            let slot = digit as usize - '1' as usize;
            let upgrade = state
                .roster
                .get(miner)
                .and_then(|u| ClassUpgrade::for_kind(u.kind()).get(slot).copied());
            match upgrade {
                Some(upgrade) if buy_specialization_upgrade(state, miner, upgrade) => {
                    format!("{} upgraded.", upgrade.name())
                }
                _ => "Cannot buy that upgrade.".to_string(),
            }
        }
        KeyCode::Char('t') => match state.roster.get(miner).map(|u| u.targeting.next()) {
            Some(next) if set_targeting(state, miner, next) => {
                format!("Targeting: {}", next.name())
            }
            _ => "No miner selected.".to_string(),
        },
        KeyCode::Char('m') => {
            let target = tile_bounds(ui.cursor, side).center();
            outcome(reposition_miner(state, miner, target), "Miner moved.")
        }
        KeyCode::Char('o') => {
            ui.cycle_ore();
            return true;
        }
        KeyCode::Char('g') => {
            let ore = ui.selected_ore;
            outcome(buy_ore_generation(state, ore), "Ore generation raised.")
        }
        KeyCode::Char('e') => outcome(buy_map_expansion(state, mine, rng), "Map expanded."),
        KeyCode::Char('a') => {
            if toggle_auto_sell(state) {
                "Auto-sell on.".to_string()
            } else {
                "Auto-sell off; ore goes to the inventory.".to_string()
            }
        }
        KeyCode::Char('x') => format!("Sold ore for {}", format_coins(sell_all(state))),
        KeyCode::Char('l') => {
            state.left_handed_mode = !state.left_handed_mode;
            return true;
        }
        KeyCode::Char('R') => {
            ui.confirm_reset = true;
            return true;
        }
        KeyCode::Char('h') => {
            "Hire miners, upgrade them and raise ore generation. Saves every 30s.".to_string()
        }
        _ => return true,
    };
    ui.status = status;
    true
}

fn outcome(ok: bool, success: &str) -> String {
    if ok {
        success.to_string()
    } else {
        "Not enough coins, or not available.".to_string()
    }
}
