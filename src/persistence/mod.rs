//! Saving and loading the game.
//!
//! A save is one pretty-printed JSON document held by a [`SaveStore`].
//! Loading never fails hard: a missing save starts fresh and an unreadable
//! one is reported and replaced by a fresh game.

pub mod snapshot;
pub mod store;

pub use snapshot::{restore, ResourceSnapshot, SaveSnapshot, UnitSnapshot};
pub use store::{game_dir, FileStore, MemoryStore, SaveError, SaveStore};

use crate::core::game_state::GameState;
use tracing::{debug, info, warn};

/// What `load_game` found.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing was saved yet.
    Fresh,
    Loaded(GameState),
    /// A save existed but could not be used.
    Invalid(SaveError),
}

impl LoadOutcome {
    /// The loaded state, or a fresh one stamped `now_ms`.
    pub fn into_state(self, now_ms: i64) -> GameState {
        match self {
            LoadOutcome::Loaded(state) => state,
            LoadOutcome::Fresh | LoadOutcome::Invalid(_) => GameState::new(now_ms),
        }
    }
}

pub fn load_game<S: SaveStore + ?Sized>(store: &S, now_ms: i64) -> LoadOutcome {
    let text = match store.load() {
        Ok(Some(text)) => text,
        Ok(None) => {
            info!("no save found, starting fresh");
            return LoadOutcome::Fresh;
        }
        Err(e) => {
            warn!(error = %e, "could not read save");
            return LoadOutcome::Invalid(e);
        }
    };
    match restore(&text, now_ms) {
        Ok(state) => {
            info!(
                coins = state.coins,
                miners = state.roster.len(),
                map_expansions = state.map_expansions,
                "save loaded"
            );
            LoadOutcome::Loaded(state)
        }
        Err(e) => {
            warn!(error = %e, "discarding unreadable save");
            LoadOutcome::Invalid(e)
        }
    }
}

/// Writes `state` and stamps `last_save_time` on success.
pub fn save_game<S: SaveStore + ?Sized>(
    store: &mut S,
    state: &mut GameState,
    now_ms: i64,
) -> Result<(), SaveError> {
    let text = SaveSnapshot::capture(state, now_ms).to_json()?;
    store.save(&text)?;
    state.last_save_time = now_ms;
    debug!(bytes = text.len(), "game saved");
    Ok(())
}
