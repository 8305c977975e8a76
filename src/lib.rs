//! Cosmic Guess core crate.
//!
//! A number guessing game with leveling, skills, legendary number discovery
//! and a time attack mode. The engine in [`game`] is plain Rust and runs
//! natively; [`web`] wraps one live game for the browser and reports every
//! change as a `CustomEvent` on `window`.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod numbers;
pub mod storage;
pub mod web;

pub use config::EngineConfig;
pub use error::{ConfigError, GuessError, ParseIdError, StorageError, UnlockError};
pub use game::{Action, Game, GameEvent, GameSession, Mode, PlayerProgress};
pub use storage::{KeyValueStore, MemoryStore};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web::init_logging();
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Loads saved progress and starts the first round. `config_json` may override
/// any [`EngineConfig`] field; an unreadable override falls back to defaults.
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    web::start(config_json)
}
