//! NumGuess core crate.
//!
//! The game core (`session`, `hint`, `score`, `difficulty`) has no browser
//! dependencies and is driven through injected [`RandomSource`] and
//! [`KeyValueStore`] implementations. The `ui` module wires it to the DOM and is
//! started from JS via `start_game()`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod difficulty;
pub mod hint;
pub mod logging;
pub mod random;
pub mod score;
pub mod session;
pub mod store;
mod ui;

pub use config::GameConfig;
pub use difficulty::Difficulty;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use score::HighScoreBook;
pub use session::{GameSession, GuessError, GuessOutcome, GuessRecord, SessionSnapshot, Status};
pub use store::{KeyValueStore, LocalStore, MemoryStore, StoreError};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    ui::mount(GameConfig::default())
}

/// Starts with overrides, e.g. `{"difficulty":"Hard","clear_hint_on_guess":true}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    ui::mount(config)
}

/// Current session snapshot as JSON, or `null` before `start_game()`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn session_snapshot_json() -> Result<JsValue, JsValue> {
    match ui::snapshot_of(|s| serde_json::to_string(&s.snapshot())) {
        Some(Ok(json)) => Ok(JsValue::from_str(&json)),
        Some(Err(e)) => Err(JsValue::from_str(&e.to_string())),
        None => Ok(JsValue::NULL),
    }
}
