//! Emoji Clicker core: number formatting, reward/cost formulas and
//! single-slot save persistence for a browser clicker game.
//!
//! Rendering, input and the game loop live in the host; this crate is the
//! part that can be tested without a browser.

#[cfg(any(target_arch = "wasm32", test))]
pub mod console;
pub mod logic;
pub mod save;
pub mod state;
pub mod storage;
pub mod time;

pub use save::{SaveError, SaveManager, AUTO_SAVE_INTERVAL_MS, SAVE_VERSION, STORAGE_KEY};
pub use state::{Achievements, AutoClicker, AutoClickers, GameState, Prestige, Upgrades};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use time::{Clock, ManualClock, SystemClock};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Browser entry: console logging plus a manager over `window.localStorage`.
/// Fails when storage is disabled (private mode, sandboxed iframe).
#[cfg(target_arch = "wasm32")]
pub fn browser_save_manager() -> Result<SaveManager<LocalStorage>, StorageError> {
    console::init();
    match LocalStorage::open() {
        Ok(storage) => Ok(SaveManager::new(storage)),
        Err(e) => {
            log::warn!("Emoji Clicker: localStorage を取得できません。セーブは無効です: {e}");
            Err(e)
        }
    }
}
