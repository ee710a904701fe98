//! Text Reveal WASM Module
//!
//! Splits rich text into lines and reveals them one by one behind a colored
//! block that wipes across each line. The orchestration in [`reveal`] runs
//! against any [`dom::Dom`] backend; [`api`] wires it to the browser.

pub mod anim;
pub mod api;
pub mod config;
pub mod dom;
pub mod error;
pub mod ledger;
pub mod reveal;
pub mod split;

// Re-export commonly used types
pub use config::{ConfigError, RevealConfig};
pub use error::RevealError;
pub use reveal::{MountOutcome, RevealOrchestrator};

use once_cell::sync::OnceCell;
use wasm_bindgen::prelude::*;

static INIT: OnceCell<()> = OnceCell::new();

/// Process-wide setup (panic hook, console logger). Safe to call repeatedly;
/// only the first call does anything.
pub fn init() {
    INIT.get_or_init(|| {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        #[cfg(feature = "console_log")]
        if let Err(e) = console_log::init_with_level(log::Level::Debug) {
            web_sys::console::warn_1(&format!("[WASM] logger already set: {}", e).into());
        }

        log::info!("Text reveal WASM module initialized");
    });
}

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    init();
}
