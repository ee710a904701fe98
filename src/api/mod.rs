//! Text Reveal WASM API
//!
//! JavaScript-facing surface of the crate.
//!
//! # Module Structure
//!
//! - `helpers`: config (de)serialization and error conversion
//! - `reveal_text`: the `RevealText` class JS instantiates per content root

pub mod helpers;
pub mod reveal_text;

pub use reveal_text::RevealText;
