//! JSON Grid Editor WASM Module
//!
//! A spreadsheet-style editor for JSON arrays of objects. The core infers
//! columns and types from the data, keeps undoable row history, and drives
//! keyboard navigation over the grid and its nested editors. The page
//! renders and performs platform I/O; everything else happens here.

pub mod error;
pub mod config;
pub mod models;
pub mod coerce;
pub mod undo;
pub mod navigation;
pub mod nested;
pub mod editor;
pub mod storage;
pub mod converters;
pub mod api;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editor::{EditorState, HostCommand, KeyResponse, ViewSnapshot};
pub use error::{EditorError, Result};
pub use models::*;
pub use undo::History;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init (module re-instantiated) keeps the existing logger
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("JSON Grid Editor WASM module initialized");
}
