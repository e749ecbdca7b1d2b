//! JSON Grid Editor WASM API
//!
//! The JavaScript-facing surface of the editor.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros, JS value conversion, error conversion
//! - `types`: result types returned to JavaScript
//! - `editor`: the `JsonGridEditor` class

pub mod helpers;
pub mod types;
pub mod editor;

pub use editor::JsonGridEditor;
