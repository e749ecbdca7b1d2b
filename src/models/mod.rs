//! Models module for the JSON grid editor
//!
//! Cell values, column types and the document that holds the rows.

pub mod value;
pub mod schema;
pub mod document;

// Re-export commonly used types
pub use value::{CellValue, Row};
pub use schema::{Schema, TypeTag};
pub use document::{Document, SortDirection};
