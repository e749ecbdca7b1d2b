//! Format converters
//!
//! Conversion between JSON text and editor rows.

pub mod json;

pub use json::{parse_rows, read_import, serialize_rows, ExportShape, ImportSource};
