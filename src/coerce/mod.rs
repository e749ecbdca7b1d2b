//! Value coercion between untyped JSON and typed grid cells
//!
//! # Module Structure
//!
//! - `infer`: per-column type inference
//! - `list`: comma-separated list parsing and formatting
//! - `flatten`: dot-path flatten/unflatten used on export

pub mod flatten;
pub mod infer;
pub mod list;

pub use flatten::{flatten, unflatten};
pub use infer::{infer_columns, infer_schema, infer_schema_for, infer_type};
pub use list::{format_list_output, parse_finite_number, parse_list_input};

use crate::models::schema::TypeTag;
use crate::models::value::CellValue;

/// Convert inline-edited text back into a value shaped like `original`.
///
/// - list: parsed with [`parse_list_input`]
/// - number: parsed as a finite number, kept as the raw text if that fails
/// - boolean: true iff the text is `true` (case-insensitive)
/// - anything else: the text itself
pub fn coerce_edit_to_type(edited: &str, original: &CellValue) -> CellValue {
    match original {
        CellValue::List(_) => CellValue::List(parse_list_input(edited)),
        CellValue::Number(_) => coerce_number(edited),
        CellValue::Boolean(_) => coerce_boolean(edited),
        CellValue::Text(_) | CellValue::Null | CellValue::Object(_) => {
            CellValue::Text(edited.to_string())
        }
    }
}

/// Like [`coerce_edit_to_type`], but a null or missing original value defers
/// to the column's type tag.
pub fn coerce_edit(edited: &str, original: Option<&CellValue>, tag: TypeTag) -> CellValue {
    match original {
        Some(value) if !value.is_null() => coerce_edit_to_type(edited, value),
        _ => match tag {
            TypeTag::List => CellValue::List(parse_list_input(edited)),
            TypeTag::Number => coerce_number(edited),
            TypeTag::Boolean => coerce_boolean(edited),
            TypeTag::Text | TypeTag::Object | TypeTag::Auto => CellValue::Text(edited.to_string()),
        },
    }
}

/// Text an inline editor starts with for `value`
pub fn edit_text(value: &CellValue) -> String {
    match value {
        CellValue::List(items) => format_list_output(items),
        other => other.display_text(),
    }
}

fn coerce_number(edited: &str) -> CellValue {
    parse_finite_number(edited)
        .map(CellValue::Number)
        .unwrap_or_else(|| CellValue::Text(edited.to_string()))
}

fn coerce_boolean(edited: &str) -> CellValue {
    CellValue::Boolean(edited.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_edit() {
        assert_eq!(coerce_edit_to_type("42", &CellValue::Number(1.0)), CellValue::Number(42.0));
        assert_eq!(coerce_edit_to_type(" 2.5 ", &CellValue::Number(1.0)), CellValue::Number(2.5));
    }

    #[test]
    fn test_number_edit_falls_back_to_text() {
        assert_eq!(coerce_edit_to_type("abc", &CellValue::Number(1.0)), "abc".into());
        assert_eq!(coerce_edit_to_type("", &CellValue::Number(1.0)), "".into());
    }

    #[test]
    fn test_boolean_edit() {
        assert_eq!(coerce_edit_to_type("TRUE", &CellValue::Boolean(false)), CellValue::Boolean(true));
        assert_eq!(coerce_edit_to_type("yes", &CellValue::Boolean(true)), CellValue::Boolean(false));
    }

    #[test]
    fn test_list_edit() {
        assert_eq!(
            coerce_edit_to_type("a, 2", &CellValue::List(vec![])),
            CellValue::List(vec!["a".into(), CellValue::Number(2.0)])
        );
    }

    #[test]
    fn test_text_edit_passes_through() {
        assert_eq!(coerce_edit_to_type("42", &"old".into()), "42".into());
    }

    #[test]
    fn test_null_original_uses_column_type() {
        assert_eq!(coerce_edit("7", Some(&CellValue::Null), TypeTag::Number), CellValue::Number(7.0));
        assert_eq!(coerce_edit("x, y", None, TypeTag::List), CellValue::List(vec!["x".into(), "y".into()]));
        assert_eq!(coerce_edit("7", None, TypeTag::Text), "7".into());
    }

    #[test]
    fn test_non_null_original_wins_over_tag() {
        assert_eq!(coerce_edit("7", Some(&"seven".into()), TypeTag::Number), "7".into());
    }

    #[test]
    fn test_edit_text() {
        assert_eq!(edit_text(&CellValue::Null), "");
        assert_eq!(edit_text(&CellValue::List(vec!["a".into(), CellValue::Number(1.0)])), "a, 1");
        assert_eq!(edit_text(&CellValue::Number(10.0)), "10");
    }
}
