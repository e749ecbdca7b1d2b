//! Comma-separated list editing
//!
//! Inline list cells are edited as `a, b, c` text. Parsing is heuristic:
//! segments that look like numbers or booleans become numbers or booleans,
//! so the round trip through text is lossy for strings such as `"true"`,
//! `"42"` or anything containing a comma.

use crate::models::value::CellValue;

/// Parse text as a finite number, ignoring surrounding whitespace
pub fn parse_finite_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Split on commas, trim, drop empty segments, and type each segment
pub fn parse_list_input(text: &str) -> Vec<CellValue> {
    text.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_list_item)
        .collect()
}

fn parse_list_item(segment: &str) -> CellValue {
    if let Some(n) = parse_finite_number(segment) {
        return CellValue::Number(n);
    }
    if segment.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if segment.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }
    CellValue::Text(segment.to_string())
}

/// Join list items with `", "` for inline editing
pub fn format_list_output(items: &[CellValue]) -> String {
    items
        .iter()
        .map(CellValue::display_text)
        .collect::<Vec<_>>()
        .join(", ")
}
