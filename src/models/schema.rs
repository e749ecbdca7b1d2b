//! Column types and column-name rules

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// Inferred (or chosen) type of a column; decides which edit widget is used
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    #[default]
    Text,
    Number,
    Boolean,
    List,
    Object,
    Auto,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Text => "text",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::List => "list",
            TypeTag::Object => "object",
            TypeTag::Auto => "auto",
        }
    }

    pub fn parse(name: &str) -> Option<TypeTag> {
        match name {
            "text" => Some(TypeTag::Text),
            "number" => Some(TypeTag::Number),
            "boolean" => Some(TypeTag::Boolean),
            "list" => Some(TypeTag::List),
            "object" => Some(TypeTag::Object),
            "auto" => Some(TypeTag::Auto),
            _ => None,
        }
    }
}

/// Column name to type tag
pub type Schema = IndexMap<String, TypeTag>;

/// Check a proposed column name against the existing column set.
///
/// `renaming` is the name being replaced, which may be reused.
pub fn validate_column_name(name: &str, columns: &[String], renaming: Option<&str>) -> Result<()> {
    if name.is_empty() {
        return Err(EditorError::Validation("Column name cannot be empty".to_string()));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(EditorError::Validation(format!(
            "Column name '{}' cannot contain spaces",
            name
        )));
    }

    let taken = columns
        .iter()
        .any(|existing| existing == name && Some(existing.as_str()) != renaming);
    if taken {
        return Err(EditorError::Validation(format!(
            "Column '{}' already exists",
            name
        )));
    }

    Ok(())
}
