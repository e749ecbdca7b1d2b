//! Error types for the JSON grid editor
//!
//! User-input validation is checked before any mutation, so an error never
//! leaves a half-applied document behind. Persistence failures are the one
//! kind that is logged instead of shown to the user.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Column name empty / contains whitespace / duplicate, or a structural
    /// edit the current grid does not allow
    #[error("{0}")]
    Validation(String),

    /// Imported text is not JSON, or not a JSON array of objects
    #[error("Invalid JSON: {0}")]
    Parse(String),

    /// The platform refused clipboard access
    #[error("Clipboard access denied: {0}")]
    Permission(String),

    /// Local storage read/write failed (never shown to the user)
    #[error("Storage unavailable: {0}")]
    Persistence(String),

    /// Opening another nested editor would exceed the configured depth
    #[error("Nested editors are limited to {limit} levels (requested level {depth})")]
    StructuralLimit { depth: usize, limit: usize },

    #[error("Row {index} out of bounds (rows: {len})")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// Nested editing requested where there is no nested value or overlay
    #[error("{0}")]
    NotNested(String),
}

impl EditorError {
    /// Stable error kind name, used as the `name` of errors thrown to JS
    pub fn kind(&self) -> &'static str {
        match self {
            EditorError::Validation(_) => "ValidationError",
            EditorError::Parse(_) => "ParseError",
            EditorError::Permission(_) => "PermissionError",
            EditorError::Persistence(_) => "PersistenceError",
            EditorError::StructuralLimit { .. } => "StructuralLimitError",
            EditorError::RowOutOfRange { .. } => "RangeError",
            EditorError::ColumnNotFound(_) => "ColumnNotFoundError",
            EditorError::NotNested(_) => "NotNestedError",
        }
    }

    pub fn is_user_visible(&self) -> bool {
        !matches!(self, EditorError::Persistence(_))
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Parse(err.to_string())
    }
}
