//! Errors raised while reading schema input.

/// Error that can occur when parsing type notation or catalog documents.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid type notation `{input}`: {message}")]
    TypeNotation { input: String, message: String },

    #[error("invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),
}
