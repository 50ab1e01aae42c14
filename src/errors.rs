/*!
 * Error types for the danmaku converter.
 *
 * This module contains custom error types for the different stages of a
 * conversion, using the thiserror crate for ergonomic error definitions.
 * Lane exhaustion and unsupported comment types are not errors: those
 * comments are placed off-screen by the layout engine.
 */

use thiserror::Error;

/// Errors that make a single `<d p="...">` record unusable
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The metadata attribute did not split into the 8 expected fields
    #[error("Malformed record: expected 8 metadata fields, found {found}")]
    FieldCount {
        /// Number of comma separated fields actually present
        found: usize,
    },

    /// A numeric metadata field could not be parsed
    #[error("Malformed record: invalid {field} value '{value}'")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Raw text of the field
        value: String,
    },
}

/// Errors raised while rendering placed comments to ASS text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The comment references a font size class with no configured style
    #[error("Unknown style class: no style configured for font size {0}")]
    UnknownStyleClass(u32),
}

/// Errors from the danmaku conversion core
#[derive(Error, Debug)]
pub enum DanmakuError {
    /// The input is not well-formed markup
    #[error("Markup error: {0}")]
    Markup(String),

    /// A record could not be ingested
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// A placed comment could not be rendered
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from the conversion core
    #[error("Danmaku error: {0}")]
    Danmaku(#[from] DanmakuError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<RecordError> for AppError {
    fn from(error: RecordError) -> Self {
        Self::Danmaku(DanmakuError::Record(error))
    }
}

impl From<RenderError> for AppError {
    fn from(error: RenderError) -> Self {
        Self::Danmaku(DanmakuError::Render(error))
    }
}
