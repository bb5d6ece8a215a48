//! Error types for slide normalization and presentation planning.
//!
//! Malformed slide content is never an error: it is resolved by coercion
//! fallbacks. These variants cover explicit inputs (files, configuration,
//! names) and defects in schema definitions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of the coercion path.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Input was not valid JSON at all (as opposed to JSON of the wrong shape).
    #[error("JSON syntax error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A slide schema is internally inconsistent.
    #[error("Schema definition error: {0}")]
    SchemaError(#[from] SchemaError),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A sales stage name did not match any known stage.
    #[error("Unknown sales stage: {0}")]
    UnknownStage(String),

    /// An industry name did not match any known industry.
    #[error("Unknown industry: {0}")]
    UnknownIndustry(String),
}

/// Defects in a slide-type schema. These are programming errors in the
/// schema tables, never caused by generated content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("slide type '{0}' is registered more than once")]
    DuplicateType(String),

    #[error("slide type '{0}' has an empty type id or field name")]
    EmptyName(String),

    #[error("slide type '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    #[error("slide type '{schema}' has record list '{field}' with an empty item shape")]
    EmptyRecordShape { schema: String, field: String },

    #[error("slide type '{schema}' has record list '{field}' with no text field")]
    RecordShapeWithoutText { schema: String, field: String },

    #[error("slide type '{schema}' declares reserved field '{field}' with a non-passthrough rule")]
    ReservedField { schema: String, field: String },

    #[error("slide type '{0}' does not declare a text 'title' field")]
    MissingTitle(String),

    #[error("slide type '{schema}' nests record lists deeper than {limit} levels")]
    NestingTooDeep { schema: String, limit: usize },

    #[error("registry has no '{0}' fallback schema")]
    MissingFallback(String),
}
