/*!
 * Error types for the sfexport application.
 *
 * Malformed scripture data never produces an error: the exporter degrades
 * gracefully instead. The types below cover the places where export can
 * really fail: configuration, document loading and the output sink.
 */

use thiserror::Error;

/// Errors raised while configuring an export
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No export domain was selected
    #[error("No export domain selected: enable scripture, back translation or notes")]
    NoDomainSelected,

    /// Back translation export was requested without writing systems
    #[error("Back translation export requires at least one writing system")]
    MissingWritingSystems,

    /// The same writing system was requested twice
    #[error("Writing system requested more than once: {0}")]
    DuplicateWritingSystem(String),

    /// A writing system id is syntactically unusable as a marker suffix
    #[error("Invalid writing system id: {0}")]
    InvalidWritingSystem(String),

    /// Unknown dialect name
    #[error("Unknown export dialect: {0}")]
    UnknownDialect(String),
}

/// Errors raised while loading a scripture document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document could not be parsed
    #[error("Failed to parse scripture document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document contains no books
    #[error("Scripture document contains no books")]
    Empty,
}

/// Errors raised by the export engine itself
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing to the line sink failed
    #[error("Failed to write output line: {0}")]
    Sink(#[from] std::io::Error),

    /// Configuration rejected at export time
    #[error("Invalid export configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from document loading
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from the exporter
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

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
