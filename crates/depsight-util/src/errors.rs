use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for depsight operations.
#[derive(Debug, Error, Diagnostic)]
pub enum InsightError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required input missing or malformed (configuration, dependency notation, ...).
    #[error("Invalid input: {message}")]
    #[diagnostic(help("Run `depsight insight --help` to see the expected arguments"))]
    InvalidUserData { message: String },

    /// Resolution snapshot could not be read or is inconsistent.
    #[error("Snapshot error: {message}")]
    #[diagnostic(help("Check the snapshot file written by the graph builder"))]
    Snapshot { message: String },

    /// Global configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config { message: String },
}
