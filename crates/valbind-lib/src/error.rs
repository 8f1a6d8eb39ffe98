// ABOUTME: Error types for valbind operations
// ABOUTME: Defines ValbindError enum covering all failure modes

use thiserror::Error;

/// Errors that can occur during valbind operations
#[derive(Error, Debug)]
pub enum ValbindError {
    /// I/O error reading or writing files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Clear-options directive could not be parsed
    #[error("Clear options error: {0}")]
    ClearOptions(String),

    /// Rule configuration is well-formed JSON but cannot be turned into rules
    #[error("Rules config error: {0}")]
    RulesConfig(String),

    /// Document failed JSON Schema validation
    #[error("Schema validation error: {0}")]
    Schema(String),
}
