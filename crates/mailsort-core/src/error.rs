//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Folder path is malformed, not rooted at the default folder, or skips a level.
    #[error("Invalid folder path '{path}': {reason}")]
    InvalidPath {
        /// Offending path.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Folder already exists.
    #[error("Folder already exists: {0}")]
    FolderAlreadyExists(String),

    /// Folder not found.
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    /// A criterion keyword appears twice in one rule definition.
    #[error("Rule criterion defined more than once: {0}")]
    RuleAlreadyDefined(String),

    /// Rule definition rejected by strict parsing.
    #[error("Invalid rule definition: {0}")]
    InvalidRuleDefinition(String),

    /// Priority outside the accepted range.
    #[error("Priority {0} is out of range")]
    InvalidPriority(u8),

    /// Blank or missing required argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Account name or email already registered.
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Mail metadata could not be parsed.
    #[error("Metadata error: {0}")]
    Metadata(#[from] mailsort_meta::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
