//! Error types for metadata scanning.

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Metadata error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The `received` field is not in `yyyy-MM-dd HH:mm` form.
    #[error("Invalid received timestamp '{value}': {source}")]
    InvalidTimestamp {
        /// Raw field value.
        value: String,
        /// Underlying chrono error.
        source: chrono::ParseError,
    },
}
