//! Error types for shardstore

/// Result type alias for shard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for shard and cache operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No value is currently associated with the key
    #[error("Key not found")]
    NotFound,

    /// Configuration rejected at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Arena growth would exceed the configured byte cap
    #[error("Arena out of capacity: {needed} bytes needed (limit {limit} bytes)")]
    OutOfCapacity {
        /// Buffer length the write would have required
        needed: usize,
        /// Configured cap on the arena buffer
        limit: usize,
    },

    /// Value longer than a record header can describe
    #[error("Value too large: {0} bytes (max {max} bytes)", max = u32::MAX)]
    ValueTooLarge(usize),
}

impl Error {
    /// Whether this is the expected miss outcome rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}
