use crate::trace::ParseRecordError;

/// Type Alias: A rebranding of the `Result` enum from the standard library which focuses on errors
/// that may occur at the boundary of the simulation (configuration, trace input, result output).
pub type Result<T> = std::result::Result<T, Error>;

// The cache model itself cannot fail. Every variant here is fatal for the whole run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("trace line {line}: {source}")]
    MalformedRecord {
        line: u64,
        #[source]
        source: ParseRecordError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
