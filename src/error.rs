use thiserror::Error;

/// Alias for the result type of `pforlib` operations.
pub type PforResult<T> = Result<T, PforError>;

/// Errors that can occur when using the codecs or the registry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PforError {
    /// Requested codec name is not registered
    #[error("no codec registered under the name {0:?}")]
    UnknownCodec(String),

    /// Output buffer too small for the data about to be written
    #[error("output buffer too small: need {needed} words, capacity is {capacity}")]
    InsufficientOutputCapacity {
        /// Total words the operation needs to have room for
        needed: usize,
        /// Words the caller actually provided
        capacity: usize,
    },

    /// Compressed input failed an internal consistency check during decode
    #[error("malformed compressed input: {0}")]
    MalformedInput(&'static str),

    /// A caller-supplied length violates an alignment or range precondition
    #[error("invalid input length {0}")]
    InvalidLength(usize),
}
