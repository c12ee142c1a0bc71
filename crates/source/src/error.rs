use thiserror::Error;

/// Errors raised when mutating a live store. Reads never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Cannot mutate the root of a live store")]
    EmptyPath,

    #[error("Cannot descend into non-container value at '{path}'")]
    NotContainer { path: String },

    #[error("Index at '{path}' would grow an array past {limit} elements")]
    IndexOutOfRange { path: String, limit: usize },

    #[error("Live store lock poisoned")]
    LockPoisoned,
}
