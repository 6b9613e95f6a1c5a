use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown resource category: {0}")]
    UnknownCategory(String),

    #[error("invalid story id: {0:?}")]
    InvalidStoryId(String),

    #[error("invalid chapter id: {0:?}")]
    InvalidChapterId(String),

    #[error("duplicate chapter id: {0:?}")]
    DuplicateChapterId(String),

    /// The id would name the same folder as a reserved project entry.
    #[error("id {0:?} is reserved")]
    ReservedId(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type TypeResult<T> = Result<T, TypeError>;
