use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("source directory does not exist: {0}")]
    SourceMissing(PathBuf),

    #[error("archive not found: {0}")]
    ArchiveMissing(PathBuf),

    #[error("refusing to overwrite existing file: {0}")]
    DestinationExists(PathBuf),

    #[error("archive entry escapes destination: {0}")]
    UnsafeEntry(String),

    #[error("copy {from} -> {to} failed: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
