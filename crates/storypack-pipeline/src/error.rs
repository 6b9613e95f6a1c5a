use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required document (blackboard, index, header) is absent.
    #[error("missing {kind} document: {path}")]
    MissingDocument { kind: &'static str, path: PathBuf },

    #[error("invalid header document: {0}")]
    InvalidHeader(String),

    /// A blackboard path is absolute or climbs out of the story root.
    #[error("resource path escapes the story root: {0}")]
    UnsafePath(PathBuf),

    /// Story and chapter archives would share a file name.
    #[error("story id {0:?} collides with a chapter id")]
    IdCollision(String),

    #[error("chapter {chapter} failed: {source}")]
    Chapter {
        chapter: String,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Flow(#[from] storypack_flow::FlowError),

    #[error(transparent)]
    Archive(#[from] storypack_archive::ArchiveError),

    #[error(transparent)]
    Type(#[from] storypack_types::TypeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Attribute `err` to `chapter`.
    pub fn chapter(chapter: &str, err: PipelineError) -> Self {
        Self::Chapter {
            chapter: chapter.to_string(),
            source: Box::new(err),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
