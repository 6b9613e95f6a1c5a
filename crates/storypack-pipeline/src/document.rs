//! Reading project documents from disk.

use std::io::ErrorKind;
use std::path::Path;

use storypack_types::{Story, StoryIndex};

use crate::config::ExportConfig;
use crate::error::{PipelineError, PipelineResult};

/// Read a document that may legitimately be absent.
pub async fn read_optional(path: &Path) -> PipelineResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read a document whose absence is fatal.
pub async fn read_required(path: &Path, kind: &'static str) -> PipelineResult<String> {
    read_optional(path)
        .await?
        .ok_or_else(|| PipelineError::MissingDocument {
            kind,
            path: path.to_path_buf(),
        })
}

/// Build a [`Story`] from the index document under `root`.
pub async fn load_story(root: &Path, config: &ExportConfig) -> PipelineResult<Story> {
    let text = read_required(&root.join(&config.index_file), "index").await?;
    Ok(StoryIndex::from_json(&text)?.into_story(root)?)
}
