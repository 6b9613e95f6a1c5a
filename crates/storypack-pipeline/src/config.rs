use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storypack_archive::Compression;

use crate::error::{PipelineError, PipelineResult};

/// File names and archive settings for export and import.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output folder under the story root.
    pub export_dir: String,
    /// Header document written into the output folder.
    pub header_file: String,
    /// Flow document inside each chapter folder.
    pub flow_file: String,
    /// Blackboard (shared-data) document under the story root.
    pub shared_data_file: String,
    /// Story index document under the story root.
    pub index_file: String,
    /// Cover image under the story root.
    pub cover_file: String,
    pub archive_extension: String,
    pub compression: Compression,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            export_dir: "Export".into(),
            header_file: "content.elp".into(),
            flow_file: "flow.json".into(),
            shared_data_file: "blackboard.json".into(),
            index_file: "index.json".into(),
            cover_file: "cover.png".into(),
            archive_extension: "zip".into(),
            compression: Compression::Deflated,
        }
    }
}

impl ExportConfig {
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        toml::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn export_root(&self, story_root: &Path) -> PathBuf {
        story_root.join(&self.export_dir)
    }

    /// `<dir>/<name>.<archive_extension>`
    pub fn archive_path(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.{}", self.archive_extension))
    }
}
