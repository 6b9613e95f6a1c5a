//! Story and chapter metadata.
//!
//! A [`Story`] is read-only input to the pipeline. It is normally built from
//! the story index document via [`StoryIndex::into_story`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// Whether `id` can name a single folder and archive under a parent
/// directory: non-empty, not `.` or `..`, and free of separators and NUL.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}

/// A chapter: an id plus the directory holding its flow document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chapter {
    pub id: String,
    pub path: PathBuf,
}

impl Chapter {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// A story: an id, a root directory, and chapters in declared order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Story {
    pub id: String,
    pub root: PathBuf,
    pub chapters: Vec<Chapter>,
}

impl Story {
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
            chapters: Vec::new(),
        }
    }

    /// Append a chapter living at `<root>/<id>`.
    pub fn with_chapter(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        let path = self.root.join(&id);
        self.chapters.push(Chapter { id, path });
        self
    }

    pub fn chapter_ids(&self) -> Vec<String> {
        self.chapters.iter().map(|c| c.id.clone()).collect()
    }

    /// Check that the story id and every chapter id can be used as folder
    /// and archive names, that chapter ids are unique, and that no id
    /// equals one of `reserved`.
    pub fn validate(&self, reserved: &[&str]) -> TypeResult<()> {
        if !is_valid_id(&self.id) {
            return Err(TypeError::InvalidStoryId(self.id.clone()));
        }
        if reserved.contains(&self.id.as_str()) {
            return Err(TypeError::ReservedId(self.id.clone()));
        }
        let mut seen = HashSet::with_capacity(self.chapters.len());
        for chapter in &self.chapters {
            if !is_valid_id(&chapter.id) {
                return Err(TypeError::InvalidChapterId(chapter.id.clone()));
            }
            if reserved.contains(&chapter.id.as_str()) {
                return Err(TypeError::ReservedId(chapter.id.clone()));
            }
            if !seen.insert(chapter.id.as_str()) {
                return Err(TypeError::DuplicateChapterId(chapter.id.clone()));
            }
        }
        Ok(())
    }
}

/// On-disk shape of the story index document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryIndex {
    pub id: String,
    #[serde(default)]
    pub chapters: Vec<ChapterEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub id: String,
    /// Directory relative to the story root; defaults to the chapter id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StoryIndex {
    pub fn from_json(text: &str) -> TypeResult<Self> {
        serde_json::from_str(text).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Resolve chapter paths against `root`.
    ///
    /// Ids name archive files and staging folders; see [`Story::validate`].
    pub fn into_story(self, root: &Path) -> TypeResult<Story> {
        let mut story = Story::new(self.id, root);
        for entry in self.chapters {
            let rel = entry.path.unwrap_or_else(|| entry.id.clone());
            story.chapters.push(Chapter {
                path: root.join(rel),
                id: entry.id,
            });
        }
        story.validate(&[])?;
        Ok(story)
    }
}
