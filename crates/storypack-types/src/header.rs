use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// The top-level export manifest: the story id and its exported chapter ids
/// in declared order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportHeader {
    pub story: String,
    pub chapters: Vec<String>,
}

impl ExportHeader {
    pub fn new(story: impl Into<String>, chapters: Vec<String>) -> Self {
        Self {
            story: story.into(),
            chapters,
        }
    }

    pub fn to_json(&self) -> TypeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    pub fn from_json(text: &str) -> TypeResult<Self> {
        serde_json::from_str(text).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
