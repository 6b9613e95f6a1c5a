//! The shared-data ("blackboard") document.
//!
//! Maps each resource identifier, per category, to one or more files
//! relative to the story root.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use storypack_types::{ResourceBundle, ResourceCategory};
use tracing::debug;

use crate::error::{FlowError, FlowResult};

#[derive(Deserialize)]
struct RawBlackboard {
    #[serde(default)]
    resources: BTreeMap<String, BTreeMap<String, RawPaths>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPaths {
    One(String),
    Many(Vec<String>),
}

impl From<RawPaths> for Vec<String> {
    fn from(raw: RawPaths) -> Self {
        match raw {
            RawPaths::One(path) => vec![path],
            RawPaths::Many(paths) => paths,
        }
    }
}

/// Parsed blackboard lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blackboard {
    entries: BTreeMap<ResourceCategory, BTreeMap<String, Vec<String>>>,
}

/// A file backing one resource identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedFile {
    pub category: ResourceCategory,
    pub id: String,
    /// Relative to the story root.
    pub path: PathBuf,
}

/// Result of resolving a bundle against the blackboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub files: Vec<ResolvedFile>,
    /// Identifiers the blackboard has no entry for.
    pub unresolved: Vec<(ResourceCategory, String)>,
}

impl Blackboard {
    /// Parse the blackboard document. Unknown categories and fields are
    /// ignored.
    pub fn from_json(text: &str) -> FlowResult<Self> {
        let raw: RawBlackboard =
            serde_json::from_str(text).map_err(|e| FlowError::MalformedBlackboard(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (name, ids) in raw.resources {
            let Ok(category) = name.parse::<ResourceCategory>() else {
                debug!(category = %name, "ignoring unknown blackboard category");
                continue;
            };
            let ids: BTreeMap<String, Vec<String>> =
                ids.into_iter().map(|(id, paths)| (id, paths.into())).collect();
            entries.insert(category, ids);
        }
        Ok(Self { entries })
    }

    /// Record `paths` as the backing files of `id`.
    pub fn insert(&mut self, category: ResourceCategory, id: impl Into<String>, paths: Vec<String>) {
        self.entries.entry(category).or_default().insert(id.into(), paths);
    }

    pub fn paths(&self, category: ResourceCategory, id: &str) -> Option<&[String]> {
        self.entries
            .get(&category)
            .and_then(|ids| ids.get(id))
            .map(Vec::as_slice)
    }

    /// Resolve every identifier in `bundle` to its backing files.
    ///
    /// Output is sorted so repeated runs copy in the same order.
    pub fn resolve(&self, bundle: &ResourceBundle) -> Resolution {
        let mut resolution = Resolution::default();
        for (category, id) in bundle.entries() {
            match self.paths(category, id) {
                Some(paths) => resolution.files.extend(paths.iter().map(|p| ResolvedFile {
                    category,
                    id: id.to_string(),
                    path: PathBuf::from(p),
                })),
                None => resolution.unresolved.push((category, id.to_string())),
            }
        }
        resolution.files.sort();
        resolution.unresolved.sort();
        resolution
    }
}
