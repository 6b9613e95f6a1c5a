//! Resource sets and bundles.
//!
//! A [`ResourceBundle`] plays one of two roles during an export run:
//!
//! - the **accumulator**, owned by the exporter for the whole run, which only
//!   ever grows;
//! - a **per-chapter bundle**, produced fresh by reference extraction and
//!   treated as read-only input to [`ResourceBundle::diff_and_merge`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::category::ResourceCategory;

/// A set of opaque resource identifiers belonging to one category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSet {
    ids: HashSet<String>,
}

impl ResourceSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier. Returns `true` if it was not already present.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Add every identifier from `ids`.
    pub fn add_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over identifiers in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Identifiers in lexical order, for stable output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.iter().collect();
        ids.sort_unstable();
        ids
    }

    /// Identifiers present in `self` but absent from `other`.
    pub fn difference(&self, other: &ResourceSet) -> ResourceSet {
        ResourceSet {
            ids: self.ids.difference(&other.ids).cloned().collect(),
        }
    }

    /// Union `other` into `self`.
    pub fn merge(&mut self, other: &ResourceSet) {
        self.ids.extend(other.ids.iter().cloned());
    }
}

impl<S: Into<String>> FromIterator<S> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ResourceSet::new();
        set.add_all(iter);
        set
    }
}

/// One [`ResourceSet`] per [`ResourceCategory`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBundle {
    #[serde(default)]
    pub backgrounds: ResourceSet,
    #[serde(default)]
    pub items: ResourceSet,
    #[serde(default)]
    pub characters: ResourceSet,
    #[serde(default)]
    pub sounds: ResourceSet,
}

impl ResourceBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: ResourceCategory) -> &ResourceSet {
        match category {
            ResourceCategory::Backgrounds => &self.backgrounds,
            ResourceCategory::Items => &self.items,
            ResourceCategory::Characters => &self.characters,
            ResourceCategory::Sounds => &self.sounds,
        }
    }

    pub fn get_mut(&mut self, category: ResourceCategory) -> &mut ResourceSet {
        match category {
            ResourceCategory::Backgrounds => &mut self.backgrounds,
            ResourceCategory::Items => &mut self.items,
            ResourceCategory::Characters => &mut self.characters,
            ResourceCategory::Sounds => &mut self.sounds,
        }
    }

    /// Add a single identifier to `category`.
    pub fn add(&mut self, category: ResourceCategory, id: impl Into<String>) -> bool {
        self.get_mut(category).add(id)
    }

    /// Total number of identifiers across all categories.
    pub fn len(&self) -> usize {
        ResourceCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        ResourceCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }

    /// Iterate over `(category, id)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (ResourceCategory, &str)> {
        ResourceCategory::ALL
            .into_iter()
            .flat_map(move |c| self.get(c).iter().map(move |id| (c, id)))
    }

    /// Union every category of `other` into `self`.
    pub fn merge(&mut self, other: &ResourceBundle) {
        for category in ResourceCategory::ALL {
            self.get_mut(category).merge(other.get(category));
        }
    }

    /// Treat `self` as the accumulator: return what `incoming` adds that
    /// `self` has not seen yet, then union `incoming` into `self`.
    ///
    /// Computed category by category. `incoming` is not modified.
    pub fn diff_and_merge(&mut self, incoming: &ResourceBundle) -> ResourceBundle {
        let mut delta = ResourceBundle::new();
        for category in ResourceCategory::ALL {
            let acc = self.get_mut(category);
            *delta.get_mut(category) = incoming.get(category).difference(acc);
            acc.merge(incoming.get(category));
        }
        delta
    }
}
