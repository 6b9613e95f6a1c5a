use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A partition of the resource identifier namespace.
///
/// Identifiers are unique per category, not globally: a background and a
/// sound may share the name `"rain"` without colliding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Backgrounds,
    Items,
    Characters,
    Sounds,
}

impl ResourceCategory {
    /// All categories in canonical order.
    pub const ALL: [ResourceCategory; 4] = [
        ResourceCategory::Backgrounds,
        ResourceCategory::Items,
        ResourceCategory::Characters,
        ResourceCategory::Sounds,
    ];

    /// The lowercase name used in documents and on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backgrounds => "backgrounds",
            Self::Items => "items",
            Self::Characters => "characters",
            Self::Sounds => "sounds",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_name() {
        for cat in ResourceCategory::ALL {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{cat}\""));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Sounds".parse::<ResourceCategory>().unwrap(), ResourceCategory::Sounds);
        assert_eq!("items".parse::<ResourceCategory>().unwrap(), ResourceCategory::Items);
    }

    #[test]
    fn parse_unknown() {
        let err = "music".parse::<ResourceCategory>().unwrap_err();
        assert_eq!(err, TypeError::UnknownCategory("music".into()));
    }
}
