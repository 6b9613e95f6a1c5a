use serde::Deserialize;
use serde_json::Value;
use storypack_types::{ResourceBundle, ResourceCategory};

use crate::error::FlowResult;
use crate::resolver::{parse_payload, ResourceResolver};

/// `show_background { background }`
pub struct ShowBackgroundResolver;

#[derive(Deserialize)]
struct ShowBackground {
    background: String,
}

impl ResourceResolver for ShowBackgroundResolver {
    fn kind(&self) -> &str {
        "show_background"
    }

    fn resolve(&self, payload: &Value, bundle: &mut ResourceBundle) -> FlowResult<()> {
        let p: ShowBackground = parse_payload(self.kind(), payload)?;
        bundle.add(ResourceCategory::Backgrounds, p.background);
        Ok(())
    }
}

/// `show_character { character }`
pub struct ShowCharacterResolver;

#[derive(Deserialize)]
struct ShowCharacter {
    character: String,
}

impl ResourceResolver for ShowCharacterResolver {
    fn kind(&self) -> &str {
        "show_character"
    }

    fn resolve(&self, payload: &Value, bundle: &mut ResourceBundle) -> FlowResult<()> {
        let p: ShowCharacter = parse_payload(self.kind(), payload)?;
        bundle.add(ResourceCategory::Characters, p.character);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn background_ignores_extra_fields() {
        let mut bundle = ResourceBundle::new();
        ShowBackgroundResolver
            .resolve(&json!({ "background": "forest", "fade": 0.5 }), &mut bundle)
            .unwrap();
        assert_eq!(bundle.backgrounds.sorted(), vec!["forest"]);
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn character_requires_field() {
        let mut bundle = ResourceBundle::new();
        assert!(ShowCharacterResolver.resolve(&json!({}), &mut bundle).is_err());
        assert!(bundle.is_empty());
    }
}
