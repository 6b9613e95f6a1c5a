use serde::Deserialize;
use serde_json::Value;
use storypack_types::{ResourceBundle, ResourceCategory};

use crate::error::FlowResult;
use crate::resolver::{parse_payload, ResourceResolver};

/// `show_item { item }` and `give_item { item }`: same payload, two tags.
pub struct ItemResolver {
    kind: &'static str,
}

impl ItemResolver {
    pub fn show() -> Self {
        Self { kind: "show_item" }
    }

    pub fn give() -> Self {
        Self { kind: "give_item" }
    }
}

#[derive(Deserialize)]
struct ItemPayload {
    item: String,
}

impl ResourceResolver for ItemResolver {
    fn kind(&self) -> &str {
        self.kind
    }

    fn resolve(&self, payload: &Value, bundle: &mut ResourceBundle) -> FlowResult<()> {
        let p: ItemPayload = parse_payload(self.kind, payload)?;
        bundle.add(ResourceCategory::Items, p.item);
        Ok(())
    }
}

/// `choice { options: [{ item? }] }`: options may display an item icon.
pub struct ChoiceResolver;

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    options: Vec<ChoiceOption>,
}

#[derive(Deserialize)]
struct ChoiceOption {
    #[serde(default)]
    item: Option<String>,
}

impl ResourceResolver for ChoiceResolver {
    fn kind(&self) -> &str {
        "choice"
    }

    fn resolve(&self, payload: &Value, bundle: &mut ResourceBundle) -> FlowResult<()> {
        let p: Choice = parse_payload(self.kind(), payload)?;
        bundle
            .items
            .add_all(p.options.into_iter().filter_map(|o| o.item));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn show_and_give_share_payload() {
        let mut bundle = ResourceBundle::new();
        ItemResolver::show().resolve(&json!({ "item": "key" }), &mut bundle).unwrap();
        ItemResolver::give().resolve(&json!({ "item": "lamp" }), &mut bundle).unwrap();
        assert_eq!(bundle.items.sorted(), vec!["key", "lamp"]);
    }

    #[test]
    fn choice_collects_optional_items() {
        let mut bundle = ResourceBundle::new();
        let payload = json!({
            "options": [
                { "text": "Take the key", "item": "key" },
                { "text": "Leave" },
                { "text": "Take the map", "item": "map" }
            ]
        });
        ChoiceResolver.resolve(&payload, &mut bundle).unwrap();
        assert_eq!(bundle.items.sorted(), vec!["key", "map"]);
    }

    #[test]
    fn choice_without_options() {
        let mut bundle = ResourceBundle::new();
        ChoiceResolver.resolve(&json!({}), &mut bundle).unwrap();
        assert!(bundle.is_empty());
    }
}
