use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FlowError, FlowResult};

/// A chapter's parsed flow document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub commands: Vec<Command>,
}

/// A single instruction: a kind tag plus a kind-specific payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub kind: String,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

impl Command {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

impl FlowDocument {
    pub fn from_json(text: &str) -> FlowResult<Self> {
        serde_json::from_str(text).map_err(|e| FlowError::MalformedFlow(e.to_string()))
    }

    /// Every command in block order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.blocks.iter().flat_map(|b| b.commands.iter())
    }

    pub fn command_count(&self) -> usize {
        self.blocks.iter().map(|b| b.commands.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_with_missing_payload_and_extra_fields() {
        let doc = FlowDocument::from_json(
            r#"{"version":3,"blocks":[{"name":"start","commands":[{"kind":"wait"},{"kind":"play_sound","payload":{"sound":"bell"}}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.command_count(), 2);
        let kinds: Vec<&str> = doc.commands().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec!["wait", "play_sound"]);
        assert_eq!(doc.blocks[0].commands[0].payload, json!({}));
    }

    #[test]
    fn empty_document() {
        let doc = FlowDocument::from_json("{}").unwrap();
        assert_eq!(doc.command_count(), 0);
    }

    #[test]
    fn malformed_document() {
        let err = FlowDocument::from_json(r#"{"blocks":[{"commands":[{"payload":{}}]}]}"#).unwrap_err();
        assert!(matches!(err, FlowError::MalformedFlow(_)));
    }
}
