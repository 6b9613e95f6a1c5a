use std::sync::Arc;

use storypack_types::ResourceBundle;
use tracing::debug;

use crate::document::FlowDocument;
use crate::error::FlowResult;
use crate::resolver::ResolverRegistry;

/// Walks a flow document and collects every resource it references.
///
/// Extraction is pure: each call builds and returns its own bundle, so one
/// extractor can be shared by concurrent chapter tasks.
#[derive(Clone, Debug)]
pub struct ReferenceExtractor {
    registry: Arc<ResolverRegistry>,
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new(Arc::new(ResolverRegistry::with_builtin()))
    }
}

impl ReferenceExtractor {
    pub fn new(registry: Arc<ResolverRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    /// Build the bundle of resources referenced by `document`.
    ///
    /// Commands whose kind has no resolver are skipped. A registered kind
    /// with an unreadable payload fails the whole extraction.
    pub fn extract(&self, document: &FlowDocument) -> FlowResult<ResourceBundle> {
        let mut bundle = ResourceBundle::new();
        let mut skipped = 0usize;

        for command in document.commands() {
            match self.registry.get(&command.kind) {
                Some(resolver) => resolver.resolve(&command.payload, &mut bundle)?,
                None => {
                    debug!(kind = %command.kind, "no resolver for command kind; skipping");
                    skipped += 1;
                }
            }
        }

        debug!(
            commands = document.command_count(),
            skipped,
            resources = bundle.len(),
            "references extracted"
        );
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Command};
    use crate::error::FlowError;
    use serde_json::json;

    fn doc(commands: Vec<Command>) -> FlowDocument {
        FlowDocument {
            blocks: vec![Block { commands }],
        }
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let document = doc(vec![
            Command::new("show_background", json!({ "background": "forest" })),
            Command::new("hologram", json!({ "background": "should-not-appear" })),
            Command::new("play_sound", json!({ "sound": "birds" })),
        ]);
        let bundle = ReferenceExtractor::default().extract(&document).unwrap();
        assert_eq!(bundle.backgrounds.sorted(), vec!["forest"]);
        assert_eq!(bundle.sounds.sorted(), vec!["birds"]);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn walks_every_block() {
        let document = FlowDocument {
            blocks: vec![
                Block {
                    commands: vec![Command::new("show_item", json!({ "item": "key" }))],
                },
                Block { commands: vec![] },
                Block {
                    commands: vec![
                        Command::new("give_item", json!({ "item": "key" })),
                        Command::new("dialogue", json!({ "speaker": "mira" })),
                    ],
                },
            ],
        };
        let bundle = ReferenceExtractor::default().extract(&document).unwrap();
        assert_eq!(bundle.items.sorted(), vec!["key"]);
        assert_eq!(bundle.characters.sorted(), vec!["mira"]);
    }

    #[test]
    fn empty_registry_extracts_nothing() {
        let document = doc(vec![Command::new("show_item", json!({ "item": "key" }))]);
        let extractor = ReferenceExtractor::new(Arc::new(ResolverRegistry::new()));
        assert!(extractor.extract(&document).unwrap().is_empty());
    }

    #[test]
    fn bad_payload_for_known_kind_fails() {
        let document = doc(vec![Command::new("play_sound", json!({ "sound": 7 }))]);
        let err = ReferenceExtractor::default().extract(&document).unwrap_err();
        assert!(matches!(err, FlowError::InvalidPayload { .. }));
    }
}
