//! Built-in resolvers.

pub mod audio;
pub mod inventory;
pub mod scene;

use std::sync::Arc;

use crate::resolver::ResourceResolver;

pub use audio::{DialogueResolver, PlayMusicResolver, PlaySoundResolver};
pub use inventory::{ChoiceResolver, ItemResolver};
pub use scene::{ShowBackgroundResolver, ShowCharacterResolver};

/// Every built-in resolver, one per kind tag.
pub fn builtin() -> Vec<Arc<dyn ResourceResolver>> {
    vec![
        Arc::new(ShowBackgroundResolver),
        Arc::new(ShowCharacterResolver),
        Arc::new(ItemResolver::show()),
        Arc::new(ItemResolver::give()),
        Arc::new(ChoiceResolver),
        Arc::new(DialogueResolver),
        Arc::new(PlaySoundResolver),
        Arc::new(PlayMusicResolver),
    ]
}
