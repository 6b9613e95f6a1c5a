use serde::Deserialize;
use serde_json::Value;
use storypack_types::{ResourceBundle, ResourceCategory};

use crate::error::FlowResult;
use crate::resolver::{parse_payload, ResourceResolver};

/// `play_sound { sound }`
pub struct PlaySoundResolver;

#[derive(Deserialize)]
struct PlaySound {
    sound: String,
}

impl ResourceResolver for PlaySoundResolver {
    fn kind(&self) -> &str {
        "play_sound"
    }

    fn resolve(&self, payload: &Value, bundle: &mut ResourceBundle) -> FlowResult<()> {
        let p: PlaySound = parse_payload(self.kind(), payload)?;
        bundle.add(ResourceCategory::Sounds, p.sound);
        Ok(())
    }
}

/// `play_music { track }`. Music tracks share the sounds category.
pub struct PlayMusicResolver;

#[derive(Deserialize)]
struct PlayMusic {
    track: String,
}

impl ResourceResolver for PlayMusicResolver {
    fn kind(&self) -> &str {
        "play_music"
    }

    fn resolve(&self, payload: &Value, bundle: &mut ResourceBundle) -> FlowResult<()> {
        let p: PlayMusic = parse_payload(self.kind(), payload)?;
        bundle.add(ResourceCategory::Sounds, p.track);
        Ok(())
    }
}

/// `dialogue { speaker?, voice? }`: the speaker's portrait and an optional
/// voice line.
pub struct DialogueResolver;

#[derive(Deserialize)]
struct Dialogue {
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default)]
    voice: Option<String>,
}

impl ResourceResolver for DialogueResolver {
    fn kind(&self) -> &str {
        "dialogue"
    }

    fn resolve(&self, payload: &Value, bundle: &mut ResourceBundle) -> FlowResult<()> {
        let p: Dialogue = parse_payload(self.kind(), payload)?;
        if let Some(speaker) = p.speaker {
            bundle.add(ResourceCategory::Characters, speaker);
        }
        if let Some(voice) = p.voice {
            bundle.add(ResourceCategory::Sounds, voice);
        }
        Ok(())
    }
}
