//! Triggers: named actions that mutate a scene.
//!
//! Each variant lives in a submodule next to its `Execute` implementation.
//! Two id namespaces are in play: `trigger_id` names the trigger itself and is
//! unique within a scene, `data_id` names the command the trigger works on and
//! may be shared by many triggers.

mod audio;
mod drawing;
mod fade;
mod menu;
mod sequence;

pub use audio::AddAudio;
pub use drawing::{AddAnimatedText, AddStaticText, AddTextbox, LineTrigger, SetTexture};
pub use fade::{StartFadeOutBackground, StartMusicFadeOut};
pub use menu::{AddGameChoiceMenu, AddMenu};
pub use sequence::{ObservedSequence, Sequence};

use serde::{Deserialize, Serialize};

use crate::audio::AudioKind;
use crate::error::SceneError;
use crate::scene::Scene;

/// Identity fields shared by every trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerHeader {
    pub trigger_id: String,
    #[serde(default)]
    pub data_id: String,
    #[serde(default)]
    pub layer: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Offset in seconds used when a time-based sequence schedules this trigger.
    #[serde(default)]
    pub time: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(flatten)]
    pub header: TriggerHeader,
    #[serde(flatten)]
    pub action: TriggerAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerAction {
    AddBackground(SetTexture),
    SetBackground(SetTexture),
    RemoveBackground,
    AddTextbox(AddTextbox),
    SetTextbox(AddTextbox),
    RemoveTextbox,
    AddStaticText(AddStaticText),
    RemoveStaticText,
    AddAnimatedText(AddAnimatedText),
    RemoveAnimatedText,
    AddMenu(AddMenu),
    AddGameChoiceMenu(AddGameChoiceMenu),
    RemoveGameChoiceMenu,
    RemoveCommandFromLayer,
    AddSound(AddAudio),
    AddMusic(AddAudio),
    PlaySound,
    PlayMusic,
    StopAudio,
    RemoveAudio,
    StartMusicFadeOut(StartMusicFadeOut),
    StartFadeOutBackground(StartFadeOutBackground),
    RunMultipleTriggers(Sequence),
    StartTimeBasedSequence(Sequence),
    RunAfterAnimatedTextClicked(ObservedSequence),
    RunDirectlyAfterAnimatedText(ObservedSequence),
}

/// Perform a trigger variant against the scene.
pub trait Execute {
    fn execute(&self, header: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError>;
}

impl Trigger {
    pub fn new(header: TriggerHeader, action: TriggerAction) -> Self {
        Self { header, action }
    }

    pub fn id(&self) -> &str {
        &self.header.trigger_id
    }

    /// Run the trigger. Most callers go through `Scene::execute`, which also
    /// enforces the nesting limit.
    pub fn execute(&self, scene: &mut Scene) -> Result<(), SceneError> {
        let h = &self.header;
        match &self.action {
            TriggerAction::AddBackground(t) => t.add_background(h, scene),
            TriggerAction::SetBackground(t) => t.set_background(h, scene),
            TriggerAction::AddTextbox(t) => t.add_textbox(h, scene),
            TriggerAction::SetTextbox(t) => t.set_textbox(h, scene),
            TriggerAction::AddStaticText(t) => t.execute(h, scene),
            TriggerAction::AddAnimatedText(t) => t.execute(h, scene),
            TriggerAction::AddMenu(t) => t.execute(h, scene),
            TriggerAction::AddGameChoiceMenu(t) => t.execute(h, scene),
            TriggerAction::RemoveBackground
            | TriggerAction::RemoveTextbox
            | TriggerAction::RemoveStaticText
            | TriggerAction::RemoveAnimatedText
            | TriggerAction::RemoveGameChoiceMenu
            | TriggerAction::RemoveCommandFromLayer => {
                scene.remove_command_from_layer(h.layer, &h.data_id);
                Ok(())
            }
            TriggerAction::AddSound(t) => t.load(h, scene, AudioKind::Sound),
            TriggerAction::AddMusic(t) => t.load(h, scene, AudioKind::Music),
            TriggerAction::PlaySound | TriggerAction::PlayMusic => scene.play_audio(&h.data_id),
            TriggerAction::StopAudio => scene.stop_audio(&h.data_id),
            TriggerAction::RemoveAudio => {
                scene.remove_audio(&h.data_id);
                Ok(())
            }
            TriggerAction::StartMusicFadeOut(t) => t.execute(h, scene),
            TriggerAction::StartFadeOutBackground(t) => t.execute(h, scene),
            TriggerAction::RunMultipleTriggers(t) => t.run_all(scene),
            TriggerAction::StartTimeBasedSequence(t) => t.schedule(scene),
            TriggerAction::RunAfterAnimatedTextClicked(t) => t.after_click(h, scene),
            TriggerAction::RunDirectlyAfterAnimatedText(t) => t.immediately_after(h, scene),
        }
    }

    /// Every trigger id this trigger refers to, for static checking.
    pub fn referenced_ids(&self) -> Vec<&str> {
        match &self.action {
            TriggerAction::AddAnimatedText(t) => {
                t.line_triggers.iter().map(|l| l.trigger_id.as_str()).collect()
            }
            TriggerAction::AddMenu(t) => t.item_ids.iter().map(String::as_str).collect(),
            TriggerAction::AddGameChoiceMenu(t) => t.item_ids.iter().map(String::as_str).collect(),
            TriggerAction::RunMultipleTriggers(t) | TriggerAction::StartTimeBasedSequence(t) => {
                t.trigger_ids.iter().map(String::as_str).collect()
            }
            TriggerAction::RunAfterAnimatedTextClicked(t)
            | TriggerAction::RunDirectlyAfterAnimatedText(t) => {
                t.trigger_ids.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }
}
