//! Scene scripts: the JSON form of a scene.
//!
//! A script names the screen size, optional fonts, every trigger the scene
//! registers, and the trigger ids to execute once loading is done.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::assets::TextureStore;
use crate::audio::AudioBackend;
use crate::error::SceneError;
use crate::trigger::Trigger;
use crate::types::{Style, TerminalContract};

use super::Scene;

fn default_width() -> u16 {
    80
}

fn default_height() -> u16 {
    24
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneScript {
    #[serde(default = "default_width")]
    pub width: u16,
    #[serde(default = "default_height")]
    pub height: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fonts: BTreeMap<String, Style>,
    pub triggers: Vec<Trigger>,
    /// Trigger ids executed, in order, right after loading.
    #[serde(default)]
    pub start: Vec<String>,
}

impl SceneScript {
    pub fn contract(&self) -> TerminalContract {
        TerminalContract {
            width: self.width,
            height: self.height,
        }
    }

    /// Static checks that need no assets: duplicate trigger ids and
    /// references to ids the script never defines.
    pub fn validate(&self) -> Vec<SceneError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for trigger in &self.triggers {
            if !seen.insert(trigger.id()) {
                errors.push(SceneError::DuplicateTrigger(trigger.id().to_string()));
            }
        }

        let referenced = self
            .triggers
            .iter()
            .flat_map(Trigger::referenced_ids)
            .chain(self.start.iter().map(String::as_str));
        let mut reported = HashSet::new();
        for id in referenced {
            if !seen.contains(id) && reported.insert(id) {
                errors.push(SceneError::UnknownTrigger(id.to_string()));
            }
        }
        errors
    }

    /// Build the scene: register every trigger, then run the start list.
    ///
    /// `fonts` are defaults from configuration; the script's own fonts win.
    pub fn into_scene(
        self,
        textures: Box<dyn TextureStore>,
        audio: Box<dyn AudioBackend>,
        fonts: &BTreeMap<String, Style>,
    ) -> Result<Scene, SceneError> {
        let mut scene = Scene::new(self.contract(), textures, audio)
            .with_fonts(fonts.clone())
            .with_fonts(self.fonts);
        for trigger in self.triggers {
            scene.register_trigger(trigger)?;
        }
        tracing::info!(triggers = scene.triggers().len(), "scene loaded");

        for id in &self.start {
            scene.execute(id)?;
        }
        Ok(scene)
    }
}
