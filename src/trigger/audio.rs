use serde::{Deserialize, Serialize};

use crate::audio::AudioKind;
use crate::error::SceneError;
use crate::scene::Scene;

use super::TriggerHeader;

fn default_volume() -> f32 {
    1.0
}

/// Load a sound effect or music track under the trigger's data id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAudio {
    pub path: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub looping: bool,
}

impl AddAudio {
    pub fn load(&self, h: &TriggerHeader, scene: &mut Scene, kind: AudioKind) -> Result<(), SceneError> {
        scene.load_audio(&h.data_id, kind, &self.path, self.volume, self.looping)
    }
}
