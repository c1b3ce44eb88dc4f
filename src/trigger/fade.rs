use serde::{Deserialize, Serialize};

use crate::command::{FadeOutBackground, FadeOutMusic, UpdateCommand};
use crate::error::SceneError;
use crate::scene::Scene;

use super::{Execute, TriggerHeader};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartMusicFadeOut {
    /// Volume removed per frame.
    pub step: f32,
}

impl Execute for StartMusicFadeOut {
    fn execute(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        if scene.audio(&h.data_id).is_none() {
            return Err(SceneError::UnknownAudio(h.data_id.clone()));
        }
        if self.step.is_nan() || self.step <= 0.0 {
            return Err(SceneError::InvalidFadeStep {
                id: h.data_id.clone(),
                step: self.step,
            });
        }
        scene.add_update(UpdateCommand::FadeOutMusic(FadeOutMusic::new(&h.data_id, self.step)));
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartFadeOutBackground {
    /// Seconds from full brightness to black.
    pub fade_time: f32,
}

impl Execute for StartFadeOutBackground {
    fn execute(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let target = scene
            .drawing_command(h.layer, &h.data_id)
            .ok_or_else(|| SceneError::UnknownCommand {
                layer: h.layer,
                id: h.data_id.clone(),
            })?;
        if target.tint().is_none() {
            return Err(SceneError::WrongCommandKind {
                layer: h.layer,
                id: h.data_id.clone(),
                expected: "background or textbox",
            });
        }
        scene.add_update(UpdateCommand::FadeOutBackground(FadeOutBackground::new(
            h.layer,
            &h.data_id,
            self.fade_time,
        )));
        Ok(())
    }
}
