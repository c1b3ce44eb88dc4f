use crate::scene::Scene;
use crate::types::Rgb;

use super::{Update, UpdateStatus};

/// Volumes at or below this count as silent. Ten steps of 0.1 from 1.0 do
/// not land on exactly 0 in `f32`.
pub const VOLUME_EPSILON: f32 = 1e-4;

/// Lowers a music track's volume by a fixed step each frame, then removes it.
#[derive(Debug)]
pub struct FadeOutMusic {
    audio_id: String,
    step: f32,
    ended: bool,
}

impl FadeOutMusic {
    pub fn new(audio_id: &str, step: f32) -> Self {
        Self {
            audio_id: audio_id.to_string(),
            step,
            ended: false,
        }
    }
}

impl Update for FadeOutMusic {
    fn update(&mut self, _delta: f32, scene: &mut Scene) -> UpdateStatus {
        if self.ended {
            return UpdateStatus::Ended;
        }
        let Some(volume) = scene.audio_volume(&self.audio_id) else {
            tracing::debug!(audio = %self.audio_id, "fade target gone");
            self.ended = true;
            return UpdateStatus::Ended;
        };

        let next = volume - self.step;
        if next > VOLUME_EPSILON {
            scene.set_audio_volume(&self.audio_id, next);
            UpdateStatus::Running
        } else {
            scene.set_audio_volume(&self.audio_id, 0.0);
            self.end(scene);
            UpdateStatus::Ended
        }
    }

    fn end(&mut self, scene: &mut Scene) {
        if std::mem::replace(&mut self.ended, true) {
            return;
        }
        scene.remove_audio(&self.audio_id);
    }
}

/// Interpolates a textured command's tint from white to black over a fixed
/// duration, then removes it from its layer.
#[derive(Debug)]
pub struct FadeOutBackground {
    layer: i32,
    id: String,
    duration: f32,
    elapsed: f32,
    progress: f32,
    from: Rgb,
    to: Rgb,
    ended: bool,
}

impl FadeOutBackground {
    pub fn new(layer: i32, id: &str, duration: f32) -> Self {
        Self {
            layer,
            id: id.to_string(),
            duration,
            elapsed: 0.0,
            progress: 0.0,
            from: Rgb::WHITE,
            to: Rgb::BLACK,
            ended: false,
        }
    }

    /// Interpolation factor applied on the most recent frame.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Update for FadeOutBackground {
    fn update(&mut self, delta: f32, scene: &mut Scene) -> UpdateStatus {
        if self.ended {
            return UpdateStatus::Ended;
        }
        self.elapsed += delta;

        if self.elapsed < self.duration {
            self.progress = self.elapsed / self.duration;
            let tint = self.from.lerp(self.to, self.progress);
            let recoloured = scene
                .drawing_command_mut(self.layer, &self.id)
                .is_some_and(|cmd| cmd.set_tint(tint));
            if recoloured {
                return UpdateStatus::Running;
            }
            tracing::debug!(layer = self.layer, id = %self.id, "fade target gone");
            self.ended = true;
            return UpdateStatus::Ended;
        }

        self.progress = 1.0;
        self.end(scene);
        UpdateStatus::Ended
    }

    fn end(&mut self, scene: &mut Scene) {
        if std::mem::replace(&mut self.ended, true) {
            return;
        }
        scene.remove_command_from_layer(self.layer, &self.id);
    }
}
