use crate::audio::{AudioBackend, AudioHandle, AudioKind};
use crate::error::SceneError;

/// A loaded sound or music track and its playback settings.
#[derive(Debug)]
pub struct AudioCommand {
    pub id: String,
    pub kind: AudioKind,
    volume: f32,
    looping: bool,
    handle: AudioHandle,
}

impl AudioCommand {
    pub fn load(
        backend: &mut dyn AudioBackend,
        id: &str,
        kind: AudioKind,
        path: &str,
        volume: f32,
        looping: bool,
    ) -> Result<Self, SceneError> {
        let handle = backend.load(path, kind)?;
        backend.set_volume(&handle, volume);
        backend.set_looping(&handle, looping);
        Ok(Self {
            id: id.to_string(),
            kind,
            volume,
            looping,
            handle,
        })
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn play(&self, backend: &mut dyn AudioBackend) {
        backend.play(&self.handle, self.volume, self.looping);
    }

    pub fn stop(&self, backend: &mut dyn AudioBackend) {
        backend.stop(&self.handle);
    }

    pub fn set_volume(&mut self, backend: &mut dyn AudioBackend, volume: f32) {
        self.volume = volume;
        backend.set_volume(&self.handle, volume);
    }

    pub fn set_looping(&mut self, backend: &mut dyn AudioBackend, looping: bool) {
        self.looping = looping;
        backend.set_looping(&self.handle, looping);
    }

    /// Stop playback and free the backend channel. Consumes the command.
    pub fn dispose(self, backend: &mut dyn AudioBackend) {
        backend.stop(&self.handle);
        backend.dispose(self.handle);
    }
}
