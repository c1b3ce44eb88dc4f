//! Audio backend boundary.
//!
//! The stage never decodes or mixes sound itself. Audio commands drive a
//! backend through opaque handles; `dispose` consumes the handle so a channel
//! cannot be freed twice.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Short effects are `Sound`; streamed tracks are `Music`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioKind {
    Sound,
    Music,
}

/// Backend channel handle. Not `Clone`; see module docs.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AudioHandle(u64);

impl AudioHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

pub trait AudioBackend {
    fn load(&mut self, path: &str, kind: AudioKind) -> Result<AudioHandle, SceneError>;
    fn play(&mut self, handle: &AudioHandle, volume: f32, looping: bool);
    fn stop(&mut self, handle: &AudioHandle);
    fn set_volume(&mut self, handle: &AudioHandle, volume: f32);
    fn set_looping(&mut self, handle: &AudioHandle, looping: bool);
    fn dispose(&mut self, handle: AudioHandle);
}

/// Observable state of one channel in `SilentAudio`.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub path: String,
    pub kind: AudioKind,
    pub volume: f32,
    pub looping: bool,
    pub playing: bool,
    pub play_count: usize,
}

#[derive(Default)]
struct Mixer {
    next_id: u64,
    channels: HashMap<u64, Channel>,
    disposed: Vec<u64>,
}

/// A backend that produces no sound but records every call.
///
/// Used by the terminal player, which has no audio device, and by tests.
/// Clones share the same mixer.
#[derive(Clone, Default)]
pub struct SilentAudio {
    mixer: Rc<RefCell<Mixer>>,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the channel most recently loaded from `path`, if still live.
    pub fn channel(&self, path: &str) -> Option<Channel> {
        let mixer = self.mixer.borrow();
        mixer
            .channels
            .iter()
            .filter(|(_, c)| c.path == path)
            .max_by_key(|(id, _)| **id)
            .map(|(_, c)| c.clone())
    }

    pub fn live_channels(&self) -> usize {
        self.mixer.borrow().channels.len()
    }

    pub fn disposed_count(&self) -> usize {
        self.mixer.borrow().disposed.len()
    }

    fn with_channel(&self, handle: &AudioHandle, f: impl FnOnce(&mut Channel)) {
        match self.mixer.borrow_mut().channels.get_mut(&handle.0) {
            Some(channel) => f(channel),
            None => tracing::warn!(handle = handle.0, "audio call on unknown channel"),
        }
    }
}

impl AudioBackend for SilentAudio {
    fn load(&mut self, path: &str, kind: AudioKind) -> Result<AudioHandle, SceneError> {
        let mut mixer = self.mixer.borrow_mut();
        let id = mixer.next_id;
        mixer.next_id += 1;
        mixer.channels.insert(
            id,
            Channel {
                path: path.to_string(),
                kind,
                volume: 1.0,
                looping: false,
                playing: false,
                play_count: 0,
            },
        );
        tracing::debug!(path, ?kind, id, "loaded audio");
        Ok(AudioHandle(id))
    }

    fn play(&mut self, handle: &AudioHandle, volume: f32, looping: bool) {
        self.with_channel(handle, |c| {
            c.volume = volume;
            c.looping = looping;
            c.playing = true;
            c.play_count += 1;
        });
    }

    fn stop(&mut self, handle: &AudioHandle) {
        self.with_channel(handle, |c| c.playing = false);
    }

    fn set_volume(&mut self, handle: &AudioHandle, volume: f32) {
        self.with_channel(handle, |c| c.volume = volume);
    }

    fn set_looping(&mut self, handle: &AudioHandle, looping: bool) {
        self.with_channel(handle, |c| c.looping = looping);
    }

    fn dispose(&mut self, handle: AudioHandle) {
        let mut mixer = self.mixer.borrow_mut();
        mixer.channels.remove(&handle.0);
        mixer.disposed.push(handle.0);
    }
}
