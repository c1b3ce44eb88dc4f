#![allow(dead_code)]

use std::time::Duration;

use ascii_adventure::assets::MemoryTextures;
use ascii_adventure::audio::SilentAudio;
use ascii_adventure::error::SceneError;
use ascii_adventure::scene::Scene;
use ascii_adventure::trigger::Trigger;
use ascii_adventure::types::TerminalContract;
use serde_json::Value;

/// A scene wired to in-memory backends, plus handles to inspect them.
pub struct Stage {
    pub scene: Scene,
    pub textures: MemoryTextures,
    pub audio: SilentAudio,
}

impl Stage {
    pub fn new() -> Self {
        let textures = MemoryTextures::new();
        textures.insert("forest.txt", &["^^", "||"]);
        textures.insert("cave.txt", &["##"]);
        textures.insert("frame.txt", &["."]);
        let audio = SilentAudio::new();
        let scene = Scene::new(
            TerminalContract { width: 20, height: 6 },
            Box::new(textures.clone()),
            Box::new(audio.clone()),
        );
        Self { scene, textures, audio }
    }

    /// Register a trigger written as JSON.
    pub fn add(&mut self, json: Value) {
        let trigger: Trigger = serde_json::from_value(json).unwrap();
        self.scene.register_trigger(trigger).unwrap();
    }

    pub fn run(&mut self, id: &str) -> Result<(), SceneError> {
        self.scene.execute(id)
    }

    pub fn tick(&mut self, secs: f32) {
        self.scene.tick(Duration::from_secs_f32(secs)).unwrap();
    }

    /// How many times the sound loaded from `path` has been started.
    pub fn plays(&self, path: &str) -> usize {
        self.audio.channel(path).map_or(0, |c| c.play_count)
    }

    /// Register a sound `id` loaded from `path` and a trigger `play-<id>` that plays it.
    pub fn sound(&mut self, id: &str, path: &str) {
        self.add(serde_json::json!({
            "type": "add_sound", "trigger_id": format!("load-{id}"), "data_id": id, "path": path
        }));
        self.add(serde_json::json!({
            "type": "play_sound", "trigger_id": format!("play-{id}"), "data_id": id
        }));
        self.run(&format!("load-{id}")).unwrap();
    }
}
