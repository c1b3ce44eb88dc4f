use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::scene::Input;
use crate::types::Style;

/// Player settings read from `~/.config/ascii-adventure/stage.json`.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Target frames per second for the tick loop.
    pub fps: u32,
    pub key_bindings: KeyBindings,
    /// Named text styles available to every scene, merged under the script's own.
    pub fonts: BTreeMap<String, Style>,
    /// Directory texture and sound paths are relative to. Unset means the
    /// directory holding the scene file.
    pub asset_root: Option<PathBuf>,
    /// Log file for `play`; the terminal is busy drawing the scene.
    pub log_file: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: String,
    pub down: String,
    pub select: String,
    pub click: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            up: "Up".into(),
            down: "Down".into(),
            select: "Enter".into(),
            click: "Space".into(),
            quit: "q".into(),
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig {
            fps: 30,
            key_bindings: KeyBindings::default(),
            fonts: BTreeMap::new(),
            asset_root: None,
            log_file: None,
            log_filter: "info".into(),
        }
    }
}

impl StageConfig {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read a config file, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: invalid stage config ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("ascii-adventure");
        path.push("stage.json");
        path
    }

    /// Map a key press to scene input. Quit is handled by the player, not here.
    pub fn input_for(&self, event: &KeyEvent) -> Option<Input> {
        let keys = &self.key_bindings;
        if matches_binding(&keys.up, event) {
            Some(Input::Up)
        } else if matches_binding(&keys.down, event) {
            Some(Input::Down)
        } else if matches_binding(&keys.select, event) {
            Some(Input::Select)
        } else if matches_binding(&keys.click, event) {
            Some(Input::Click)
        } else {
            None
        }
    }

    pub fn is_quit(&self, event: &KeyEvent) -> bool {
        matches_binding(&self.key_bindings.quit, event) || event.code == KeyCode::Esc
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string such as
/// `"q"`, `"Enter"`, `"F5"` or `"Ctrl-c"`.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire on Ctrl or Alt chords.
    if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }
    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_bindings_reject_chords() {
        assert!(matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(matches_binding("Ctrl-q", &key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(matches_binding("F5", &key(KeyCode::F(5), KeyModifiers::NONE)));
        assert!(!matches_binding("Fx", &key(KeyCode::Char('F'), KeyModifiers::NONE)));
    }

    #[test]
    fn default_bindings_map_to_input() {
        let config = StageConfig::default();
        let none = KeyModifiers::NONE;
        assert_eq!(config.input_for(&key(KeyCode::Up, none)), Some(Input::Up));
        assert_eq!(config.input_for(&key(KeyCode::Enter, none)), Some(Input::Select));
        assert_eq!(config.input_for(&key(KeyCode::Char(' '), none)), Some(Input::Click));
        assert_eq!(config.input_for(&key(KeyCode::Char('x'), none)), None);
        assert!(config.is_quit(&key(KeyCode::Char('q'), none)));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stage.json");
        std::fs::write(&path, r#"{"fps": 60, "key_bindings": {"click": "c"}}"#).unwrap();

        let config = StageConfig::load_from(&path);
        assert_eq!(config.fps, 60);
        assert_eq!(config.key_bindings.click, "c");
        assert_eq!(config.key_bindings.select, "Enter");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn missing_or_broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(StageConfig::load_from(&dir.path().join("absent.json")).fps, 30);

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(StageConfig::load_from(&path).fps, 30);
    }
}
