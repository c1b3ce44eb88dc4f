use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;

use ascii_adventure::assets::FsTextures;
use ascii_adventure::audio::SilentAudio;
use ascii_adventure::error::SceneError;
use ascii_adventure::renderer::Renderer;
use ascii_adventure::scene::script::SceneScript;
use ascii_adventure::types::{Color, NamedColor, Style};

const SCENE: &str = r#"{
    "width": 16,
    "height": 4,
    "fonts": { "title": { "fg": "yellow", "bold": true } },
    "triggers": [
        { "type": "add_background", "trigger_id": "bg", "data_id": "bg", "layer": 0, "path": "stars.txt" },
        { "type": "add_static_text", "trigger_id": "title", "data_id": "title", "layer": 1,
          "text": "NIGHT", "x": 2, "y": 1, "font": "title" },
        { "type": "add_animated_text", "trigger_id": "intro", "data_id": "intro", "layer": 2,
          "text": ["It is late."], "x": 0, "y": 3, "speed": 0 },
        { "type": "remove_static_text", "trigger_id": "untitle", "data_id": "title", "layer": 1 },
        { "type": "run_after_animated_text_clicked", "trigger_id": "wait", "data_id": "intro", "layer": 2,
          "trigger_ids": ["untitle"] },
        { "type": "run_multiple_triggers", "trigger_id": "boot", "trigger_ids": ["bg", "title", "intro", "wait"] }
    ],
    "start": ["boot"]
}"#;

#[test]
fn script_loads_assets_from_disk_and_runs_its_start_list() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stars.txt"), ".  *\n").unwrap();

    let script: SceneScript = serde_json::from_str(SCENE).unwrap();
    assert!(script.validate().is_empty());

    let mut scene = script
        .into_scene(Box::new(FsTextures::new(dir.path())), Box::new(SilentAudio::new()), &BTreeMap::new())
        .unwrap();
    assert_eq!(scene.command_count(), 3);

    let contract = scene.contract();
    let grid = Renderer::rasterize(&scene.draw(), &contract);
    assert_eq!(grid[1][2].ch, 'N');
    assert_eq!(grid[1][2].style.fg, Some(Color::Named(NamedColor::Yellow)));
    assert_eq!(grid[0][0].ch, '.');

    scene.tick(Duration::from_millis(33)).unwrap();
    scene.click().unwrap();
    scene.tick(Duration::from_millis(33)).unwrap();
    assert!(scene.drawing_command(1, "title").is_none());
}

#[test]
fn configured_fonts_are_overridden_by_the_script() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stars.txt"), "*").unwrap();

    let mut fonts = BTreeMap::new();
    fonts.insert("title".to_string(), Style { dim: true, ..Default::default() });
    fonts.insert("plain".to_string(), Style { dim: true, ..Default::default() });

    let script: SceneScript = serde_json::from_str(SCENE).unwrap();
    let scene = script
        .into_scene(Box::new(FsTextures::new(dir.path())), Box::new(SilentAudio::new()), &fonts)
        .unwrap();

    assert!(scene.font("title").unwrap().bold);
    assert!(scene.font("plain").unwrap().dim);
    assert!(scene.font("").unwrap().is_default());
}

#[test]
fn missing_texture_fails_the_start_list() {
    let dir = tempfile::tempdir().unwrap();
    let script: SceneScript = serde_json::from_str(SCENE).unwrap();
    let result = script.into_scene(Box::new(FsTextures::new(dir.path())), Box::new(SilentAudio::new()), &BTreeMap::new());
    assert!(matches!(result, Err(SceneError::MissingAsset { .. })));
}
