mod common;

use std::time::Duration;

use ascii_adventure::command::{FadeOutMusic, UpdateCommand};
use ascii_adventure::error::SceneError;
use ascii_adventure::types::Rgb;
use common::Stage;
use serde_json::json;

fn music(stage: &mut Stage) {
    stage.add(json!({
        "type": "add_music", "trigger_id": "load", "data_id": "theme", "path": "theme.ogg", "volume": 1.0
    }));
    stage.add(json!({ "type": "play_music", "trigger_id": "play", "data_id": "theme" }));
    stage.run("load").unwrap();
    stage.run("play").unwrap();
}

fn forest(stage: &mut Stage) {
    stage.add(json!({
        "type": "add_background", "trigger_id": "forest", "data_id": "bg", "layer": 0, "path": "forest.txt"
    }));
    stage.run("forest").unwrap();
}

fn fade_progress(stage: &Stage) -> Option<f32> {
    stage.scene.update_commands().find_map(|u| match u {
        UpdateCommand::FadeOutBackground(f) => Some(f.progress()),
        _ => None,
    })
}

fn tint(stage: &Stage) -> Option<Rgb> {
    stage.scene.drawing_command(0, "bg").and_then(|c| c.tint())
}

#[test]
fn music_fade_ends_on_the_tenth_frame_without_going_negative() {
    let mut stage = Stage::new();
    music(&mut stage);
    stage.add(json!({ "type": "start_music_fade_out", "trigger_id": "fade", "data_id": "theme", "step": 0.1 }));
    stage.run("fade").unwrap();
    assert_eq!(stage.scene.active_updates(), 1);

    for frame in 1..=9 {
        stage.tick(1.0 / 30.0);
        let volume = stage.scene.audio_volume("theme").unwrap();
        let expected = 1.0 - 0.1 * frame as f32;
        assert!((volume - expected).abs() < 1e-4, "frame {frame}: {volume}");
        assert!(volume > 0.0);
    }

    stage.tick(1.0 / 30.0);
    assert!(stage.scene.audio("theme").is_none());
    assert_eq!(stage.scene.active_updates(), 0);
    assert_eq!(stage.audio.live_channels(), 0);
    assert_eq!(stage.audio.disposed_count(), 1);
}

#[test]
fn music_fade_of_missing_audio_is_rejected() {
    let mut stage = Stage::new();
    stage.add(json!({ "type": "start_music_fade_out", "trigger_id": "fade", "data_id": "theme", "step": 0.1 }));
    assert!(matches!(stage.run("fade"), Err(SceneError::UnknownAudio(_))));
    assert_eq!(stage.scene.active_updates(), 0);
}

#[test]
fn music_fade_that_never_reaches_silence_is_rejected() {
    let mut stage = Stage::new();
    music(&mut stage);
    stage.add(json!({ "type": "start_music_fade_out", "trigger_id": "still", "data_id": "theme", "step": 0.0 }));
    stage.add(json!({ "type": "start_music_fade_out", "trigger_id": "louder", "data_id": "theme", "step": -0.1 }));

    assert!(matches!(stage.run("still"), Err(SceneError::InvalidFadeStep { .. })));
    assert!(matches!(stage.run("louder"), Err(SceneError::InvalidFadeStep { step, .. }) if step < 0.0));
    assert_eq!(stage.scene.active_updates(), 0);
    assert_eq!(stage.scene.audio_volume("theme"), Some(1.0));
}

#[test]
fn background_fade_interpolates_then_removes() {
    let mut stage = Stage::new();
    forest(&mut stage);
    stage.add(json!({
        "type": "start_fade_out_background", "trigger_id": "dusk", "data_id": "bg", "layer": 0, "fade_time": 2.0
    }));
    stage.run("dusk").unwrap();
    assert_eq!(tint(&stage), Some(Rgb::WHITE));

    stage.tick(0.5);
    stage.tick(0.5);
    assert_eq!(fade_progress(&stage), Some(0.5));
    assert_eq!(tint(&stage), Some(Rgb { r: 128, g: 128, b: 128 }));

    stage.tick(0.5);
    assert_eq!(tint(&stage), Some(Rgb { r: 64, g: 64, b: 64 }));

    stage.tick(0.5);
    assert!(stage.scene.drawing_command(0, "bg").is_none());
    assert_eq!(stage.scene.active_updates(), 0);
    assert_eq!(stage.textures.released_count("forest.txt"), 1);
}

#[test]
fn background_fade_stops_quietly_when_its_target_is_removed() {
    let mut stage = Stage::new();
    forest(&mut stage);
    stage.add(json!({
        "type": "start_fade_out_background", "trigger_id": "dusk", "data_id": "bg", "fade_time": 2.0
    }));
    stage.add(json!({ "type": "remove_background", "trigger_id": "clear", "data_id": "bg" }));

    stage.run("dusk").unwrap();
    stage.tick(0.5);
    stage.run("clear").unwrap();
    stage.tick(0.5);
    stage.tick(2.0);

    assert_eq!(stage.scene.active_updates(), 0);
    assert_eq!(stage.textures.released_count("forest.txt"), 1);
}

#[test]
fn background_fade_needs_a_textured_command() {
    let mut stage = Stage::new();
    stage.add(json!({
        "type": "add_static_text", "trigger_id": "say", "data_id": "bg", "text": "x", "x": 0, "y": 0
    }));
    stage.add(json!({
        "type": "start_fade_out_background", "trigger_id": "dusk", "data_id": "bg", "fade_time": 1.0
    }));
    stage.add(json!({
        "type": "start_fade_out_background", "trigger_id": "void", "data_id": "none", "fade_time": 1.0
    }));
    stage.run("say").unwrap();

    assert!(matches!(stage.run("dusk"), Err(SceneError::WrongCommandKind { .. })));
    assert!(matches!(stage.run("void"), Err(SceneError::UnknownCommand { .. })));
}

#[test]
fn removed_update_is_never_ticked() {
    let mut stage = Stage::new();
    music(&mut stage);
    let id = stage
        .scene
        .add_update(UpdateCommand::FadeOutMusic(FadeOutMusic::new("theme", 0.5)));
    assert!(stage.scene.update_command(id).is_some());

    assert!(stage.scene.remove_update(id).is_some());
    stage.scene.tick(Duration::from_millis(33)).unwrap();
    assert_eq!(stage.scene.audio_volume("theme"), Some(1.0));
}
