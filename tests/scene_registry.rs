mod common;

use ascii_adventure::error::SceneError;
use ascii_adventure::renderer::Renderer;
use common::Stage;
use serde_json::json;

fn background(stage: &mut Stage, trigger_id: &str, kind: &str, data_id: &str, path: &str) {
    stage.add(json!({
        "type": kind, "trigger_id": trigger_id, "data_id": data_id, "layer": 0, "path": path
    }));
}

#[test]
fn adding_over_an_occupied_slot_disposes_the_previous_command_once() {
    let mut stage = Stage::new();
    background(&mut stage, "forest", "add_background", "bg", "forest.txt");
    background(&mut stage, "cave", "add_background", "bg", "cave.txt");

    stage.run("forest").unwrap();
    stage.run("cave").unwrap();

    assert_eq!(stage.scene.layer_ids(0), vec!["bg"]);
    assert_eq!(stage.scene.command_count(), 1);
    assert_eq!(stage.textures.released_count("forest.txt"), 1);
    assert_eq!(stage.textures.live_count(), 1);

    let ops = stage.scene.draw().ops;
    assert!(!ops.is_empty());
    assert!(ops.iter().all(|op| op.ch == '#'));
}

#[test]
fn removing_twice_is_a_no_op() {
    let mut stage = Stage::new();
    stage.add(json!({
        "type": "add_static_text", "trigger_id": "say", "data_id": "t", "layer": 1,
        "text": "Hello", "x": 0, "y": 0
    }));
    stage.add(json!({ "type": "remove_static_text", "trigger_id": "unsay", "data_id": "t", "layer": 1 }));

    stage.run("say").unwrap();
    stage.run("unsay").unwrap();
    stage.run("unsay").unwrap();

    assert_eq!(stage.scene.command_count(), 0);
    assert!(!stage.scene.remove_command_from_layer(1, "t"));
}

#[test]
fn set_background_swaps_texture_in_place() {
    let mut stage = Stage::new();
    background(&mut stage, "forest", "add_background", "a", "forest.txt");
    background(&mut stage, "to-cave", "set_background", "a", "cave.txt");
    stage.add(json!({
        "type": "add_static_text", "trigger_id": "say", "data_id": "b", "layer": 0,
        "text": "x", "x": 0, "y": 0
    }));

    stage.run("forest").unwrap();
    stage.run("say").unwrap();
    stage.run("to-cave").unwrap();

    assert_eq!(stage.scene.layer_ids(0), vec!["a", "b"]);
    assert_eq!(stage.textures.released_count("forest.txt"), 1);
    assert_eq!(stage.textures.live_count(), 1);
}

#[test]
fn set_background_rejects_missing_or_foreign_slots_without_leaking() {
    let mut stage = Stage::new();
    background(&mut stage, "nowhere", "set_background", "ghost", "cave.txt");
    background(&mut stage, "onto-text", "set_background", "t", "cave.txt");
    stage.add(json!({
        "type": "add_static_text", "trigger_id": "say", "data_id": "t", "layer": 0,
        "text": "x", "x": 0, "y": 0
    }));
    stage.run("say").unwrap();

    assert!(matches!(stage.run("nowhere"), Err(SceneError::UnknownCommand { layer: 0, .. })));
    assert!(matches!(stage.run("onto-text"), Err(SceneError::WrongCommandKind { .. })));
    assert_eq!(stage.textures.live_count(), 0);
    assert_eq!(stage.textures.released_count("cave.txt"), 2);
}

#[test]
fn textbox_is_set_with_new_geometry() {
    let mut stage = Stage::new();
    stage.add(json!({
        "type": "add_textbox", "trigger_id": "box", "data_id": "tb", "layer": 1,
        "path": "frame.txt", "x": 1, "y": 1, "width": 4, "height": 3
    }));
    stage.add(json!({
        "type": "set_textbox", "trigger_id": "grow", "data_id": "tb", "layer": 1,
        "path": "frame.txt", "x": 0, "y": 0, "width": 8, "height": 5
    }));
    stage.run("box").unwrap();
    let small = stage.scene.draw().ops.len();
    stage.run("grow").unwrap();
    let large = stage.scene.draw().ops.len();

    assert!(large > small);
    assert_eq!(stage.textures.released_count("frame.txt"), 1);
    assert_eq!(stage.scene.command_count(), 1);
}

#[test]
fn higher_layers_paint_over_lower_ones() {
    let mut stage = Stage::new();
    background(&mut stage, "forest", "add_background", "bg", "forest.txt");
    stage.add(json!({
        "type": "add_static_text", "trigger_id": "say", "data_id": "t", "layer": 1,
        "text": "Hi", "x": 0, "y": 0
    }));
    // Registered in the opposite order to their layers.
    stage.run("say").unwrap();
    stage.run("forest").unwrap();

    let contract = stage.scene.contract();
    let grid = Renderer::rasterize(&stage.scene.draw(), &contract);
    assert_eq!(grid[0][0].ch, 'H');
    assert_eq!(grid[0][1].ch, 'i');
    assert_eq!(grid[1][0].ch, '|');
}

#[test]
fn audio_commands_play_and_dispose_once() {
    let mut stage = Stage::new();
    stage.add(json!({
        "type": "add_music", "trigger_id": "load", "data_id": "theme",
        "path": "theme.ogg", "volume": 0.8, "looping": true
    }));
    stage.add(json!({ "type": "play_music", "trigger_id": "play", "data_id": "theme" }));
    stage.add(json!({ "type": "stop_audio", "trigger_id": "stop", "data_id": "theme" }));
    stage.add(json!({ "type": "remove_audio", "trigger_id": "drop", "data_id": "theme" }));

    stage.run("load").unwrap();
    stage.run("play").unwrap();
    let channel = stage.audio.channel("theme.ogg").unwrap();
    assert!(channel.playing);
    assert!(channel.looping);
    assert!((channel.volume - 0.8).abs() < f32::EPSILON);

    stage.run("stop").unwrap();
    assert!(!stage.audio.channel("theme.ogg").unwrap().playing);

    stage.run("drop").unwrap();
    stage.run("drop").unwrap();
    assert_eq!(stage.audio.disposed_count(), 1);
    assert_eq!(stage.audio.live_channels(), 0);
    assert!(matches!(stage.run("play"), Err(SceneError::UnknownAudio(id)) if id == "theme"));
}

#[test]
fn reloading_audio_under_the_same_id_disposes_the_old_channel() {
    let mut stage = Stage::new();
    stage.sound("ding", "ding.wav");
    stage.run("load-ding").unwrap();

    assert_eq!(stage.audio.live_channels(), 1);
    assert_eq!(stage.audio.disposed_count(), 1);
}

#[test]
fn duplicate_trigger_ids_are_rejected() {
    let mut stage = Stage::new();
    stage.add(json!({ "type": "remove_audio", "trigger_id": "x" }));
    let again = serde_json::from_value(json!({ "type": "remove_audio", "trigger_id": "x" })).unwrap();
    assert!(matches!(
        stage.scene.register_trigger(again),
        Err(SceneError::DuplicateTrigger(id)) if id == "x"
    ));
    assert_eq!(stage.scene.triggers().len(), 1);
}

#[test]
fn unknown_fonts_and_assets_fail_the_trigger() {
    let mut stage = Stage::new();
    stage.add(json!({
        "type": "add_static_text", "trigger_id": "fancy", "data_id": "t",
        "text": "x", "x": 0, "y": 0, "font": "gothic"
    }));
    background(&mut stage, "missing", "add_background", "bg", "nowhere.txt");

    assert!(matches!(stage.run("fancy"), Err(SceneError::UnknownFont(name)) if name == "gothic"));
    assert!(matches!(stage.run("missing"), Err(SceneError::MissingAsset { .. })));
    assert_eq!(stage.scene.command_count(), 0);
}

#[test]
fn dropping_the_scene_releases_every_resource() {
    let mut stage = Stage::new();
    background(&mut stage, "forest", "add_background", "bg", "forest.txt");
    stage.add(json!({
        "type": "add_textbox", "trigger_id": "box", "data_id": "tb", "layer": 1,
        "path": "frame.txt", "x": 1, "y": 1, "width": 4, "height": 3
    }));
    stage.sound("ding", "ding.wav");
    stage.run("forest").unwrap();
    stage.run("box").unwrap();

    let Stage { scene, textures, audio } = stage;
    assert_eq!(textures.live_count(), 2);
    drop(scene);
    assert_eq!(textures.live_count(), 0);
    assert_eq!(audio.live_channels(), 0);
    assert_eq!(audio.disposed_count(), 1);
}

#[test]
fn commands_past_the_coordinate_range_draw_nothing() {
    let mut stage = Stage::new();
    stage.add(json!({
        "type": "add_textbox", "trigger_id": "box", "data_id": "tb",
        "path": "frame.txt", "x": 65530, "y": 65530, "width": 10, "height": 10
    }));
    stage.add(json!({
        "type": "add_static_text", "trigger_id": "say", "data_id": "say", "text": "a\nb\nc", "x": 0, "y": 65534
    }));
    stage.add(json!({
        "type": "add_animated_text", "trigger_id": "show", "data_id": "show",
        "text": ["ab\ncd\nef"], "x": 65535, "y": 65534
    }));
    stage.add(json!({
        "type": "add_game_choice_menu", "trigger_id": "choose", "data_id": "menu",
        "item_ids": ["say"], "item_names": ["Stay"], "prompt": "x\ny", "prompt_space": 65535,
        "layout": { "menu_x": 65535, "menu_y": 65534, "item_width": 20, "padding_h": 40000, "padding_v": 3 }
    }));
    for id in ["box", "say", "show", "choose"] {
        stage.run(id).unwrap();
    }
    stage.tick(0.1);

    assert_eq!(stage.scene.command_count(), 4);
    assert!(stage.scene.draw().ops.is_empty());
}
