use std::path::{Path, PathBuf};
use std::{fs, process};

use anyhow::{Context, Result, bail};

use ascii_adventure::{
    assets::FsTextures,
    audio::SilentAudio,
    config::StageConfig,
    logging,
    player::Player,
    scene::script::SceneScript,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "ascii-adventure play <scene.json>";
const CHECK_USAGE: &str = "ascii-adventure check <scene.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            play(Path::new(&path))
        }
        Some("check") => {
            let path = args.next().context(CHECK_USAGE)?;
            check(Path::new(&path))
        }
        _ => bail!(
            "ASCII Adventure: terminal interactive fiction stage\n\nUsage:\n  {PLAY_USAGE}\n  {CHECK_USAGE}"
        ),
    }
}

fn read_script(path: &Path) -> Result<SceneScript> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn asset_root(config: &StageConfig, script_path: &Path) -> PathBuf {
    config.asset_root.clone().unwrap_or_else(|| {
        script_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    })
}

fn play(path: &Path) -> Result<()> {
    let config = StageConfig::load();
    let _guard = match &config.log_file {
        Some(log_file) => Some(
            logging::init_file(log_file, &config.log_filter)
                .with_context(|| format!("Failed to open log file {}", log_file.display()))?,
        ),
        None => None,
    };

    let script = read_script(path)?;
    let textures = FsTextures::new(asset_root(&config, path));
    let scene = script
        .into_scene(Box::new(textures), Box::new(SilentAudio::new()), &config.fonts)
        .with_context(|| format!("Failed to load scene {}", path.display()))?;

    let mut player = Player::new(scene, config);
    player.play()
}

fn check(path: &Path) -> Result<()> {
    let config = StageConfig::load();
    logging::init_stderr(&config.log_filter);

    let script = read_script(path)?;
    let errors = script.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("  {e}");
        }
        bail!("{} problem(s) in {}", errors.len(), path.display());
    }

    let triggers = script.triggers.len();
    let start = script.start.len();
    let textures = FsTextures::new(asset_root(&config, path));
    let scene = script
        .into_scene(Box::new(textures), Box::new(SilentAudio::new()), &config.fonts)
        .with_context(|| format!("Failed to load scene {}", path.display()))?;

    eprintln!(
        "{}: {} triggers, {} start triggers, {} commands after start",
        path.display(),
        triggers,
        start,
        scene.command_count(),
    );
    Ok(())
}
