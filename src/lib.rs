//! Trigger-driven scene engine for terminal interactive fiction.
//!
//! A scene script registers triggers; triggers add and remove drawing, audio
//! and update commands; observers and timers chain triggers into sequences.
//! The player ticks the scene in real time and draws it with crossterm.

pub mod assets;
pub mod audio;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod observer;
pub mod player;
pub mod renderer;
pub mod scene;
pub mod timer;
pub mod trigger;
pub mod types;
