//! Commands: the stateful objects a scene is made of.
//!
//! Drawing commands live in layers and emit `DrawOp`s every frame. Audio
//! commands hold playback state. Update commands are ticked every frame until
//! they end, then deregister.

mod animated_text;
mod audio;
mod background;
mod fade;
mod menu;
mod static_text;
mod textbox;

pub use animated_text::{AnimatedText, TextEvents, TextLayout, TextReveal, wrap_line};
pub use audio::AudioCommand;
pub use background::Background;
pub use fade::{FadeOutBackground, FadeOutMusic, VOLUME_EPSILON};
pub use menu::{Menu, MenuItem, MenuLayout, Prompt};
pub use static_text::StaticText;
pub use textbox::Textbox;

use crate::assets::TextureStore;
use crate::scene::Scene;
use crate::types::{DrawOp, Rgb, Style};

/// Where a drawing command is painting this frame.
#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    pub width: u16,
    pub height: u16,
    pub z_order: i32,
}

impl Canvas {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Push a single cell if it lies on the canvas.
    pub fn put(&self, ops: &mut Vec<DrawOp>, x: u16, y: u16, ch: char, style: &Style) {
        if self.contains(x, y) {
            ops.push(DrawOp {
                x,
                y,
                ch,
                style: style.clone(),
                z_order: self.z_order,
            });
        }
    }

    /// Push a run of characters starting at (x, y), clipped at the right edge.
    pub fn put_str(&self, ops: &mut Vec<DrawOp>, x: u16, y: u16, text: &str, style: &Style) {
        for (i, ch) in text.chars().enumerate() {
            let Some(cx) = offset(x, i) else {
                break;
            };
            self.put(ops, cx, y, ch, style);
        }
    }
}

/// `base` moved by `by` cells, or `None` once past the coordinate range.
pub fn offset(base: u16, by: usize) -> Option<u16> {
    u16::try_from(by).ok().and_then(|by| base.checked_add(by))
}

/// Emit a frame's worth of draw operations.
pub trait Draw {
    fn draw(&self, canvas: Canvas, ops: &mut Vec<DrawOp>);
}

pub enum DrawingCommand {
    Background(Background),
    Textbox(Textbox),
    StaticText(StaticText),
    AnimatedText(AnimatedText),
    Menu(Menu),
}

impl Draw for DrawingCommand {
    fn draw(&self, canvas: Canvas, ops: &mut Vec<DrawOp>) {
        match self {
            DrawingCommand::Background(c) => c.draw(canvas, ops),
            DrawingCommand::Textbox(c) => c.draw(canvas, ops),
            DrawingCommand::StaticText(c) => c.draw(canvas, ops),
            DrawingCommand::AnimatedText(c) => c.draw(canvas, ops),
            DrawingCommand::Menu(c) => c.draw(canvas, ops),
        }
    }
}

impl DrawingCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawingCommand::Background(_) => "background",
            DrawingCommand::Textbox(_) => "textbox",
            DrawingCommand::StaticText(_) => "static text",
            DrawingCommand::AnimatedText(_) => "animated text",
            DrawingCommand::Menu(_) => "menu",
        }
    }

    /// Give owned resources back to their store. Consumes the command.
    pub fn dispose(self, textures: &mut dyn TextureStore) {
        match self {
            DrawingCommand::Background(c) => textures.release(c.into_texture()),
            DrawingCommand::Textbox(c) => textures.release(c.into_texture()),
            DrawingCommand::StaticText(_) | DrawingCommand::AnimatedText(_) => {}
            DrawingCommand::Menu(_) => {}
        }
    }

    /// Recolour a textured command. Returns false for commands without a tint.
    pub fn set_tint(&mut self, tint: Rgb) -> bool {
        match self {
            DrawingCommand::Background(c) => {
                c.tint = tint;
                true
            }
            DrawingCommand::Textbox(c) => {
                c.tint = tint;
                true
            }
            _ => false,
        }
    }

    pub fn tint(&self) -> Option<Rgb> {
        match self {
            DrawingCommand::Background(c) => Some(c.tint),
            DrawingCommand::Textbox(c) => Some(c.tint),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Update commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Running,
    Ended,
}

/// A per-frame animation that ends itself.
///
/// `update` is never called again once it has returned `Ended`.
pub trait Update {
    fn update(&mut self, delta: f32, scene: &mut Scene) -> UpdateStatus;
    fn end(&mut self, scene: &mut Scene);
}

#[derive(Debug)]
pub enum UpdateCommand {
    FadeOutMusic(FadeOutMusic),
    FadeOutBackground(FadeOutBackground),
}

impl Update for UpdateCommand {
    fn update(&mut self, delta: f32, scene: &mut Scene) -> UpdateStatus {
        match self {
            UpdateCommand::FadeOutMusic(u) => u.update(delta, scene),
            UpdateCommand::FadeOutBackground(u) => u.update(delta, scene),
        }
    }

    fn end(&mut self, scene: &mut Scene) {
        match self {
            UpdateCommand::FadeOutMusic(u) => u.end(scene),
            UpdateCommand::FadeOutBackground(u) => u.end(scene),
        }
    }
}
