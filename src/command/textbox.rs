use crate::assets::Texture;
use crate::types::{DrawOp, Rgb, Style};

use super::{Canvas, Draw};

/// A framed panel whose interior is filled with a tiled texture.
#[derive(Debug)]
pub struct Textbox {
    texture: Texture,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub tint: Rgb,
}

impl Textbox {
    pub fn new(texture: Texture, x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            texture,
            x,
            y,
            width,
            height,
            tint: Rgb::WHITE,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Swap in a new texture and geometry, handing back the old texture.
    pub fn replace(&mut self, texture: Texture, x: u16, y: u16, width: u16, height: u16) -> Texture {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        std::mem::replace(&mut self.texture, texture)
    }

    pub fn into_texture(self) -> Texture {
        self.texture
    }
}

fn draw_frame(canvas: Canvas, ops: &mut Vec<DrawOp>, x: u16, y: u16, w: u16, h: u16, style: &Style) {
    if w < 2 || h < 2 {
        return;
    }
    let right = x.saturating_add(w - 1);
    let bottom = y.saturating_add(h - 1);

    canvas.put(ops, x, y, '┌', style);
    canvas.put(ops, right, y, '┐', style);
    canvas.put(ops, x, bottom, '└', style);
    canvas.put(ops, right, bottom, '┘', style);
    for i in x.saturating_add(1)..right {
        canvas.put(ops, i, y, '─', style);
        canvas.put(ops, i, bottom, '─', style);
    }
    for j in y.saturating_add(1)..bottom {
        canvas.put(ops, x, j, '│', style);
        canvas.put(ops, right, j, '│', style);
    }
}

impl Draw for Textbox {
    fn draw(&self, canvas: Canvas, ops: &mut Vec<DrawOp>) {
        let style = Style {
            fg: Some(self.tint.into()),
            ..Default::default()
        };
        draw_frame(canvas, ops, self.x, self.y, self.width, self.height, &style);

        // Interior is filled even with blanks so the box hides what lies beneath.
        for row in 1..self.height.saturating_sub(1) {
            for col in 1..self.width.saturating_sub(1) {
                let ch = self.texture.sample((col - 1) as usize, (row - 1) as usize);
                canvas.put(ops, self.x.saturating_add(col), self.y.saturating_add(row), ch, &style);
            }
        }
    }
}
