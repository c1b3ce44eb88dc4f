use crate::assets::Texture;
use crate::types::{DrawOp, Rgb, Style};

use super::{Canvas, Draw};

/// A full-canvas texture.
#[derive(Debug)]
pub struct Background {
    texture: Texture,
    pub tint: Rgb,
}

impl Background {
    pub fn new(texture: Texture) -> Self {
        Self {
            texture,
            tint: Rgb::WHITE,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Swap in a new texture, handing back the old one for release.
    pub fn replace_texture(&mut self, texture: Texture) -> Texture {
        std::mem::replace(&mut self.texture, texture)
    }

    pub fn into_texture(self) -> Texture {
        self.texture
    }
}

impl Draw for Background {
    fn draw(&self, canvas: Canvas, ops: &mut Vec<DrawOp>) {
        let style = Style {
            fg: Some(self.tint.into()),
            ..Default::default()
        };
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                let ch = self.texture.sample(x as usize, y as usize);
                if ch != ' ' {
                    canvas.put(ops, x, y, ch, &style);
                }
            }
        }
    }
}
