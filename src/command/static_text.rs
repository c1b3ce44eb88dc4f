use crate::types::{DrawOp, Style};

use super::{Canvas, Draw, offset};

/// Fixed text; `\n` starts a new row.
#[derive(Debug, Clone)]
pub struct StaticText {
    pub text: String,
    pub x: u16,
    pub y: u16,
    pub style: Style,
}

impl Draw for StaticText {
    fn draw(&self, canvas: Canvas, ops: &mut Vec<DrawOp>) {
        for (row, line) in self.text.split('\n').enumerate() {
            let Some(y) = offset(self.y, row) else {
                break;
            };
            canvas.put_str(ops, self.x, y, line, &self.style);
        }
    }
}
