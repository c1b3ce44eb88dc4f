use std::rc::Weak;

use serde::{Deserialize, Serialize};

use crate::trigger::Trigger;
use crate::types::{Color, DrawOp, NamedColor, Style};

use super::{Canvas, Draw, offset};

/// Geometry of a vertical menu, in terminal cells.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MenuLayout {
    /// Blank rows between items.
    #[serde(default)]
    pub space: u16,
    #[serde(default)]
    pub menu_x: u16,
    #[serde(default)]
    pub menu_y: u16,
    #[serde(default = "default_item_height")]
    pub item_height: u16,
    #[serde(default)]
    pub item_width: u16,
    #[serde(default)]
    pub padding_v: u16,
    #[serde(default)]
    pub padding_h: u16,
}

fn default_item_height() -> u16 {
    1
}

fn clamp(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub text: String,
    /// Rows left between the prompt and the first item.
    pub space: u16,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub name: String,
    pub trigger: Weak<Trigger>,
}

/// A list of choices, each bound to a trigger. A game-choice menu is a menu
/// with a prompt above its items.
#[derive(Debug)]
pub struct Menu {
    items: Vec<MenuItem>,
    layout: MenuLayout,
    prompt: Option<Prompt>,
    style: Style,
    selected: usize,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>, layout: MenuLayout, prompt: Option<Prompt>, style: Style) -> Self {
        Self {
            items,
            layout,
            prompt,
            style,
            selected: 0,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    fn prompt_rows(&self) -> u16 {
        self.prompt
            .as_ref()
            .map(|p| clamp(p.text.split('\n').count()).saturating_add(p.space))
            .unwrap_or(0)
    }

    /// Top row of item `index`.
    pub fn item_y(&self, index: usize) -> u16 {
        let l = &self.layout;
        let stride = l.item_height.max(1).saturating_add(l.space);
        l.menu_y
            .saturating_add(self.prompt_rows())
            .saturating_add(clamp(index).saturating_mul(stride))
    }
}

impl Draw for Menu {
    fn draw(&self, canvas: Canvas, ops: &mut Vec<DrawOp>) {
        let l = &self.layout;
        if let Some(prompt) = &self.prompt {
            for (row, line) in prompt.text.split('\n').enumerate() {
                let Some(y) = offset(l.menu_y, row) else {
                    break;
                };
                canvas.put_str(ops, l.menu_x, y, line, &self.style);
            }
        }

        let highlight = Style {
            fg: Some(Color::Named(NamedColor::Black)),
            bg: Some(Color::Named(NamedColor::White)),
            bold: true,
            dim: false,
        };
        for (i, item) in self.items.iter().enumerate() {
            let top = self.item_y(i);
            let style = if i == self.selected { &highlight } else { &self.style };
            let label = clamp(item.name.chars().count()).saturating_add(l.padding_h.saturating_mul(2));
            let width = l.item_width.max(label);

            if i == self.selected {
                for row in 0..l.item_height.max(1) {
                    for col in 0..width {
                        canvas.put(ops, l.menu_x.saturating_add(col), top.saturating_add(row), ' ', style);
                    }
                }
            }
            canvas.put_str(
                ops,
                l.menu_x.saturating_add(l.padding_h),
                top.saturating_add(l.padding_v),
                &item.name,
                style,
            );
        }
    }
}
