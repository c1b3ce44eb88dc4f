use serde::{Deserialize, Serialize};

use crate::command::{AnimatedText, Background, DrawingCommand, StaticText, TextLayout, Textbox};
use crate::error::SceneError;
use crate::scene::Scene;

use super::{Execute, TriggerHeader};

/// Add or replace a full-screen background.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTexture {
    pub path: String,
}

impl SetTexture {
    pub fn add_background(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let texture = scene.load_texture(&self.path)?;
        scene.add_command_to_layer(h.layer, &h.data_id, DrawingCommand::Background(Background::new(texture)));
        Ok(())
    }

    pub fn set_background(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let texture = scene.load_texture(&self.path)?;
        scene.set_background(h.layer, &h.data_id, texture)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTextbox {
    pub path: String,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl AddTextbox {
    pub fn add_textbox(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let texture = scene.load_texture(&self.path)?;
        let textbox = Textbox::new(texture, self.x, self.y, self.width, self.height);
        scene.add_command_to_layer(h.layer, &h.data_id, DrawingCommand::Textbox(textbox));
        Ok(())
    }

    pub fn set_textbox(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let texture = scene.load_texture(&self.path)?;
        scene.set_textbox(h.layer, &h.data_id, texture, self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStaticText {
    pub text: String,
    pub x: u16,
    pub y: u16,
    #[serde(default)]
    pub font: String,
}

impl Execute for AddStaticText {
    fn execute(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let style = scene.font(&self.font)?;
        let text = StaticText {
            text: self.text.clone(),
            x: self.x,
            y: self.y,
            style,
        };
        scene.add_command_to_layer(h.layer, &h.data_id, DrawingCommand::StaticText(text));
        Ok(())
    }
}

/// Fire `trigger_id` once, when line `line` (counted over all pages) starts revealing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineTrigger {
    pub line: usize,
    pub trigger_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAnimatedText {
    /// Joined with single spaces; embedded `\n` forces a line break.
    pub text: Vec<String>,
    #[serde(default)]
    pub font: String,
    pub x: u16,
    pub y: u16,
    #[serde(default)]
    pub line_length: usize,
    #[serde(default)]
    pub max_lines: usize,
    #[serde(default)]
    pub speed: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_triggers: Vec<LineTrigger>,
}

impl Execute for AddAnimatedText {
    fn execute(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let style = scene.font(&self.font)?;
        let ids: Vec<String> = self.line_triggers.iter().map(|l| l.trigger_id.clone()).collect();
        let resolved = scene.resolve(&ids)?;
        let line_triggers = self
            .line_triggers
            .iter()
            .zip(&resolved)
            .map(|(l, t)| (l.line, std::rc::Rc::downgrade(t)))
            .collect();

        let layout = TextLayout {
            x: self.x,
            y: self.y,
            line_length: self.line_length,
            max_lines: self.max_lines,
            speed: self.speed,
        };
        let text = AnimatedText::new(&self.text.join(" "), layout, style, line_triggers);
        scene.add_command_to_layer(h.layer, &h.data_id, DrawingCommand::AnimatedText(text));
        Ok(())
    }
}
