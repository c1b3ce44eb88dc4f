use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::command::{DrawingCommand, Menu, MenuItem, MenuLayout, Prompt};
use crate::error::SceneError;
use crate::scene::Scene;

use super::{Execute, TriggerHeader};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMenu {
    #[serde(default)]
    pub layout: MenuLayout,
    #[serde(default)]
    pub font: String,
    pub item_ids: Vec<String>,
    pub item_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddGameChoiceMenu {
    #[serde(default)]
    pub layout: MenuLayout,
    #[serde(default)]
    pub font: String,
    pub item_ids: Vec<String>,
    pub item_names: Vec<String>,
    pub prompt: String,
    #[serde(default)]
    pub prompt_space: u16,
}

/// Pair display names with resolved triggers. Every id must resolve; a
/// missing name falls back to the trigger's own name.
fn menu_items(scene: &Scene, item_ids: &[String], item_names: &[String]) -> Result<Vec<MenuItem>, SceneError> {
    let triggers = scene.resolve(item_ids)?;
    Ok(triggers
        .iter()
        .enumerate()
        .map(|(i, t)| MenuItem {
            name: item_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| t.header.name.clone()),
            trigger: Rc::downgrade(t),
        })
        .collect())
}

fn install(h: &TriggerHeader, scene: &mut Scene, menu: Menu) {
    scene.add_command_to_layer(h.layer, &h.data_id, DrawingCommand::Menu(menu));
    scene.focus_menu(h.layer, &h.data_id);
}

impl Execute for AddMenu {
    fn execute(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let items = menu_items(scene, &self.item_ids, &self.item_names)?;
        let style = scene.font(&self.font)?;
        install(h, scene, Menu::new(items, self.layout, None, style));
        Ok(())
    }
}

impl Execute for AddGameChoiceMenu {
    fn execute(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        let items = menu_items(scene, &self.item_ids, &self.item_names)?;
        let style = scene.font(&self.font)?;
        let prompt = Prompt {
            text: self.prompt.clone(),
            space: self.prompt_space,
        };
        install(h, scene, Menu::new(items, self.layout, Some(prompt), style));
        Ok(())
    }
}
