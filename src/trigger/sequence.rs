use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::observer::ObserverKind;
use crate::scene::Scene;
use crate::timer::seconds;

use super::TriggerHeader;

/// A list of trigger ids run together, either at once or on their own offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    pub trigger_ids: Vec<String>,
}

impl Sequence {
    /// Run every trigger in list order. All ids are resolved before anything
    /// runs, so an unknown id aborts the whole sequence.
    pub fn run_all(&self, scene: &mut Scene) -> Result<(), SceneError> {
        let triggers = scene.resolve(&self.trigger_ids)?;
        scene.run_triggers(&triggers)
    }

    /// Hand each trigger to the timer at its own `time` offset.
    pub fn schedule(&self, scene: &mut Scene) -> Result<(), SceneError> {
        let triggers = scene.resolve(&self.trigger_ids)?;
        for trigger in &triggers {
            let offset = seconds(trigger.header.time);
            scene.schedule_trigger(offset, Rc::downgrade(trigger));
        }
        Ok(())
    }
}

/// A list of trigger ids run once an animated text completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedSequence {
    pub trigger_ids: Vec<String>,
    /// Seconds between completion and execution.
    #[serde(default)]
    pub delay: f32,
}

impl ObservedSequence {
    pub fn after_click(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        self.observe(h, scene, ObserverKind::AfterClick)
    }

    pub fn immediately_after(&self, h: &TriggerHeader, scene: &mut Scene) -> Result<(), SceneError> {
        self.observe(h, scene, ObserverKind::Immediate)
    }

    fn observe(&self, h: &TriggerHeader, scene: &mut Scene, kind: ObserverKind) -> Result<(), SceneError> {
        let triggers = scene.resolve(&self.trigger_ids)?;
        let delay = seconds(self.delay);
        scene.attach_observer(h.layer, &h.data_id, kind, delay, triggers.iter().map(Rc::downgrade).collect())?;
        Ok(())
    }
}
