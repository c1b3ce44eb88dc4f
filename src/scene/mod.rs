//! Scene: the registry every trigger and command works against.
//!
//! A scene owns its layers of drawing commands, its audio commands, the
//! canonical trigger map, the active update commands and the timers. It lives
//! for one screen and disposes everything it owns when torn down or dropped.
//!
//! One `tick` runs, in order: due timers, update commands, animated-text
//! subjects. `draw` then paints layers bottom to top. Anything a trigger does
//! during a tick is safe: collections being walked are snapshotted or taken
//! out first and merged back afterwards.

pub mod script;

use std::collections::{BTreeMap, HashMap};
use std::mem;
use std::rc::{Rc, Weak};
use std::time::Duration;

use indexmap::IndexMap;

use crate::assets::{Texture, TextureStore};
use crate::audio::{AudioBackend, AudioKind};
use crate::command::{
    AnimatedText, AudioCommand, Canvas, Draw, DrawingCommand, Menu, TextEvents, Update, UpdateCommand,
    UpdateStatus,
};
use crate::error::SceneError;
use crate::observer::{CompletionObserver, ObserverId, ObserverKind};
use crate::timer::{TimerHandle, Timers};
use crate::trigger::Trigger;
use crate::types::{DrawOp, ResolvedScene, Style, TerminalContract};

/// Nested trigger execution deeper than this is treated as a cycle.
pub const MAX_SEQUENCE_DEPTH: usize = 64;

/// Font name used when a text trigger leaves `font` empty.
pub const DEFAULT_FONT: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpdateId(u64);

/// User input the scene understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    /// Choose the highlighted menu item, or click when no menu has focus.
    Select,
    /// The qualifying gesture for animated text.
    Click,
}

#[derive(Debug)]
enum TimerAction {
    Trigger(Weak<Trigger>),
    Observer {
        layer: i32,
        id: String,
        observer: ObserverId,
    },
}

pub struct Scene {
    contract: TerminalContract,
    layers: BTreeMap<i32, IndexMap<String, DrawingCommand>>,
    audio: IndexMap<String, AudioCommand>,
    triggers: IndexMap<String, Rc<Trigger>>,
    updates: Vec<(UpdateId, UpdateCommand)>,
    timers: Timers<TimerAction>,
    focus: Option<(i32, String)>,
    fonts: HashMap<String, Style>,
    textures: Box<dyn TextureStore>,
    audio_backend: Box<dyn AudioBackend>,
    next_update: u64,
    next_observer: u64,
    depth: usize,
}

impl Scene {
    pub fn new(
        contract: TerminalContract,
        textures: Box<dyn TextureStore>,
        audio_backend: Box<dyn AudioBackend>,
    ) -> Self {
        let mut fonts = HashMap::new();
        fonts.insert(DEFAULT_FONT.to_string(), Style::default());
        Self {
            contract,
            layers: BTreeMap::new(),
            audio: IndexMap::new(),
            triggers: IndexMap::new(),
            updates: Vec::new(),
            timers: Timers::new(),
            focus: None,
            fonts,
            textures,
            audio_backend,
            next_update: 0,
            next_observer: 0,
            depth: 0,
        }
    }

    /// Add or override named text styles.
    pub fn with_fonts(mut self, fonts: impl IntoIterator<Item = (String, Style)>) -> Self {
        self.fonts.extend(fonts);
        self
    }

    pub fn contract(&self) -> TerminalContract {
        self.contract
    }

    /// Time elapsed over all ticks so far.
    pub fn clock(&self) -> Duration {
        self.timers.now()
    }

    // -----------------------------------------------------------------------
    // Triggers
    // -----------------------------------------------------------------------

    pub fn register_trigger(&mut self, trigger: Trigger) -> Result<Rc<Trigger>, SceneError> {
        let id = trigger.id().to_string();
        if self.triggers.contains_key(&id) {
            return Err(SceneError::DuplicateTrigger(id));
        }
        let trigger = Rc::new(trigger);
        self.triggers.insert(id, Rc::clone(&trigger));
        Ok(trigger)
    }

    /// Read-only view of the canonical trigger map.
    pub fn triggers(&self) -> &IndexMap<String, Rc<Trigger>> {
        &self.triggers
    }

    pub fn trigger(&self, id: &str) -> Option<&Rc<Trigger>> {
        self.triggers.get(id)
    }

    /// Resolve trigger ids in order. The first unknown id fails the whole list.
    pub fn resolve(&self, ids: &[String]) -> Result<Vec<Rc<Trigger>>, SceneError> {
        ids.iter()
            .map(|id| {
                self.triggers
                    .get(id)
                    .cloned()
                    .ok_or_else(|| SceneError::UnknownTrigger(id.clone()))
            })
            .collect()
    }

    /// Execute the trigger registered under `id`.
    pub fn execute(&mut self, id: &str) -> Result<(), SceneError> {
        let trigger = self
            .triggers
            .get(id)
            .cloned()
            .ok_or_else(|| SceneError::UnknownTrigger(id.to_string()))?;
        self.run_trigger(&trigger)
    }

    pub fn run_trigger(&mut self, trigger: &Trigger) -> Result<(), SceneError> {
        if self.depth >= MAX_SEQUENCE_DEPTH {
            return Err(SceneError::SequenceTooDeep(MAX_SEQUENCE_DEPTH));
        }
        tracing::debug!(trigger = trigger.id(), depth = self.depth, "executing trigger");
        self.depth += 1;
        let result = trigger.execute(self);
        self.depth -= 1;
        result
    }

    /// Run triggers in order, stopping at the first failure.
    pub fn run_triggers(&mut self, triggers: &[Rc<Trigger>]) -> Result<(), SceneError> {
        for trigger in triggers {
            self.run_trigger(trigger)?;
        }
        Ok(())
    }

    /// Run a trigger on a later tick, once `delay` has elapsed.
    pub fn schedule_trigger(&mut self, delay: Duration, trigger: Weak<Trigger>) -> TimerHandle {
        self.timers.schedule(delay, TimerAction::Trigger(trigger))
    }

    pub fn cancel_timer(&mut self, handle: TimerHandle) -> bool {
        self.timers.cancel(handle)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.active_count()
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    pub fn load_texture(&mut self, path: &str) -> Result<Texture, SceneError> {
        self.textures.load(path)
    }

    /// Look up a text style by font name; an empty name means the default font.
    pub fn font(&self, name: &str) -> Result<Style, SceneError> {
        let name = if name.is_empty() { DEFAULT_FONT } else { name };
        self.fonts
            .get(name)
            .cloned()
            .ok_or_else(|| SceneError::UnknownFont(name.to_string()))
    }

    // -----------------------------------------------------------------------
    // Drawing commands
    // -----------------------------------------------------------------------

    /// Place a command at (layer, id). An existing occupant is removed and
    /// disposed first, so a slot never holds more than one command.
    pub fn add_command_to_layer(&mut self, layer: i32, id: &str, command: DrawingCommand) {
        self.remove_command_from_layer(layer, id);
        tracing::debug!(layer, id, kind = command.kind(), "adding drawing command");
        self.layers
            .entry(layer)
            .or_default()
            .insert(id.to_string(), command);
    }

    /// Remove and dispose the command at (layer, id). Returns false, doing
    /// nothing, when the slot is already empty.
    pub fn remove_command_from_layer(&mut self, layer: i32, id: &str) -> bool {
        let Some(command) = self.layers.get_mut(&layer).and_then(|l| l.shift_remove(id)) else {
            return false;
        };
        tracing::debug!(layer, id, kind = command.kind(), "removing drawing command");

        let cancelled = self.timers.cancel_where(|a| {
            matches!(a, TimerAction::Observer { layer: l, id: i, .. } if *l == layer && i == id)
        });
        if cancelled > 0 {
            tracing::debug!(layer, id, cancelled, "cancelled observer timers of removed command");
        }
        if self.focus.as_ref().is_some_and(|(l, i)| *l == layer && i == id) {
            self.focus = None;
        }
        command.dispose(self.textures.as_mut());
        true
    }

    pub fn drawing_command(&self, layer: i32, id: &str) -> Option<&DrawingCommand> {
        self.layers.get(&layer)?.get(id)
    }

    pub fn drawing_command_mut(&mut self, layer: i32, id: &str) -> Option<&mut DrawingCommand> {
        self.layers.get_mut(&layer)?.get_mut(id)
    }

    /// Ids on a layer in paint order.
    pub fn layer_ids(&self, layer: i32) -> Vec<&str> {
        self.layers
            .get(&layer)
            .map(|l| l.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn command_count(&self) -> usize {
        self.layers.values().map(IndexMap::len).sum()
    }

    pub fn animated_text(&self, layer: i32, id: &str) -> Option<&AnimatedText> {
        match self.drawing_command(layer, id)? {
            DrawingCommand::AnimatedText(t) => Some(t),
            _ => None,
        }
    }

    fn slot_mut(&mut self, layer: i32, id: &str) -> Result<&mut DrawingCommand, SceneError> {
        self.layers
            .get_mut(&layer)
            .and_then(|l| l.get_mut(id))
            .ok_or_else(|| SceneError::UnknownCommand {
                layer,
                id: id.to_string(),
            })
    }

    /// Swap the texture of the background at (layer, id) in place.
    ///
    /// On failure the new texture is released, so nothing leaks either way.
    pub fn set_background(&mut self, layer: i32, id: &str, texture: Texture) -> Result<(), SceneError> {
        let old = match self.slot_mut(layer, id) {
            Ok(DrawingCommand::Background(bg)) => Ok(bg.replace_texture(texture)),
            Ok(_) => Err((texture, SceneError::WrongCommandKind { layer, id: id.to_string(), expected: "background" })),
            Err(e) => Err((texture, e)),
        };
        self.finish_replace(old)
    }

    /// Swap the texture and geometry of the textbox at (layer, id) in place.
    #[allow(clippy::too_many_arguments)]
    pub fn set_textbox(
        &mut self,
        layer: i32,
        id: &str,
        texture: Texture,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), SceneError> {
        let old = match self.slot_mut(layer, id) {
            Ok(DrawingCommand::Textbox(tb)) => Ok(tb.replace(texture, x, y, width, height)),
            Ok(_) => Err((texture, SceneError::WrongCommandKind { layer, id: id.to_string(), expected: "textbox" })),
            Err(e) => Err((texture, e)),
        };
        self.finish_replace(old)
    }

    fn finish_replace(&mut self, outcome: Result<Texture, (Texture, SceneError)>) -> Result<(), SceneError> {
        match outcome {
            Ok(old) => {
                self.textures.release(old);
                Ok(())
            }
            Err((unused, e)) => {
                self.textures.release(unused);
                Err(e)
            }
        }
    }

    /// Attach a completion observer to the animated text at (layer, id).
    pub fn attach_observer(
        &mut self,
        layer: i32,
        id: &str,
        kind: ObserverKind,
        delay: Duration,
        triggers: Vec<Weak<Trigger>>,
    ) -> Result<ObserverId, SceneError> {
        let observer_id = ObserverId(self.next_observer);
        let DrawingCommand::AnimatedText(text) = self.slot_mut(layer, id)? else {
            return Err(SceneError::WrongCommandKind {
                layer,
                id: id.to_string(),
                expected: "animated text",
            });
        };
        if kind == ObserverKind::Immediate {
            text.subject_mut().set_clickable(false);
        }
        text.attach(CompletionObserver::new(observer_id, kind, delay, triggers));
        self.next_observer += 1;
        tracing::debug!(layer, id, ?kind, ?delay, "attached completion observer");
        Ok(observer_id)
    }

    pub fn focus_menu(&mut self, layer: i32, id: &str) {
        self.focus = Some((layer, id.to_string()));
    }

    pub fn focused_menu(&self) -> Option<&Menu> {
        let (layer, id) = self.focus.as_ref()?;
        match self.drawing_command(*layer, id)? {
            DrawingCommand::Menu(m) => Some(m),
            _ => None,
        }
    }

    fn focused_menu_mut(&mut self) -> Option<&mut Menu> {
        let (layer, id) = self.focus.clone()?;
        match self.drawing_command_mut(layer, &id)? {
            DrawingCommand::Menu(m) => Some(m),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Audio commands
    // -----------------------------------------------------------------------

    pub fn load_audio(
        &mut self,
        id: &str,
        kind: AudioKind,
        path: &str,
        volume: f32,
        looping: bool,
    ) -> Result<(), SceneError> {
        let command = AudioCommand::load(self.audio_backend.as_mut(), id, kind, path, volume, looping)?;
        self.add_audio(command);
        Ok(())
    }

    /// Register an audio command under its id, disposing any previous one.
    pub fn add_audio(&mut self, command: AudioCommand) {
        tracing::debug!(id = %command.id, kind = ?command.kind, "adding audio command");
        if let Some(old) = self.audio.insert(command.id.clone(), command) {
            old.dispose(self.audio_backend.as_mut());
        }
    }

    /// Stop and dispose the audio command under `id`. Returns false when absent.
    pub fn remove_audio(&mut self, id: &str) -> bool {
        match self.audio.shift_remove(id) {
            Some(command) => {
                tracing::debug!(id, "removing audio command");
                command.dispose(self.audio_backend.as_mut());
                true
            }
            None => false,
        }
    }

    pub fn audio(&self, id: &str) -> Option<&AudioCommand> {
        self.audio.get(id)
    }

    pub fn audio_volume(&self, id: &str) -> Option<f32> {
        self.audio.get(id).map(AudioCommand::volume)
    }

    pub fn set_audio_volume(&mut self, id: &str, volume: f32) -> bool {
        match self.audio.get_mut(id) {
            Some(command) => {
                command.set_volume(self.audio_backend.as_mut(), volume);
                true
            }
            None => false,
        }
    }

    pub fn play_audio(&mut self, id: &str) -> Result<(), SceneError> {
        let command = self
            .audio
            .get(id)
            .ok_or_else(|| SceneError::UnknownAudio(id.to_string()))?;
        command.play(self.audio_backend.as_mut());
        Ok(())
    }

    pub fn stop_audio(&mut self, id: &str) -> Result<(), SceneError> {
        let command = self
            .audio
            .get(id)
            .ok_or_else(|| SceneError::UnknownAudio(id.to_string()))?;
        command.stop(self.audio_backend.as_mut());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Update commands
    // -----------------------------------------------------------------------

    /// Start ticking an update command from the next tick on.
    pub fn add_update(&mut self, update: UpdateCommand) -> UpdateId {
        let id = UpdateId(self.next_update);
        self.next_update += 1;
        tracing::debug!(?id, ?update, "adding update command");
        self.updates.push((id, update));
        id
    }

    /// Deregister an update command without ending it.
    pub fn remove_update(&mut self, id: UpdateId) -> Option<UpdateCommand> {
        let pos = self.updates.iter().position(|(uid, _)| *uid == id)?;
        Some(self.updates.remove(pos).1)
    }

    pub fn update_command(&self, id: UpdateId) -> Option<&UpdateCommand> {
        self.updates.iter().find(|(uid, _)| *uid == id).map(|(_, u)| u)
    }

    /// Update commands that will be ticked next frame, in tick order.
    pub fn update_commands(&self) -> impl Iterator<Item = &UpdateCommand> {
        self.updates.iter().map(|(_, u)| u)
    }

    pub fn active_updates(&self) -> usize {
        self.updates.len()
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    /// Advance the scene by one frame.
    ///
    /// A failing trigger aborts only its own sequence. The rest of the frame
    /// still runs and the first failure is returned at the end.
    pub fn tick(&mut self, delta: Duration) -> Result<(), SceneError> {
        let mut failure = None;
        for action in self.timers.advance(delta) {
            keep_first(&mut failure, self.fire_timer(action));
        }

        let dt = delta.as_secs_f32();
        self.tick_updates(dt);

        for (layer, id) in self.animated_text_slots() {
            let events = match self.drawing_command_mut(layer, &id) {
                Some(DrawingCommand::AnimatedText(text)) => text.advance(dt),
                _ => continue,
            };
            keep_first(&mut failure, self.apply_text_events(layer, &id, events));
        }
        failure.map_or(Ok(()), Err)
    }

    fn tick_updates(&mut self, dt: f32) {
        let mut active = mem::take(&mut self.updates);
        let mut survivors = Vec::with_capacity(active.len());

        for (id, mut update) in active.drain(..) {
            match update.update(dt, self) {
                UpdateStatus::Running => survivors.push((id, update)),
                UpdateStatus::Ended => tracing::debug!(?id, "update command ended"),
            }
        }

        // Updates added while ticking run from the next frame, after the survivors.
        survivors.append(&mut self.updates);
        self.updates = survivors;
    }

    fn fire_timer(&mut self, action: TimerAction) -> Result<(), SceneError> {
        match action {
            TimerAction::Trigger(weak) => match weak.upgrade() {
                Some(trigger) => self.run_trigger(&trigger),
                None => {
                    tracing::debug!("scheduled trigger no longer registered");
                    Ok(())
                }
            },
            TimerAction::Observer { layer, id, observer } => {
                let fired = match self.drawing_command_mut(layer, &id) {
                    Some(DrawingCommand::AnimatedText(text)) => text.fire_observer(observer),
                    _ => None,
                };
                let Some(weak) = fired else {
                    tracing::warn!(layer, id = %id, "observer timer outlived its animated text");
                    return Ok(());
                };
                let triggers: Vec<Rc<Trigger>> = weak.iter().filter_map(Weak::upgrade).collect();
                self.run_triggers(&triggers)
            }
        }
    }

    fn animated_text_slots(&self) -> Vec<(i32, String)> {
        self.layers
            .iter()
            .flat_map(|(layer, cmds)| {
                cmds.iter()
                    .filter(|(_, c)| matches!(c, DrawingCommand::AnimatedText(_)))
                    .map(|(id, _)| (*layer, id.clone()))
            })
            .collect()
    }

    fn apply_text_events(&mut self, layer: i32, id: &str, events: TextEvents) -> Result<(), SceneError> {
        for (observer, delay) in events.armed {
            self.timers.schedule(
                delay,
                TimerAction::Observer {
                    layer,
                    id: id.to_string(),
                    observer,
                },
            );
        }
        let triggers: Vec<Rc<Trigger>> = events.line_triggers.iter().filter_map(Weak::upgrade).collect();
        self.run_triggers(&triggers)
    }

    /// Deliver user input: menu navigation, menu choice, or a click on text.
    pub fn handle_input(&mut self, input: Input) -> Result<(), SceneError> {
        match input {
            Input::Up => {
                if let Some(menu) = self.focused_menu_mut() {
                    menu.select_prev();
                }
                Ok(())
            }
            Input::Down => {
                if let Some(menu) = self.focused_menu_mut() {
                    menu.select_next();
                }
                Ok(())
            }
            Input::Select => {
                let Some(menu) = self.focused_menu() else {
                    return self.click();
                };
                let chosen = menu.selected_item().and_then(|item| item.trigger.upgrade());
                match chosen {
                    Some(trigger) => self.run_trigger(&trigger),
                    None => Ok(()),
                }
            }
            Input::Click => self.click(),
        }
    }

    /// Deliver the click gesture to every animated text, top layer first.
    pub fn click(&mut self) -> Result<(), SceneError> {
        let mut slots = self.animated_text_slots();
        slots.reverse();
        for (layer, id) in slots {
            let events = match self.drawing_command_mut(layer, &id) {
                Some(DrawingCommand::AnimatedText(text)) => text.click(),
                _ => continue,
            };
            self.apply_text_events(layer, &id, events)?;
        }
        Ok(())
    }

    /// Paint every layer, lowest first; within a layer, insertion order.
    pub fn draw(&self) -> ResolvedScene {
        let mut ops: Vec<DrawOp> = Vec::new();
        for (layer, commands) in &self.layers {
            let canvas = Canvas {
                width: self.contract.width,
                height: self.contract.height,
                z_order: *layer,
            };
            for command in commands.values() {
                command.draw(canvas, &mut ops);
            }
        }
        ResolvedScene {
            width: self.contract.width,
            height: self.contract.height,
            ops,
        }
    }

    /// Dispose every owned resource and forget all state.
    pub fn teardown(&mut self) {
        for (_, commands) in mem::take(&mut self.layers) {
            for (_, command) in commands {
                command.dispose(self.textures.as_mut());
            }
        }
        for (_, command) in mem::take(&mut self.audio) {
            command.dispose(self.audio_backend.as_mut());
        }
        self.updates.clear();
        self.timers.clear();
        self.focus = None;
        self.triggers.clear();
    }
}

fn keep_first(failure: &mut Option<SceneError>, result: Result<(), SceneError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "trigger failed during tick");
        failure.get_or_insert(e);
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.teardown();
    }
}
