//! Completion observers: deferred trigger sequences gated on an animated-text
//! subject finishing.
//!
//! An observer moves `Armed → Fired → Detached`. Arming happens on a
//! qualifying notification and yields the delay to schedule; firing hands out
//! the downstream triggers exactly once. Subjects re-announce completion every
//! frame, so every notification outside `Armed` is ignored.

use std::rc::Weak;
use std::time::Duration;

use crate::trigger::Trigger;

/// What an observed subject has to offer its observers.
pub trait CompletionSubject {
    fn finished(&self) -> bool;
    fn click_once(&self) -> bool;
    fn set_click_once(&mut self, value: bool);
    fn set_clickable(&mut self, value: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The subject is finished. Sent on every frame while it stays finished.
    Finished,
    /// The user clicked a finished subject.
    Clicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverKind {
    /// Waits for a click on the finished subject; only the first click counts.
    AfterClick,
    /// Fires as soon as the subject is finished.
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Armed,
    Fired,
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

#[derive(Debug)]
pub struct CompletionObserver {
    id: ObserverId,
    kind: ObserverKind,
    delay: Duration,
    triggers: Vec<Weak<Trigger>>,
    state: ObserverState,
}

impl CompletionObserver {
    pub fn new(id: ObserverId, kind: ObserverKind, delay: Duration, triggers: Vec<Weak<Trigger>>) -> Self {
        Self {
            id,
            kind,
            delay,
            triggers,
            state: ObserverState::Armed,
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn kind(&self) -> ObserverKind {
        self.kind
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    /// Deliver a notification. Returns the delay to schedule when this
    /// notification moves the observer from `Armed` to `Fired`.
    pub fn notify(&mut self, subject: &mut dyn CompletionSubject, note: Notification) -> Option<Duration> {
        if self.state != ObserverState::Armed || !subject.finished() {
            return None;
        }
        match self.kind {
            ObserverKind::AfterClick => {
                if note != Notification::Clicked || subject.click_once() {
                    return None;
                }
                subject.set_click_once(true);
            }
            ObserverKind::Immediate => {}
        }
        self.state = ObserverState::Fired;
        tracing::debug!(observer = self.id.0, kind = ?self.kind, delay = ?self.delay, "observer armed timer");
        Some(self.delay)
    }

    /// Called when the scheduled delay has elapsed. Hands out the downstream
    /// triggers once and detaches; any later call returns `None`.
    pub fn fire(&mut self) -> Option<Vec<Weak<Trigger>>> {
        if self.state != ObserverState::Fired {
            return None;
        }
        self.state = ObserverState::Detached;
        Some(std::mem::take(&mut self.triggers))
    }
}
