//! Text revealed a few characters at a time, paged, and observable.
//!
//! Reveal runs at `speed` characters per second over pages of `max_lines`
//! wrapped lines. A click skips to the end of the page or turns it. Text that
//! takes no clicks turns its own pages once each has been shown for
//! `PAGE_DWELL` seconds. Observers consume the completion signal and the click
//! on a finished text.

use std::rc::Weak;
use std::time::Duration;

use crate::observer::{CompletionObserver, CompletionSubject, Notification, ObserverId, ObserverState};
use crate::trigger::Trigger;
use crate::types::{DrawOp, Style};

use super::{Canvas, Draw, offset};

/// Wrap a single logical line at `width` columns using word breaks.
///
/// Breaks happen at spaces and the space at the break is consumed, so no row
/// starts with a stray blank. A word longer than `width` is hard-broken.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() || width == 0 {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut pos = 0usize;
    while pos < chars.len() {
        let remaining = &chars[pos..];
        if remaining.len() <= width {
            rows.push(remaining.iter().collect());
            break;
        }
        let chunk = &remaining[..width];
        let (row_len, advance) = if remaining[width] == ' ' {
            (width, width + 1)
        } else {
            match chunk.iter().rposition(|&c| c == ' ') {
                Some(sp) if sp > 0 => (sp, sp + 1),
                _ => (width, width),
            }
        };
        rows.push(remaining[..row_len].iter().collect());
        pos += advance;
        while pos < chars.len() && chars[pos] == ' ' {
            pos += 1;
        }
    }
    rows
}

/// Seconds a finished page of unclickable text stays up before the next one.
pub const PAGE_DWELL: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct TextLayout {
    pub x: u16,
    pub y: u16,
    /// Wrap width in columns; 0 disables wrapping.
    pub line_length: usize,
    /// Lines per page; 0 puts everything on one page.
    pub max_lines: usize,
    /// Characters revealed per second; 0 or less reveals each page at once.
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickOutcome {
    Ignored,
    Revealed,
    PageTurned,
    Clicked,
}

/// Reveal progress plus the flags observers read and write.
#[derive(Debug)]
pub struct TextReveal {
    pages: Vec<Vec<String>>,
    page: usize,
    revealed: f32,
    dwell: f32,
    clickable: bool,
    click_once: bool,
}

impl TextReveal {
    pub fn new(text: &str, line_length: usize, max_lines: usize) -> Self {
        let lines: Vec<String> = text
            .split('\n')
            .flat_map(|line| wrap_line(line, line_length))
            .collect();
        let pages = if max_lines == 0 {
            vec![lines]
        } else {
            lines.chunks(max_lines).map(<[String]>::to_vec).collect()
        };
        Self {
            pages,
            page: 0,
            revealed: 0.0,
            dwell: 0.0,
            clickable: true,
            click_once: false,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn clickable(&self) -> bool {
        self.clickable
    }

    fn page_len(&self) -> usize {
        self.pages[self.page].iter().map(|l| l.chars().count()).sum()
    }

    fn page_complete(&self) -> bool {
        self.revealed >= self.page_len() as f32
    }

    fn has_next_page(&self) -> bool {
        self.page + 1 < self.pages.len()
    }

    fn turn_page(&mut self) {
        self.page += 1;
        self.revealed = 0.0;
        self.dwell = 0.0;
    }

    fn advance(&mut self, delta: f32, speed: f32) {
        if !self.clickable && self.page_complete() && self.has_next_page() {
            self.dwell += delta;
            if self.dwell >= PAGE_DWELL {
                self.turn_page();
            }
            return;
        }
        let len = self.page_len() as f32;
        self.revealed = if speed <= 0.0 {
            len
        } else {
            (self.revealed + speed * delta).min(len)
        };
    }

    fn click(&mut self) -> ClickOutcome {
        if !self.clickable {
            return ClickOutcome::Ignored;
        }
        if !self.page_complete() {
            self.revealed = self.page_len() as f32;
            return ClickOutcome::Revealed;
        }
        if self.has_next_page() {
            self.turn_page();
            return ClickOutcome::PageTurned;
        }
        ClickOutcome::Clicked
    }

    /// Number of lines, counted across all pages, whose first character is visible.
    fn lines_started(&self) -> usize {
        let before: usize = self.pages[..self.page].iter().map(Vec::len).sum();
        let mut start = 0usize;
        let mut started = 0usize;
        for line in &self.pages[self.page] {
            let at = start as f32;
            if at < self.revealed || (line.is_empty() && at <= self.revealed) {
                started += 1;
            }
            start += line.chars().count();
        }
        before + started
    }

    /// The visible part of each line on the current page.
    pub fn visible_lines(&self) -> Vec<String> {
        let mut budget = self.revealed.floor() as usize;
        let mut out = Vec::new();
        for line in &self.pages[self.page] {
            let len = line.chars().count();
            out.push(line.chars().take(budget).collect());
            budget = budget.saturating_sub(len);
        }
        out
    }
}

impl CompletionSubject for TextReveal {
    fn finished(&self) -> bool {
        !self.has_next_page() && self.page_complete()
    }

    fn click_once(&self) -> bool {
        self.click_once
    }

    fn set_click_once(&mut self, value: bool) {
        self.click_once = value;
    }

    fn set_clickable(&mut self, value: bool) {
        self.clickable = value;
    }
}

/// Timers the scene must schedule after an animated text advanced or was clicked.
#[derive(Debug, Default)]
pub struct TextEvents {
    pub armed: Vec<(ObserverId, Duration)>,
    pub line_triggers: Vec<Weak<Trigger>>,
}

#[derive(Debug)]
pub struct AnimatedText {
    reveal: TextReveal,
    layout: TextLayout,
    style: Style,
    observers: Vec<CompletionObserver>,
    line_triggers: Vec<(usize, Weak<Trigger>)>,
    lines_reported: usize,
}

impl AnimatedText {
    pub fn new(text: &str, layout: TextLayout, style: Style, line_triggers: Vec<(usize, Weak<Trigger>)>) -> Self {
        Self {
            reveal: TextReveal::new(text, layout.line_length, layout.max_lines),
            layout,
            style,
            observers: Vec::new(),
            line_triggers,
            lines_reported: 0,
        }
    }

    pub fn finished(&self) -> bool {
        self.reveal.finished()
    }

    pub fn reveal(&self) -> &TextReveal {
        &self.reveal
    }

    pub fn subject_mut(&mut self) -> &mut dyn CompletionSubject {
        &mut self.reveal
    }

    pub fn attach(&mut self, observer: CompletionObserver) {
        self.observers.push(observer);
    }

    pub fn observer_states(&self) -> Vec<ObserverState> {
        self.observers.iter().map(CompletionObserver::state).collect()
    }

    /// Advance the reveal by `delta` seconds and announce completion.
    pub fn advance(&mut self, delta: f32) -> TextEvents {
        self.reveal.advance(delta, self.layout.speed);
        let mut events = TextEvents {
            line_triggers: self.take_line_triggers(),
            ..Default::default()
        };
        if self.reveal.finished() {
            events.armed = self.notify(Notification::Finished);
        }
        events
    }

    /// Deliver the click gesture.
    pub fn click(&mut self) -> TextEvents {
        let outcome = self.reveal.click();
        tracing::trace!(?outcome, "animated text clicked");
        let mut events = TextEvents {
            line_triggers: self.take_line_triggers(),
            ..Default::default()
        };
        if outcome == ClickOutcome::Clicked {
            events.armed = self.notify(Notification::Clicked);
        }
        events
    }

    /// Release the triggers of a fired observer and drop it from the subject.
    pub fn fire_observer(&mut self, id: ObserverId) -> Option<Vec<Weak<Trigger>>> {
        let triggers = self.observers.iter_mut().find(|o| o.id() == id)?.fire();
        self.observers.retain(|o| o.state() != ObserverState::Detached);
        triggers
    }

    fn notify(&mut self, note: Notification) -> Vec<(ObserverId, Duration)> {
        let reveal = &mut self.reveal;
        self.observers
            .iter_mut()
            .filter_map(|o| o.notify(&mut *reveal, note).map(|delay| (o.id(), delay)))
            .collect()
    }

    fn take_line_triggers(&mut self) -> Vec<Weak<Trigger>> {
        let started = self.reveal.lines_started();
        if started <= self.lines_reported {
            return Vec::new();
        }
        let range = self.lines_reported..started;
        self.lines_reported = started;
        self.line_triggers
            .iter()
            .filter(|(line, _)| range.contains(line))
            .map(|(_, t)| t.clone())
            .collect()
    }
}

impl Draw for AnimatedText {
    fn draw(&self, canvas: Canvas, ops: &mut Vec<DrawOp>) {
        for (row, line) in self.reveal.visible_lines().iter().enumerate() {
            let Some(y) = offset(self.layout.y, row) else {
                break;
            };
            canvas.put_str(ops, self.layout.x, y, line, &self.style);
        }
    }
}
