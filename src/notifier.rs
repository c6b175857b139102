//! Feedback hooks fired by the engine. Nothing in the core depends on a
//! hook doing anything; the shipped implementations only log.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One-shot threshold crossings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    /// Completion percentage: 25, 50 or 75
    Progress(u8),
    /// Live speed: 20, 40, 60, 80 or 100 wpm
    Speed(u32),
}

pub trait Notifier {
    fn key_press(&mut self, _c: char) {}
    fn backspace(&mut self) {}
    /// `repeated` is set when this error extends a streak of two or more
    fn error(&mut self, _repeated: bool) {}
    fn milestone(&mut self, _milestone: Milestone) {}
    fn combo(&mut self, _count: usize) {}
    /// `perfect` is an error-free finish of a text longer than ten characters
    fn complete(&mut self, _perfect: bool) {}
}

/// Inert hooks
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {}

/// Emits each hook as a tracing event unless muted
#[derive(Debug, Clone)]
pub struct LogNotifier {
    muted: Rc<Cell<bool>>,
}

impl LogNotifier {
    pub fn new(muted: bool) -> Self {
        Self {
            muted: Rc::new(Cell::new(muted)),
        }
    }

    /// Shared switch the UI flips with the mute toggle
    pub fn mute_handle(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.muted)
    }

    fn enabled(&self) -> bool {
        !self.muted.get()
    }
}

impl Notifier for LogNotifier {
    fn key_press(&mut self, c: char) {
        if self.enabled() {
            tracing::trace!(key = %c, "key press");
        }
    }

    fn backspace(&mut self) {
        if self.enabled() {
            tracing::trace!("backspace");
        }
    }

    fn error(&mut self, repeated: bool) {
        if self.enabled() {
            tracing::debug!(repeated, "typing error");
        }
    }

    fn milestone(&mut self, milestone: Milestone) {
        if self.enabled() {
            tracing::debug!(?milestone, "milestone reached");
        }
    }

    fn combo(&mut self, count: usize) {
        if self.enabled() {
            tracing::debug!(count, "combo");
        }
    }

    fn complete(&mut self, perfect: bool) {
        if self.enabled() {
            tracing::debug!(perfect, "session complete");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    KeyPress(char),
    Backspace,
    Error { repeated: bool },
    Milestone(Milestone),
    Combo(usize),
    Complete { perfect: bool },
}

/// Captures every hook call; clones share one event list
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Rc<RefCell<Vec<NotifierEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NotifierEvent> {
        self.events.borrow().clone()
    }

    pub fn milestones(&self) -> Vec<Milestone> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                NotifierEvent::Milestone(m) => Some(*m),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: NotifierEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Notifier for RecordingNotifier {
    fn key_press(&mut self, c: char) {
        self.push(NotifierEvent::KeyPress(c));
    }

    fn backspace(&mut self) {
        self.push(NotifierEvent::Backspace);
    }

    fn error(&mut self, repeated: bool) {
        self.push(NotifierEvent::Error { repeated });
    }

    fn milestone(&mut self, milestone: Milestone) {
        self.push(NotifierEvent::Milestone(milestone));
    }

    fn combo(&mut self, count: usize) {
        self.push(NotifierEvent::Combo(count));
    }

    fn complete(&mut self, perfect: bool) {
        self.push(NotifierEvent::Complete { perfect });
    }
}
