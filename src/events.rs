//! Session lifecycle events, pushed to listeners at each transition.

use crate::puzzle::Domain;
use crate::session::SessionStatus;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Created {
        domain: Domain,
        puzzle_id: String,
        restored: bool,
    },
    GuessSubmitted {
        attempt_number: usize,
        correct: bool,
    },
    GuessRejected {
        reason: String,
    },
    HintRevealed {
        label: String,
    },
    Finished {
        status: SessionStatus,
        attempts: usize,
    },
}

pub trait EventListener {
    fn on_event(&mut self, event: &SessionEvent);
}

/// Mirrors every event to the debug log.
#[derive(Debug, Default)]
pub struct LogListener;

impl EventListener for LogListener {
    fn on_event(&mut self, event: &SessionEvent) {
        log::debug!("session event: {event:?}");
    }
}

/// Records events into a shared buffer; clones see the same events.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }
}

impl EventListener for EventLog {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
