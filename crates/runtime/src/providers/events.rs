//! Event sink provider collecting world events for the embedding client.

use std::cell::RefCell;

use tileworld_core::{EventSink, WorldEvent};

/// Buffers every fired event until the client drains it.
#[derive(Debug, Default)]
pub struct EventBroadcaster {
    log: RefCell<Vec<WorldEvent>>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes all buffered events, oldest first.
    pub fn drain(&self) -> Vec<WorldEvent> {
        self.log.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

impl EventSink for EventBroadcaster {
    fn fire(&self, event: &WorldEvent) {
        tracing::debug!(?event, "world event");
        self.log.borrow_mut().push(event.clone());
    }
}
