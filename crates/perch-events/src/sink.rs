use std::sync::mpsc::{self, Receiver, Sender};

use crate::CatalogEvent;

/// Trait for consuming events.
///
/// Each frontend provides its own implementation.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CatalogEvent);
}

/// Channel-based event sink.
///
/// Sends events through a standard mpsc channel. The receiver end
/// can be polled by any consumer (GUI, watching client, test harness).
pub struct ChannelSink {
    sender: Sender<CatalogEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<CatalogEvent>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender,
            },
            receiver,
        )
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: CatalogEvent) {
        let _ = self.sender.send(event);
    }
}

/// No-op event sink for tests or headless operation.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: CatalogEvent) {}
}

/// Collector sink that stores all events for inspection.
///
/// Useful in tests to verify that expected events were emitted.
#[derive(Default)]
pub struct CollectorSink {
    events: std::sync::Mutex<Vec<CatalogEvent>>,
}

impl CollectorSink {
    pub fn events(&self) -> Vec<CatalogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for CollectorSink {
    fn emit(&self, event: CatalogEvent) {
        self.events.lock().unwrap().push(event);
    }
}
