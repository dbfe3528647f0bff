//! Live catalog updates pushed to subscribers over server-sent events.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::CourseView;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    CourseUpserted { course: CourseView },
    CourseDeleted { id: String },
}

#[derive(Clone)]
pub struct CatalogEvents {
    sender: broadcast::Sender<CatalogEvent>,
}

impl CatalogEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    /// Nobody listening is fine; the event is dropped.
    pub fn publish(&self, event: CatalogEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for CatalogEvents {
    fn default() -> Self {
        Self::new(256)
    }
}
