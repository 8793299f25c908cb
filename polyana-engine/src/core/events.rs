//! In-process event bus
//!
//! Managers publish a change notification after every successful write
//! so that schedulers, UIs and tests can react without polling. The
//! bus is a tokio broadcast channel; events carry a per-resource
//! version so subscribers can tell stale data from fresh.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Per-resource version counters
///
/// Lock-free via DashMap. Each resource name keeps its own counter
/// with atomic increment, so subscribers can order events per
/// resource.
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the counter for a resource and return the new value
    ///
    /// Unknown resources start at 0, so the first event is version 1.
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version for a resource, 0 when never published
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// One change notification
#[derive(Debug, Clone, Serialize)]
pub struct EngineEvent {
    /// Resource kind ("booking", "shift", "transaction", ...)
    pub resource: String,
    /// Change type ("created", "updated", "closed", ...)
    pub action: String,
    /// Id of the changed row
    pub id: String,
    /// Monotonic version within the resource
    pub version: u64,
    /// Snapshot of the row, None for pure signals
    pub data: Option<serde_json::Value>,
}

/// Broadcast bus shared by all managers
///
/// Cloning is cheap; all clones feed the same channel. Publishing
/// never fails: with no live subscribers the event is dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
    versions: Arc<ResourceVersions>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            tx,
            versions: Arc::new(ResourceVersions::new()),
        }
    }

    /// Publish a change notification
    ///
    /// The version is assigned here, one counter per resource.
    pub fn publish<T: Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.versions.increment(resource);
        let event = EngineEvent {
            resource: resource.to_string(),
            action: action.to_string(),
            id: id.to_string(),
            version,
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    pub fn version_of(&self, resource: &str) -> u64 {
        self.versions.get(resource)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_increment_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("booking"), 0);
        assert_eq!(versions.increment("booking"), 1);
        assert_eq!(versions.increment("booking"), 2);
        assert_eq!(versions.increment("shift"), 1);
        assert_eq!(versions.get("booking"), 2);
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish("booking", "created", "42", Some(&serde_json::json!({"id": 42})));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.resource, "booking");
        assert_eq!(event.action, "created");
        assert_eq!(event.id, "42");
        assert_eq!(event.version, 1);
        assert!(event.data.is_some());
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish::<()>("booking", "created", "1", None);
        assert_eq!(bus.version_of("booking"), 1);
    }
}
