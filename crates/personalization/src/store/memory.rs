use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::Context;
use tracing::{info, warn};

use super::{seed, EventStore, RoadmapStore};
use crate::schema::{Event, Roadmap};

/// Process-lifetime event log. Appends are serialized by the write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    events: Arc<RwLock<Vec<Event>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for InMemoryEventLog {
    fn append(&self, event: Event) -> anyhow::Result<usize> {
        let mut events = self
            .events
            .write()
            .map_err(|_| anyhow::anyhow!("Failed to acquire event log write lock"))?;
        events.push(event);
        Ok(events.len())
    }

    fn count(&self) -> anyhow::Result<usize> {
        let events = self
            .events
            .read()
            .map_err(|_| anyhow::anyhow!("Failed to acquire event log read lock"))?;
        Ok(events.len())
    }

    fn list(&self) -> anyhow::Result<Vec<Event>> {
        let events = self
            .events
            .read()
            .map_err(|_| anyhow::anyhow!("Failed to acquire event log read lock"))?;
        Ok(events.clone())
    }
}

/// Roadmaps keyed by user id, fixed after construction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoadmapStore {
    roadmaps: Arc<HashMap<String, Roadmap>>,
}

impl InMemoryRoadmapStore {
    /// Store preloaded with the built-in seed.
    pub fn seeded() -> Self {
        Self::from_roadmaps(seed::default_roadmaps())
    }

    /// Later entries replace earlier ones with the same user id.
    pub fn from_roadmaps(roadmaps: impl IntoIterator<Item = Roadmap>) -> Self {
        let mut map = HashMap::new();
        for roadmap in roadmaps {
            if let Some(previous) = map.insert(roadmap.user_id.clone(), roadmap) {
                warn!("Duplicate roadmap for user '{}', keeping the later entry", previous.user_id);
            }
        }
        Self {
            roadmaps: Arc::new(map),
        }
    }

    /// Load a JSON array of roadmaps from disk.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roadmap seed file {}", path.display()))?;
        let roadmaps: Vec<Roadmap> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid roadmap seed file {}", path.display()))?;
        info!("Loaded {} roadmaps from {}", roadmaps.len(), path.display());
        Ok(Self::from_roadmaps(roadmaps))
    }
}

impl RoadmapStore for InMemoryRoadmapStore {
    fn get(&self, user_id: &str) -> anyhow::Result<Option<Roadmap>> {
        Ok(self.roadmaps.get(user_id).cloned())
    }

    fn len(&self) -> usize {
        self.roadmaps.len()
    }
}
