//! Shared application state
//!
//! One [`AppState`] is built at startup and handed to the router; every
//! handler reaches the stores through it rather than through globals.

use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
use tracing::info;

use crate::{
    config::Config,
    store::{EventStore, InMemoryEventLog, InMemoryRoadmapStore, RoadmapStore},
};

/// Atomic counters for request outcomes
#[derive(Default)]
pub struct AtomicCounters {
    pub total_requests: AtomicUsize,
    pub rejected_events: AtomicUsize,
    pub roadmap_misses: AtomicUsize,
}

impl AtomicCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_total_requests(&self) -> usize {
        self.total_requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn inc_rejected_events(&self) -> usize {
        self.rejected_events.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn inc_roadmap_misses(&self) -> usize {
        self.roadmap_misses.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Application state used by the Axum router
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub roadmaps: Arc<dyn RoadmapStore>,
    /// Configuration (read-only after initialization)
    pub config: Arc<Config>,
    pub counters: Arc<AtomicCounters>,
}

impl AppState {
    pub fn new(
        config: Config,
        events: Arc<dyn EventStore>,
        roadmaps: Arc<dyn RoadmapStore>,
    ) -> Self {
        Self {
            events,
            roadmaps,
            config: Arc::new(config),
            counters: Arc::new(AtomicCounters::new()),
        }
    }

    /// State backed by the in-memory stores, seeded from the configured
    /// seed file or the built-in roadmaps.
    pub fn in_memory(config: Config) -> anyhow::Result<Self> {
        let roadmaps = match &config.roadmap_seed_path {
            Some(path) => InMemoryRoadmapStore::from_json_file(path)?,
            None => InMemoryRoadmapStore::seeded(),
        };
        info!("Initialized in-memory stores with {} roadmaps", roadmaps.len());

        Ok(Self::new(
            config,
            Arc::new(InMemoryEventLog::new()),
            Arc::new(roadmaps),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_in_memory_uses_builtin_seed_by_default() {
        let state = AppState::in_memory(Config::default()).unwrap();
        assert_eq!(state.roadmaps.len(), 1);
        assert_eq!(state.events.count().unwrap(), 0);
    }

    #[test]
    fn test_in_memory_loads_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"user_id":"u5","weeks":[]},{"user_id":"u6","weeks":[]}]"#)
            .unwrap();
        let config = Config {
            roadmap_seed_path: Some(file.path().to_path_buf()),
            ..Config::default()
        };

        let state = AppState::in_memory(config).unwrap();
        assert_eq!(state.roadmaps.len(), 2);
        assert!(state.roadmaps.get("u1").unwrap().is_none());
    }

    #[test]
    fn test_counters_increment() {
        let counters = AtomicCounters::new();
        assert_eq!(counters.inc_total_requests(), 1);
        assert_eq!(counters.inc_total_requests(), 2);
        assert_eq!(counters.inc_rejected_events(), 1);
        assert_eq!(counters.inc_roadmap_misses(), 1);
    }
}
