//! Storage interfaces for events and roadmaps
//!
//! Handlers only see these traits. The in-memory implementations in
//! [`memory`] back the service today; a persistent store plugs in by
//! implementing the same traits.

pub mod memory;
pub mod seed;

use crate::schema::{Event, Roadmap};

pub use memory::{InMemoryEventLog, InMemoryRoadmapStore};

/// Append-only sequence of recorded events.
pub trait EventStore: Send + Sync {
    /// Appends an event and returns the total count including it.
    fn append(&self, event: Event) -> anyhow::Result<usize>;
    fn count(&self) -> anyhow::Result<usize>;
    /// All events in submission order.
    fn list(&self) -> anyhow::Result<Vec<Event>>;
}

/// Read-only mapping from user id to roadmap.
pub trait RoadmapStore: Send + Sync {
    fn get(&self, user_id: &str) -> anyhow::Result<Option<Roadmap>>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
