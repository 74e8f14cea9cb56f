// personalization/crates/personalization/src/lib.rs

pub mod api;
pub mod config;
pub mod metrics;
pub mod schema;
pub mod server;
pub mod shared_state;
pub mod store;
pub mod telemetry;

// Public API exports
pub use config::Config;
pub use schema::{Event, Roadmap, Task, WeekPlan};
pub use server::{build_router, run_server};
pub use shared_state::AppState;
pub use store::{EventStore, InMemoryEventLog, InMemoryRoadmapStore, RoadmapStore};

// API exports
pub use api::{
    event_api::{list_events, record_event, EventListResponse, RecordEventResponse},
    roadmap_api::{get_roadmap, ROADMAP_NOT_FOUND},
    admin_api::{health, stats},
    ApiError,
};
