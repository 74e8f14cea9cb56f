//! Built-in roadmap seed loaded at startup
use crate::schema::{Roadmap, Task, WeekPlan};

pub fn default_roadmaps() -> Vec<Roadmap> {
    vec![Roadmap {
        user_id: "u1".to_string(),
        weeks: vec![WeekPlan {
            week_no: 1,
            topics: vec!["arrays".to_string(), "two-pointer".to_string()],
            tasks: vec![
                Task::new("Solve 3 practice problems"),
                Task::new("Watch 2 concept videos"),
                Task::new("Take revision quiz"),
            ],
            goal: "Reach avg_accuracy ≥ 0.75".to_string(),
        }],
    }]
}
