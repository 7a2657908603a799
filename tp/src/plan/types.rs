//! Wire types for the planning service

use serde::{Deserialize, Serialize};

/// Body of `POST /api/plan-tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub tasks: Vec<String>,
}

impl PlanRequest {
    pub fn new(tasks: Vec<String>) -> Self {
        Self { tasks }
    }
}

/// One planned slot. Both fields are opaque display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub time: String,
    pub task: String,
}

impl ScheduleItem {
    pub fn new(time: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            task: task.into(),
        }
    }
}

/// Parsed successful response: ordered schedule plus explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    pub schedule: Vec<ScheduleItem>,
    pub explanation: String,
}

/// Body of the service's `GET /` health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub version: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
