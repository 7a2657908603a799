//! Planning service module for TaskPlanner
//!
//! Wire types, errors and the client used to talk to the remote planner.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod http;
mod types;

pub use client::PlanService;
pub use error::PlanError;
pub use http::HttpPlanClient;
pub use types::{HealthStatus, PlanRequest, PlanResult, ScheduleItem};

use crate::config::ServiceConfig;

/// Create the planning service client described by config
pub fn create_service(config: &ServiceConfig) -> Result<Arc<dyn PlanService>, PlanError> {
    debug!(base_url = %config.base_url, "create_service: called");
    Ok(Arc::new(HttpPlanClient::from_config(config)?))
}
