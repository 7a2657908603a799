//! PlanService trait definition

use async_trait::async_trait;

use super::{HealthStatus, PlanError, PlanResult};

/// Remote planning service
///
/// Each call is one best-effort attempt: no retry, no backoff, no timeout.
/// Implementations must not alter the task order they are given.
#[async_trait]
pub trait PlanService: Send + Sync {
    /// Ask the service to schedule the given tasks
    async fn plan(&self, tasks: &[String]) -> Result<PlanResult, PlanError>;

    /// Probe the service's health endpoint
    async fn health(&self) -> Result<HealthStatus, PlanError>;
}
