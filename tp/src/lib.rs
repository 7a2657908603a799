//! TaskPlanner - plan a day's tasks with a remote scheduling service
//!
//! The user keeps an editable list of free-text tasks, submits the non-blank
//! ones to a planning service, and reads back an ordered schedule with an
//! explanation. All scheduling happens on the service; this crate owns the
//! client-side state machine.
//!
//! # Modules
//!
//! - [`editor`] - the task list and its invariants
//! - [`lifecycle`] - the single in-flight request state machine
//! - [`plan`] - planning service wire types, errors and HTTP client
//! - [`display`] - projection of request state into displayable content
//! - [`tui`] - interactive terminal front-end
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod display;
pub mod editor;
pub mod lifecycle;
pub mod plan;
pub mod tui;

// Re-export commonly used types
pub use config::{Config, ServiceConfig, TuiConfig};
pub use display::{ResultView, ScheduleLine};
pub use editor::{TaskEntry, TaskList};
pub use lifecycle::{
    EMPTY_TASKS_MESSAGE, PLAN_FAILED_MESSAGE, PlanLifecycle, PlanTicket, RequestState, Submission,
};
pub use plan::{HealthStatus, HttpPlanClient, PlanError, PlanRequest, PlanResult, PlanService, ScheduleItem};
