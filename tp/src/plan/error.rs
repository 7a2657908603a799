//! Planning service error types

use thiserror::Error;

/// Errors that can occur talking to the planning service
///
/// These never reach the user verbatim; the lifecycle logs them and shows a
/// fixed message instead.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl PlanError {
    /// HTTP status if the service answered with a non-success code
    pub fn status(&self) -> Option<u16> {
        match self {
            PlanError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True if the service was never reached
    pub fn is_connect(&self) -> bool {
        match self {
            PlanError::Network(e) => e.is_connect(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(e: serde_json::Error) -> Self {
        PlanError::InvalidResponse(e.to_string())
    }
}
