//! Plan request lifecycle
//!
//! A single-slot state machine: at most one planning request is in flight.
//! Every transition is published on a watch channel so display layers can
//! redraw without knowing how the state is stored.
//!
//! ```text
//! Idle ──submit──► Loading ──complete(Ok)──► Succeeded
//!   ▲                 │   └──complete(Err)─► Failed
//!   └─────abandon─────┘
//! Succeeded / Failed ──submit──► Loading
//! any (not Loading) ──submit with no valid tasks──► Failed
//! ```

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::editor::TaskList;
use crate::plan::{PlanError, PlanResult, PlanService};

/// Shown when every entry is blank at submit time
pub const EMPTY_TASKS_MESSAGE: &str = "Please add at least one task";

/// Shown for any transport or service failure
pub const PLAN_FAILED_MESSAGE: &str = "Failed to plan tasks. Please try again.";

/// Where the current submission stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(PlanResult),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The plan, if the last request succeeded
    pub fn result(&self) -> Option<&PlanResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// The user-facing message, if the last submission failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Short label for logs and status bars
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// A dispatched request: its id plus the task snapshot to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTicket {
    pub id: u64,
    pub tasks: Vec<String>,
}

/// Outcome of [`PlanLifecycle::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Now Loading; the caller must send `ticket.tasks` and report back
    Dispatched(PlanTicket),
    /// No valid tasks; state is Failed and nothing was sent
    Rejected,
    /// A request is already in flight; nothing changed
    Busy,
}

/// Owner of the single [`RequestState`]
#[derive(Debug)]
pub struct PlanLifecycle {
    state_tx: watch::Sender<RequestState>,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl Default for PlanLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanLifecycle {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(RequestState::Idle);
        Self {
            state_tx,
            in_flight: None,
            next_ticket: 1,
        }
    }

    /// Current state (cloned out of the channel)
    pub fn state(&self) -> RequestState {
        self.state_tx.borrow().clone()
    }

    /// Receive a notification on every transition
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state_tx.subscribe()
    }

    /// Id of the request currently awaited, if any
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Start a submission from the editor's current contents
    ///
    /// Re-entrant submission while Loading is refused. The returned ticket
    /// carries a snapshot of the valid tasks; later edits don't touch it.
    pub fn submit(&mut self, tasks: &TaskList) -> Submission {
        debug!(entries = tasks.len(), "PlanLifecycle::submit: called");
        if let Some(id) = self.in_flight {
            warn!(ticket = id, "PlanLifecycle::submit: request already in flight, ignoring");
            return Submission::Busy;
        }

        let valid = tasks.valid_tasks();
        if valid.is_empty() {
            info!("PlanLifecycle::submit: no valid tasks");
            self.transition(RequestState::Failed(EMPTY_TASKS_MESSAGE.to_string()));
            return Submission::Rejected;
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(id);
        info!(ticket = id, task_count = valid.len(), "PlanLifecycle::submit: dispatching");
        self.transition(RequestState::Loading);

        Submission::Dispatched(PlanTicket { id, tasks: valid })
    }

    /// Apply the outcome of a dispatched request
    ///
    /// Outcomes for tickets that are no longer in flight are dropped. Returns
    /// true if the outcome was applied.
    pub fn complete(&mut self, ticket_id: u64, outcome: Result<PlanResult, PlanError>) -> bool {
        if self.in_flight != Some(ticket_id) {
            debug!(
                ticket = ticket_id,
                in_flight = ?self.in_flight,
                "PlanLifecycle::complete: stale outcome discarded"
            );
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                info!(
                    ticket = ticket_id,
                    items = result.schedule.len(),
                    "PlanLifecycle::complete: plan received"
                );
                self.transition(RequestState::Succeeded(result));
            }
            Err(e) => {
                warn!(ticket = ticket_id, error = %e, "PlanLifecycle::complete: planning request failed");
                self.transition(RequestState::Failed(PLAN_FAILED_MESSAGE.to_string()));
            }
        }
        true
    }

    /// Forget the in-flight request, if any
    ///
    /// A Loading state falls back to Idle; a late outcome for the abandoned
    /// ticket will be discarded by [`complete`](Self::complete).
    pub fn abandon(&mut self) {
        if let Some(id) = self.in_flight.take() {
            info!(ticket = id, "PlanLifecycle::abandon: dropping in-flight request");
            self.transition(RequestState::Idle);
        }
    }

    /// Submit, wait for the service, and return the settled state
    pub async fn run(&mut self, tasks: &TaskList, service: &dyn PlanService) -> RequestState {
        if let Submission::Dispatched(ticket) = self.submit(tasks) {
            let outcome = service.plan(&ticket.tasks).await;
            self.complete(ticket.id, outcome);
        }
        self.state()
    }

    fn transition(&mut self, next: RequestState) {
        let prev = self.state_tx.send_replace(next);
        debug!(
            from = prev.label(),
            to = self.state_tx.borrow().label(),
            "PlanLifecycle: transition"
        );
    }
}
