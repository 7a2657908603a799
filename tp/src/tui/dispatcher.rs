//! Background plan requests for the TUI
//!
//! Owns the lifecycle and the single in-flight planning task. The runner
//! calls [`PlanDispatcher::poll`] from its loop; the task reports back over
//! an mpsc channel tagged with its ticket id.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::editor::TaskList;
use crate::lifecycle::{PlanLifecycle, PlanTicket, RequestState, Submission};
use crate::plan::{PlanError, PlanResult, PlanService};

/// Outcome of a background planning call, tagged with its ticket id
type PlanOutcome = (u64, Result<PlanResult, PlanError>);

/// Runs at most one planning call at a time on the tokio runtime
pub struct PlanDispatcher {
    /// Owner of the request state
    lifecycle: PlanLifecycle,
    /// Change notifications from the lifecycle
    state_rx: watch::Receiver<RequestState>,
    /// Planning service
    service: Arc<dyn PlanService>,
    /// Receiver for the in-flight request's outcome
    result_rx: Option<mpsc::Receiver<PlanOutcome>>,
    /// Handle to the background planning task
    task: Option<JoinHandle<()>>,
}

impl PlanDispatcher {
    pub fn new(service: Arc<dyn PlanService>) -> Self {
        let lifecycle = PlanLifecycle::new();
        let state_rx = lifecycle.subscribe();
        Self {
            lifecycle,
            state_rx,
            service,
            result_rx: None,
            task: None,
        }
    }

    /// Current request state
    pub fn state(&self) -> RequestState {
        self.lifecycle.state()
    }

    /// Ticket id of the request being awaited, if any
    pub fn in_flight(&self) -> Option<u64> {
        self.lifecycle.in_flight()
    }

    /// Submit the editor's contents, spawning the call when dispatched
    pub fn submit(&mut self, tasks: &TaskList) -> Submission {
        let submission = self.lifecycle.submit(tasks);
        if let Submission::Dispatched(ticket) = &submission {
            self.spawn(ticket.clone());
        }
        submission
    }

    fn spawn(&mut self, ticket: PlanTicket) {
        info!(ticket = ticket.id, task_count = ticket.tasks.len(), "Spawning plan request task");

        let (result_tx, result_rx) = mpsc::channel::<PlanOutcome>(1);
        self.result_rx = Some(result_rx);

        let service = Arc::clone(&self.service);
        self.task = Some(tokio::spawn(async move {
            debug!(ticket = ticket.id, "Plan task started");
            let outcome = service.plan(&ticket.tasks).await;
            // Receiver is gone if the TUI was torn down; the outcome is dropped
            let _ = result_tx.send((ticket.id, outcome)).await;
        }));
    }

    /// Apply the in-flight request's outcome if it has arrived
    ///
    /// Returns true once the request has settled.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.result_rx.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok((ticket_id, outcome)) => {
                self.lifecycle.complete(ticket_id, outcome);
            }
            Err(mpsc::error::TryRecvError::Empty) => return false,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                warn!("Plan task ended without sending a result");
                if let Some(id) = self.lifecycle.in_flight() {
                    self.lifecycle.complete(
                        id,
                        Err(PlanError::InvalidResponse("planning task ended without a result".to_string())),
                    );
                }
            }
        }
        self.result_rx = None;
        self.task = None;
        true
    }

    /// The latest state, if it changed since the last call
    pub fn changed_state(&mut self) -> Option<RequestState> {
        if self.state_rx.has_changed().unwrap_or(false) {
            Some(self.state_rx.borrow_and_update().clone())
        } else {
            None
        }
    }

    /// Abort any in-flight request and forget it
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("PlanDispatcher::shutdown: aborting plan task");
            task.abort();
        }
        self.result_rx = None;
        self.lifecycle.abandon();
    }
}

impl Drop for PlanDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::lifecycle::PLAN_FAILED_MESSAGE;
    use crate::plan::client::mock::MockPlanService;
    use crate::plan::{HealthStatus, ScheduleItem};

    /// Service whose plan call never returns
    struct StalledService;

    #[async_trait]
    impl PlanService for StalledService {
        async fn plan(&self, _tasks: &[String]) -> Result<PlanResult, PlanError> {
            std::future::pending().await
        }

        async fn health(&self) -> Result<HealthStatus, PlanError> {
            std::future::pending().await
        }
    }

    fn report_plan() -> PlanResult {
        PlanResult {
            schedule: vec![ScheduleItem::new("09:00", "Write report")],
            explanation: "Do it first.".to_string(),
        }
    }

    async fn poll_until_settled(dispatcher: &mut PlanDispatcher) {
        for _ in 0..200 {
            if dispatcher.poll() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("request never settled");
    }

    #[tokio::test]
    async fn test_success_applied_after_polling() {
        let service = Arc::new(MockPlanService::new(vec![Ok(report_plan())]));
        let mut dispatcher = PlanDispatcher::new(service.clone());

        let submission = dispatcher.submit(&TaskList::from_texts(["Write report", " "]));
        assert!(matches!(submission, Submission::Dispatched(_)));
        assert_eq!(dispatcher.changed_state(), Some(RequestState::Loading));

        poll_until_settled(&mut dispatcher).await;

        assert_eq!(dispatcher.state(), RequestState::Succeeded(report_plan()));
        assert_eq!(dispatcher.changed_state(), Some(RequestState::Succeeded(report_plan())));
        assert_eq!(dispatcher.changed_state(), None);
        assert_eq!(service.calls(), vec![vec!["Write report".to_string()]]);
        assert!(!dispatcher.poll());
    }

    #[tokio::test]
    async fn test_blank_submission_spawns_nothing() {
        let service = Arc::new(MockPlanService::new(vec![]));
        let mut dispatcher = PlanDispatcher::new(service.clone());

        assert_eq!(dispatcher.submit(&TaskList::new()), Submission::Rejected);
        assert!(!dispatcher.poll());
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_second_submit_while_loading_is_busy() {
        let mut dispatcher = PlanDispatcher::new(Arc::new(StalledService));
        let tasks = TaskList::from_texts(["a"]);

        assert!(matches!(dispatcher.submit(&tasks), Submission::Dispatched(_)));
        assert_eq!(dispatcher.submit(&tasks), Submission::Busy);
        assert_eq!(dispatcher.state(), RequestState::Loading);
    }

    #[tokio::test]
    async fn test_task_ending_without_result_fails_request() {
        let mut dispatcher = PlanDispatcher::new(Arc::new(StalledService));
        dispatcher.submit(&TaskList::from_texts(["Call client"]));

        // Kill the task so its sender is dropped without a send
        let task = dispatcher.task.take().expect("task spawned");
        task.abort();
        let _ = task.await;

        assert!(dispatcher.poll());
        assert_eq!(dispatcher.state(), RequestState::Failed(PLAN_FAILED_MESSAGE.to_string()));
        assert_eq!(dispatcher.in_flight(), None);
    }

    #[tokio::test]
    async fn test_shutdown_in_flight_discards_late_outcome() {
        let mut dispatcher = PlanDispatcher::new(Arc::new(StalledService));
        dispatcher.submit(&TaskList::from_texts(["Write report"]));
        let ticket = dispatcher.in_flight().expect("request in flight");

        dispatcher.shutdown();

        assert_eq!(dispatcher.state(), RequestState::Idle);
        assert_eq!(dispatcher.in_flight(), None);
        assert!(dispatcher.task.is_none());
        assert!(!dispatcher.poll());

        // An outcome that arrives after teardown is not applied
        assert!(!dispatcher.lifecycle.complete(ticket, Ok(report_plan())));
        assert_eq!(dispatcher.state(), RequestState::Idle);
    }
}
