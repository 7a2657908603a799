//! Integration tests for TaskPlanner
//!
//! These tests drive the lifecycle and the HTTP client against a throwaway
//! socket server standing in for the planning service.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use taskplanner::config::ServiceConfig;
use taskplanner::display::{self, ResultView, ScheduleLine};
use taskplanner::{
    EMPTY_TASKS_MESSAGE, HealthStatus, HttpPlanClient, PLAN_FAILED_MESSAGE, PlanError, PlanLifecycle, PlanResult,
    PlanService, RequestState, ScheduleItem, Submission, TaskList,
};

// =============================================================================
// Stub service
// =============================================================================

/// Accept one connection, answer it with a canned response, return the raw request
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stub");
    let addr = listener.local_addr().expect("No local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.expect("Failed to write");
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.expect("Failed to read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let len = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Address that refuses connections
async fn closed_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
    let addr = listener.local_addr().expect("No local addr");
    drop(listener);
    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> HttpPlanClient {
    let config = ServiceConfig {
        base_url: base_url.to_string(),
        ..Default::default()
    };
    HttpPlanClient::from_config(&config).expect("Failed to build client")
}

const REPORT_BODY: &str =
    r#"{"schedule": [{"time": "09:00", "task": "Write report"}], "explanation": "Do it first."}"#;

fn report_plan() -> PlanResult {
    PlanResult {
        schedule: vec![ScheduleItem::new("09:00", "Write report")],
        explanation: "Do it first.".to_string(),
    }
}

// =============================================================================
// HTTP client
// =============================================================================

#[tokio::test]
async fn test_http_plan_posts_tasks_and_parses_schedule() {
    let (url, server) = serve_once("200 OK", REPORT_BODY).await;
    let client = client_for(&url);

    let tasks = vec!["Write report".to_string(), "Write report".to_string()];
    let result = client.plan(&tasks).await.expect("plan should succeed");
    assert_eq!(result, report_plan());

    let request = server.await.expect("stub panicked");
    assert!(request.starts_with("POST /api/plan-tasks HTTP/1.1"), "{}", request);
    assert!(
        request.ends_with(r#"{"tasks":["Write report","Write report"]}"#),
        "{}",
        request
    );
}

#[tokio::test]
async fn test_http_plan_non_success_status() {
    let (url, _server) = serve_once("500 Internal Server Error", r#"{"detail": "Failed to parse AI response"}"#).await;

    let err = client_for(&url).plan(&["a".to_string()]).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_http_plan_malformed_body() {
    let (url, _server) = serve_once("200 OK", r#"{"plan": "not the expected shape"}"#).await;

    let err = client_for(&url).plan(&["a".to_string()]).await.unwrap_err();
    assert!(matches!(err, PlanError::InvalidResponse(_)), "{:?}", err);
}

#[tokio::test]
async fn test_http_plan_connection_refused() {
    let url = closed_addr().await;

    let err = client_for(&url).plan(&["a".to_string()]).await.unwrap_err();
    assert!(err.is_connect(), "{:?}", err);
}

#[tokio::test]
async fn test_http_health() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"status": "healthy", "service": "Task Planner API", "version": "1.0.0"}"#,
    )
    .await;

    let health = client_for(&url).health().await.expect("health should succeed");
    assert!(health.is_healthy());
    assert_eq!(health.service, "Task Planner API");

    let request = server.await.expect("stub panicked");
    assert!(request.starts_with("GET / HTTP/1.1"), "{}", request);
}

// =============================================================================
// Lifecycle end to end
// =============================================================================

/// Service that counts calls and never succeeds
struct CountingService {
    calls: AtomicUsize,
}

#[async_trait]
impl PlanService for CountingService {
    async fn plan(&self, _tasks: &[String]) -> Result<PlanResult, PlanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PlanError::InvalidResponse("unexpected call".to_string()))
    }

    async fn health(&self) -> Result<HealthStatus, PlanError> {
        Err(PlanError::InvalidResponse("unexpected call".to_string()))
    }
}

#[tokio::test]
async fn test_blank_list_never_reaches_service() {
    let service = CountingService {
        calls: AtomicUsize::new(0),
    };
    let mut lifecycle = PlanLifecycle::new();

    let state = lifecycle.run(&TaskList::from_texts(["", "   "]), &service).await;

    assert_eq!(state, RequestState::Failed(EMPTY_TASKS_MESSAGE.to_string()));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_editor_to_schedule_over_http() {
    let (url, server) = serve_once("200 OK", REPORT_BODY).await;
    let client = client_for(&url);

    let mut tasks = TaskList::new();
    tasks.add_entry();
    tasks.update_entry(1, "  Write report  ");

    let mut lifecycle = PlanLifecycle::new();
    let ticket = match lifecycle.submit(&tasks) {
        Submission::Dispatched(ticket) => ticket,
        other => panic!("Expected Dispatched, got {:?}", other),
    };
    assert_eq!(lifecycle.state(), RequestState::Loading);
    assert_eq!(display::project(&lifecycle.state()), ResultView::Busy);

    let outcome = client.plan(&ticket.tasks).await;
    assert!(lifecycle.complete(ticket.id, outcome));

    let state = lifecycle.state();
    assert_eq!(state, RequestState::Succeeded(report_plan()));
    assert_eq!(
        display::project(&state),
        ResultView::Schedule {
            explanation: "Do it first.",
            items: vec![ScheduleLine {
                primary: "Write report",
                secondary: "09:00",
            }],
        }
    );

    let request = server.await.expect("stub panicked");
    assert!(request.ends_with(r#"{"tasks":["Write report"]}"#), "{}", request);
}

#[tokio::test]
async fn test_network_failure_shows_generic_message() {
    let client = client_for(&closed_addr().await);
    let mut lifecycle = PlanLifecycle::new();

    let state = lifecycle.run(&TaskList::from_texts(["Call client"]), &client).await;

    assert_eq!(state, RequestState::Failed(PLAN_FAILED_MESSAGE.to_string()));
    assert_eq!(display::project(&state), ResultView::Error(PLAN_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_server_error_then_retry_succeeds() {
    let mut lifecycle = PlanLifecycle::new();
    let tasks = TaskList::from_texts(["Write report"]);

    let (url, _server) = serve_once("503 Service Unavailable", "").await;
    let state = lifecycle.run(&tasks, &client_for(&url)).await;
    assert_eq!(state.error(), Some(PLAN_FAILED_MESSAGE));

    let (url, _server) = serve_once("200 OK", REPORT_BODY).await;
    let state = lifecycle.run(&tasks, &client_for(&url)).await;
    assert_eq!(state.result(), Some(&report_plan()));
}
