//! Display contract for the request state
//!
//! Pure projections of [`RequestState`] into what a front-end shows. Nothing
//! here knows about colours or widgets; the TUI and CLI style the output.

use serde_json::json;

use crate::lifecycle::RequestState;

/// Heading shown above a successful schedule
pub const SCHEDULE_HEADING: &str = "Your Optimized Schedule";

/// Busy indicator text
pub const BUSY_TEXT: &str = "Planning your day...";

/// One schedule row: task as primary text, time as secondary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleLine<'a> {
    pub primary: &'a str,
    pub secondary: &'a str,
}

/// What the result area should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView<'a> {
    /// Idle: nothing
    Empty,
    /// Loading: a busy indicator only
    Busy,
    /// Explanation first, then rows in received order
    Schedule {
        explanation: &'a str,
        items: Vec<ScheduleLine<'a>>,
    },
    /// The message, verbatim
    Error(&'a str),
}

/// Project a state onto its view
pub fn project(state: &RequestState) -> ResultView<'_> {
    match state {
        RequestState::Idle => ResultView::Empty,
        RequestState::Loading => ResultView::Busy,
        RequestState::Succeeded(result) => ResultView::Schedule {
            explanation: &result.explanation,
            items: result
                .schedule
                .iter()
                .map(|item| ScheduleLine {
                    primary: &item.task,
                    secondary: &item.time,
                })
                .collect(),
        },
        RequestState::Failed(message) => ResultView::Error(message),
    }
}

/// Whether the submit control should be enabled
pub fn submit_enabled(state: &RequestState) -> bool {
    !state.is_loading()
}

/// Role of a line of plain-text output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Explanation,
    Task,
    Time,
    Error,
    Busy,
}

/// A line of plain-text output tagged with its role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub kind: LineKind,
    pub text: String,
}

impl TextLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Flatten a state into tagged lines for terminal output
pub fn text_lines(state: &RequestState) -> Vec<TextLine> {
    match project(state) {
        ResultView::Empty => Vec::new(),
        ResultView::Busy => vec![TextLine::new(LineKind::Busy, BUSY_TEXT)],
        ResultView::Error(message) => vec![TextLine::new(LineKind::Error, message)],
        ResultView::Schedule { explanation, items } => {
            let mut lines = Vec::with_capacity(2 + items.len() * 2);
            lines.push(TextLine::new(LineKind::Heading, SCHEDULE_HEADING));
            lines.push(TextLine::new(LineKind::Explanation, explanation));
            for item in items {
                lines.push(TextLine::new(LineKind::Task, item.primary));
                lines.push(TextLine::new(LineKind::Time, item.secondary));
            }
            lines
        }
    }
}

/// JSON rendering for scripted use
///
/// Succeeded yields the plan as received; Failed yields `{"error": message}`.
pub fn to_json(state: &RequestState) -> serde_json::Value {
    match state {
        RequestState::Succeeded(result) => json!(result),
        RequestState::Failed(message) => json!({ "error": message }),
        other => json!({ "state": other.label() }),
    }
}
