//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.
//! The request state is a read-only copy of what the lifecycle last
//! published; the task list is owned here and edited in place.

use std::time::Instant;

use tracing::debug;

use crate::display;
use crate::editor::TaskList;
use crate::lifecycle::RequestState;

/// Spinner frames for the busy indicator
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Interaction mode (modal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Editing the task list
    #[default]
    Normal,
    /// Help overlay
    Help,
}

/// Complete TUI state
#[derive(Debug)]
pub struct AppState {
    /// Task list being edited
    pub tasks: TaskList,
    /// Index of the focused entry
    pub selected: usize,
    /// Last state published by the lifecycle
    pub request: RequestState,
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Set when the user asks to submit; consumed by the runner
    pub submit_requested: bool,
    /// When the current Loading state began
    pub loading_since: Option<Instant>,
    /// Advances on every tick while loading
    pub spinner_frame: usize,
    /// First visible row of the result pane
    pub result_scroll: usize,
    /// Largest useful scroll offset, cached by the last render
    pub result_max_scroll: usize,
    /// Transient footer message
    pub status_message: Option<String>,
    /// Exit flag
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tasks: TaskList::new(),
            selected: 0,
            request: RequestState::Idle,
            interaction_mode: InteractionMode::Normal,
            submit_requested: false,
            loading_since: None,
            spinner_frame: 0,
            result_scroll: 0,
            result_max_scroll: 0,
            status_message: None,
            should_quit: false,
        }
    }

    /// Text of the focused entry
    pub fn selected_text(&self) -> &str {
        self.tasks.get(self.selected).map(|e| e.text()).unwrap_or_default()
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.tasks.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = if self.selected == 0 { self.tasks.len() - 1 } else { self.selected - 1 };
    }

    /// Append a blank entry and focus it
    pub fn add_entry(&mut self) {
        self.selected = self.tasks.add_entry();
    }

    /// Remove the focused entry, keeping focus on a valid index
    pub fn remove_selected(&mut self) {
        if self.tasks.remove_entry(self.selected) {
            self.selected = self.selected.min(self.tasks.len() - 1);
        } else {
            self.set_status("At least one task slot is required");
        }
    }

    /// Type a character into the focused entry
    pub fn push_char(&mut self, c: char) {
        let mut text = self.selected_text().to_string();
        text.push(c);
        self.tasks.update_entry(self.selected, text);
    }

    /// Paste text into the focused entry
    ///
    /// The first line is appended to the focused entry; every further
    /// non-blank line gets a slot of its own, inserted as new entries at the
    /// end of the list.
    pub fn paste(&mut self, text: &str) {
        let mut lines = text.lines();
        let Some(first) = lines.next() else {
            return;
        };

        let mut current = self.selected_text().to_string();
        current.push_str(first.trim_end_matches('\r'));
        self.tasks.update_entry(self.selected, current);

        let mut added = 0;
        for line in lines.map(str::trim).filter(|l| !l.is_empty()) {
            self.selected = self.tasks.add_entry();
            self.tasks.update_entry(self.selected, line);
            added += 1;
        }
        debug!(added, "AppState::paste: called");
    }

    /// Delete the last character of the focused entry
    pub fn pop_char(&mut self) {
        let mut text = self.selected_text().to_string();
        if text.pop().is_some() {
            self.tasks.update_entry(self.selected, text);
        }
    }

    /// Clear the focused entry
    pub fn clear_selected(&mut self) {
        self.tasks.update_entry(self.selected, String::new());
    }

    /// Ask the runner to submit on its next tick
    ///
    /// Ignored while a request is loading, mirroring the disabled button.
    pub fn request_submit(&mut self) {
        if display::submit_enabled(&self.request) {
            self.submit_requested = true;
        } else {
            self.set_status("Still planning, please wait");
        }
    }

    /// Take in a state published by the lifecycle
    pub fn apply_request_state(&mut self, state: RequestState) {
        debug!(state = state.label(), "AppState::apply_request_state: called");
        match (&self.request, &state) {
            (RequestState::Loading, RequestState::Loading) => {}
            (_, RequestState::Loading) => {
                self.loading_since = Some(Instant::now());
                self.spinner_frame = 0;
            }
            _ => self.loading_since = None,
        }
        if state != self.request {
            self.result_scroll = 0;
        }
        self.request = state;
    }

    /// Scroll the result pane towards the top
    pub fn scroll_result_up(&mut self, lines: usize) {
        debug!(lines, "AppState::scroll_result_up: called");
        self.result_scroll = self.result_scroll.min(self.result_max_scroll).saturating_sub(lines);
    }

    /// Scroll the result pane towards the end of the schedule
    pub fn scroll_result_down(&mut self, lines: usize) {
        debug!(lines, max = self.result_max_scroll, "AppState::scroll_result_down: called");
        self.result_scroll = self.result_scroll.saturating_add(lines).min(self.result_max_scroll);
    }

    pub fn scroll_result_top(&mut self) {
        self.result_scroll = 0;
    }

    pub fn scroll_result_bottom(&mut self) {
        self.result_scroll = self.result_max_scroll;
    }

    /// Periodic update
    pub fn tick(&mut self) {
        if self.request.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Current spinner glyph
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        debug!(%msg, "AppState::set_status: called");
        self.status_message = Some(msg);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
