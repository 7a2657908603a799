//! TUI Runner - main loop that owns the terminal
//!
//! The TuiRunner is responsible for:
//! - Dispatching terminal events to App for handling
//! - Turning submit requests into dispatcher submissions
//! - Copying request state changes into the App before each draw

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tracing::debug;

use crate::lifecycle::Submission;
use crate::plan::PlanService;

use super::Tui;
use super::app::App;
use super::dispatcher::PlanDispatcher;
use super::events::{Event, EventHandler};
use super::views;

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Event handler
    event_handler: EventHandler,
    /// Background plan requests
    dispatcher: PlanDispatcher,
}

impl TuiRunner {
    /// Create a new TuiRunner
    pub fn new(terminal: Tui, service: Arc<dyn PlanService>, tick_rate: Duration) -> Self {
        debug!(?tick_rate, "TuiRunner::new: called");
        Self {
            app: App::new(),
            terminal,
            event_handler: EventHandler::new(tick_rate),
            dispatcher: PlanDispatcher::new(service),
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        loop {
            // Draw the UI
            self.terminal.draw(|frame| views::render(self.app.state_mut(), frame))?;

            // Handle events
            match self.event_handler.next().await? {
                Event::Tick => {
                    self.app.state_mut().tick();
                }
                Event::Key(key_event) => {
                    if self.app.handle_key(key_event) {
                        break;
                    }
                }
                Event::Paste(text) => {
                    self.app.handle_paste(&text);
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "TuiRunner: resize");
                }
            }

            // Input can arrive faster than ticks; settle requests on every event
            self.process_pending();
            self.dispatcher.poll();
            self.sync_request_state();

            // Check if we should quit
            if self.app.state().should_quit {
                break;
            }
        }

        self.dispatcher.shutdown();
        Ok(())
    }

    /// Act on a submit request left by the App
    fn process_pending(&mut self) {
        if !std::mem::take(&mut self.app.state_mut().submit_requested) {
            return;
        }

        match self.dispatcher.submit(&self.app.state().tasks) {
            Submission::Dispatched(ticket) => debug!(ticket = ticket.id, "TuiRunner: request dispatched"),
            Submission::Rejected => debug!("TuiRunner: submission rejected, no valid tasks"),
            Submission::Busy => self.app.state_mut().set_status("Still planning, please wait"),
        }
    }

    /// Copy the latest request state into the App if it changed
    fn sync_request_state(&mut self) {
        if let Some(state) = self.dispatcher.changed_state() {
            self.app.state_mut().apply_request_state(state);
        }
    }
}
