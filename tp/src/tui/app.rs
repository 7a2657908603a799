//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::{AppState, InteractionMode};

/// Rows moved per PgUp/PgDn in the result pane
const RESULT_PAGE: usize = 10;

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    /// Application state
    state: AppState,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Self {
        Self { state: AppState::new() }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        // Clear any transient message on key press
        self.state.clear_status();

        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            return true; // Force quit
        }

        match self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }

        self.state.should_quit
    }

    /// Handle pasted text; ignored under the help overlay
    pub fn handle_paste(&mut self, text: &str) {
        if self.state.interaction_mode == InteractionMode::Normal {
            self.state.clear_status();
            self.state.paste(text);
        }
    }

    /// Handle key while editing tasks
    fn handle_normal_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.state.should_quit = true;
            }
            (KeyCode::F(1), _) => {
                self.state.interaction_mode = InteractionMode::Help;
            }

            // === Focus ===
            (KeyCode::Up, _) | (KeyCode::BackTab, _) => self.state.select_prev(),
            (KeyCode::Down, _) | (KeyCode::Tab, _) => self.state.select_next(),

            // === List editing ===
            (KeyCode::Char('n'), KeyModifiers::CONTROL) => self.state.add_entry(),
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => self.state.remove_selected(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.state.clear_selected(),

            // === Result pane ===
            (KeyCode::PageUp, _) => self.state.scroll_result_up(RESULT_PAGE),
            (KeyCode::PageDown, _) => self.state.scroll_result_down(RESULT_PAGE),
            (KeyCode::Home, _) => self.state.scroll_result_top(),
            (KeyCode::End, _) => self.state.scroll_result_bottom(),

            // === Submit ===
            (KeyCode::Enter, _) => self.state.request_submit(),

            // === Text editing ===
            (KeyCode::Backspace, _) => self.state.pop_char(),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.state.push_char(c),

            _ => {}
        }
    }

    /// Handle key in help overlay
    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
            self.state.interaction_mode = InteractionMode::Normal;
        }
    }
}
