//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module is responsible
//! for drawing the UI based on AppState, but never modifies state.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use tracing::trace;

use super::state::{AppState, InteractionMode};
use crate::display::{self, BUSY_TEXT, ResultView, SCHEDULE_HEADING};
use crate::lifecycle::RequestState;

/// Palette
mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(33, 150, 243); // Primary blue
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const ERROR: Color = Color::Rgb(245, 0, 87); // Pink-red
    pub const SUCCESS: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const BUSY: Color = Color::Rgb(255, 215, 0); // Gold
    pub const DIM: Color = Color::DarkGray;
}

/// Main render function
///
/// Takes `&mut` only to cache the result pane's scroll bound for key handling.
pub fn render(state: &mut AppState, frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                     // Header
            Constraint::Length(task_pane_height(state.tasks.len())), // Task editor
            Constraint::Length(3),                     // Submit control
            Constraint::Min(0),                        // Result
            Constraint::Length(3),                     // Footer
        ])
        .split(area);

    render_header(state, frame, chunks[0]);
    render_tasks(state, frame, chunks[1]);
    render_submit(state, frame, chunks[2]);
    render_result(state, frame, chunks[3]);
    render_footer(state, frame, chunks[4]);

    if state.interaction_mode == InteractionMode::Help {
        render_help_overlay(frame, area);
    }
}

/// Render the header bar
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_header: called");
    let (label, color) = match &state.request {
        RequestState::Idle => ("ready", colors::DIM),
        RequestState::Loading => ("planning", colors::BUSY),
        RequestState::Succeeded(_) => ("planned", colors::SUCCESS),
        RequestState::Failed(_) => ("failed", colors::ERROR),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Task Planner ",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(format!("{} tasks", state.tasks.valid_tasks().len()), Style::default()),
        Span::raw(" │ "),
        Span::styled(label, Style::default().fg(color)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Render the editable task list
fn render_tasks(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(entries = state.tasks.len(), "render_tasks: called");
    let removable = state.tasks.can_remove();

    let items: Vec<ListItem> = state
        .tasks
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let selected = i == state.selected;
            let mut spans = vec![
                Span::styled(format!("Task {:<3}", i + 1), Style::default().fg(colors::DIM)),
                Span::raw(entry.text().to_string()),
            ];
            if selected {
                spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
                if removable {
                    spans.push(Span::styled("  [^D] Remove", Style::default().fg(colors::DIM)));
                }
            }

            let item = ListItem::new(Line::from(spans));
            if selected {
                item.style(Style::default().bg(colors::SELECTED_BG))
            } else {
                item
            }
        })
        .collect();

    // Keep the focused row visible when the list is taller than the pane
    let visible = area.height.saturating_sub(2) as usize;
    let skip = (state.selected + 1).saturating_sub(visible);
    let items: Vec<ListItem> = items.into_iter().skip(skip).collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Your Tasks "));
    frame.render_widget(list, area);
}

/// Render the submit control (disabled while loading)
fn render_submit(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_submit: called");
    let content = if display::submit_enabled(&state.request) {
        Line::from(vec![
            Span::styled(
                "[Enter]",
                Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Plan My Day", Style::default().add_modifier(Modifier::BOLD)),
        ])
    } else {
        let elapsed = state
            .loading_since
            .map(|t| format_duration(t.elapsed()))
            .unwrap_or_default();
        Line::from(vec![
            Span::styled(format!("{} ", state.spinner()), Style::default().fg(colors::BUSY)),
            Span::styled(format!("{} {}", BUSY_TEXT, elapsed), Style::default().fg(colors::DIM)),
        ])
    };

    let submit = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(submit, area);
}

/// Render the result area from the display projection
fn render_result(state: &mut AppState, frame: &mut Frame, area: Rect) {
    trace!(state = state.request.label(), "render_result: called");
    match display::project(&state.request) {
        ResultView::Empty => render_empty_message(
            frame,
            area,
            "Enter your tasks for today and press Enter to plan them",
        ),
        ResultView::Busy => render_empty_message(frame, area, BUSY_TEXT),
        ResultView::Error(message) => {
            let error = Paragraph::new(message)
                .style(Style::default().fg(colors::ERROR))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false });
            frame.render_widget(error, area.inner(Margin::new(1, 1)));
        }
        ResultView::Schedule { explanation, items } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", SCHEDULE_HEADING));
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let mut lines: Vec<Line> = explanation
                .lines()
                .map(|l| Line::styled(l.to_string(), Style::default().fg(Color::Gray)))
                .collect();
            lines.push(Line::styled(
                "─".repeat(inner.width as usize),
                Style::default().fg(colors::DIM),
            ));
            for item in &items {
                lines.push(Line::styled(
                    item.primary.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                lines.push(Line::styled(
                    format!("  {}", item.secondary),
                    Style::default().fg(colors::DIM),
                ));
            }

            let schedule = Paragraph::new(lines).wrap(Wrap { trim: false });

            // Measured with the same wrapping the paragraph renders with
            let content_height = schedule.line_count(inner.width);
            let max_scroll = content_height.saturating_sub(inner.height as usize);
            state.result_max_scroll = max_scroll;
            let scroll = state.result_scroll.min(max_scroll);

            let schedule = schedule.scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
            frame.render_widget(schedule, inner);

            if max_scroll > 0 {
                let hint = format!(" [PgUp/PgDn] {}/{} ", scroll, max_scroll);
                let hint_area = Rect {
                    x: area.x + area.width.saturating_sub(hint.chars().count() as u16 + 1),
                    y: area.y + area.height.saturating_sub(1),
                    width: (hint.chars().count() as u16).min(area.width),
                    height: 1.min(area.height),
                };
                frame.render_widget(Paragraph::new(hint).style(Style::default().fg(colors::KEYBIND)), hint_area);
            }
        }
    }
}

/// Render the footer (status message or keybinds)
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_footer: called");
    let content = if let Some(ref msg) = state.status_message {
        Line::from(Span::styled(format!(" {}", msg), Style::default().fg(colors::BUSY)))
    } else {
        let mut keybinds = vec![("[Enter]", "Plan"), ("[^N]", "Add Task")];
        if state.tasks.can_remove() {
            keybinds.push(("[^D]", "Remove"));
        }
        keybinds.extend([("[↑↓]", "Move"), ("[F1]", "Help"), ("[Esc]", "Quit")]);

        let mut spans = vec![Span::raw(" ")];
        for (key, action) in keybinds {
            spans.push(Span::styled(
                key,
                Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(" {} ", action)));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    trace!("render_help_overlay: called");
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )]),
        Line::from(""),
        key_line("type", "Edit the focused task"),
        key_line("Backspace", "Delete last character"),
        key_line("Ctrl-U", "Clear the focused task"),
        key_line("↑/↓ Tab", "Move between tasks"),
        key_line("Ctrl-N", "Add another task"),
        key_line("Ctrl-D", "Remove the focused task"),
        key_line("Enter", "Plan my day"),
        key_line("PgUp/PgDn", "Scroll the schedule"),
        key_line("Home/End", "Schedule top / bottom"),
        key_line("F1", "Toggle help"),
        key_line("Esc", "Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (F1 to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a key binding line
fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

/// Render empty state message
fn render_empty_message(frame: &mut Frame, area: Rect, message: &str) {
    trace!(%message, "render_empty_message: called");
    let inner = area.inner(Margin {
        horizontal: 2,
        vertical: 2,
    });

    let empty = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    frame.render_widget(empty, inner);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Height of the task editor pane: one row per entry, capped, plus borders
fn task_pane_height(entries: usize) -> u16 {
    u16::try_from(entries).unwrap_or(u16::MAX).min(12) + 2
}

/// Format duration for display (e.g., "45s", "1m 15s")
fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
