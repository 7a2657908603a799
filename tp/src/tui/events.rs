//! Terminal input for the TUI
//!
//! crossterm is polled on a plain thread and forwarded over a tokio channel.
//! Ticks keep their cadence while input is streaming in.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Terminal events the runner cares about
#[derive(Debug)]
pub enum Event {
    /// Key press or repeat
    Key(KeyEvent),
    /// Bracketed paste; may span several lines
    Paste(String),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick interval elapsed
    Tick,
}

/// Receives terminal events from the polling thread
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    /// Start polling with the given tick interval
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        thread::spawn(move || {
            debug!(?tick_rate, "EventHandler: polling thread started");
            let mut last_tick = Instant::now();
            while !thread_stop.load(Ordering::Relaxed) {
                let timeout = until_next_tick(last_tick.elapsed(), tick_rate);
                let event = match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        Ok(event::Event::Key(key)) => Some(Event::Key(key)),
                        Ok(event::Event::Paste(text)) => Some(Event::Paste(text)),
                        Ok(event::Event::Resize(w, h)) => Some(Event::Resize(w, h)),
                        Ok(_) => None,
                        Err(e) => {
                            warn!(error = %e, "EventHandler: read failed");
                            None
                        }
                    },
                    Ok(false) => None,
                    Err(e) => {
                        warn!(error = %e, "EventHandler: poll failed, stopping");
                        break;
                    }
                };

                if let Some(event) = event
                    && tx.send(event).is_err()
                {
                    break;
                }

                if until_next_tick(last_tick.elapsed(), tick_rate).is_zero() {
                    last_tick = Instant::now();
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                }
            }
            debug!("EventHandler: polling thread exiting");
        });

        Self { rx, stop }
    }

    /// Wait for the next event
    pub async fn next(&mut self) -> Result<Event> {
        self.rx.recv().await.ok_or_else(|| eyre::eyre!("Event channel closed"))
    }
}

/// Time left before the next tick is due
fn until_next_tick(since_last: Duration, tick_rate: Duration) -> Duration {
    tick_rate.saturating_sub(since_last)
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_due_despite_steady_input() {
        let rate = Duration::from_millis(100);
        assert_eq!(until_next_tick(Duration::ZERO, rate), rate);
        assert_eq!(until_next_tick(Duration::from_millis(60), rate), Duration::from_millis(40));

        // A burst of key repeats that outlasts the interval leaves no wait
        assert!(until_next_tick(Duration::from_millis(100), rate).is_zero());
        assert!(until_next_tick(Duration::from_secs(3), rate).is_zero());
    }
}
