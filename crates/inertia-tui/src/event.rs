use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};
use uuid::Uuid;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

/// Result of an async inquiry submission
pub enum InquiryResult {
    /// Inquiry was written to the outbox
    Success { id: Uuid },
    /// Writing the inquiry failed
    Failure { error: String },
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event, waiting at most one tick
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.next_within(self.tick_rate)
    }

    /// Poll for the next event with an explicit timeout
    ///
    /// The run loop shortens the wait while an animation frame is pending.
    pub fn next_within(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if !event::poll(timeout)? {
            return Ok(Some(AppEvent::Tick));
        }

        let event = match event::read()? {
            // Only handle key press events, ignore release events
            // (crossterm 0.27+ sends release events on some systems)
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => Some(AppEvent::Wheel {
                    column: mouse.column,
                    row: mouse.row,
                    down: true,
                }),
                MouseEventKind::ScrollUp => Some(AppEvent::Wheel {
                    column: mouse.column,
                    row: mouse.row,
                    down: false,
                }),
                _ => None,
            },
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        };
        Ok(event)
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// One wheel notch at a terminal cell
    Wheel { column: u16, row: u16, down: bool },
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}
