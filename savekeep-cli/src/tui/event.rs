use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, after};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// A notification's display time ran out
    ClearNotification(u64),
    /// Nothing happened within the tick rate
    Tick,
}

/// Event handler for terminal events and notification timers
pub struct EventHandler {
    tick_rate: Duration,
    timers: Vec<(u64, Receiver<Instant>)>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            timers: Vec::new(),
        }
    }

    /// Deliver `ClearNotification(id)` once `delay` has passed
    pub fn schedule_clear(&mut self, id: u64, delay: Duration) {
        self.timers.push((id, after(delay)));
    }

    fn fired_timer(&mut self) -> Option<u64> {
        let pos = self
            .timers
            .iter()
            .position(|(_, rx)| rx.try_recv().is_ok())?;
        Some(self.timers.remove(pos).0)
    }

    /// Poll for the next event
    pub fn next(&mut self) -> color_eyre::Result<AppEvent> {
        if let Some(id) = self.fired_timer() {
            return Ok(AppEvent::ClearNotification(id));
        }

        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Release/repeat events would double every keystroke on some platforms
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    Ok(AppEvent::Key(key))
                }
                CrosstermEvent::Resize(w, h) => Ok(AppEvent::Resize(w, h)),
                _ => Ok(AppEvent::Tick),
            }
        } else {
            Ok(AppEvent::Tick)
        }
    }
}
