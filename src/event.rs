use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Nothing arrived before the timeout.
    Tick,
}

pub fn poll_event(timeout: Duration) -> color_eyre::Result<AppEvent> {
    if !event::poll(timeout)? {
        return Ok(AppEvent::Tick);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(AppEvent::Key(key)),
        Event::Resize(w, h) => Ok(AppEvent::Resize(w, h)),
        _ => Ok(AppEvent::Tick),
    }
}
