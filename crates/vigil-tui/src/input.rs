use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;

/// Where the event loop gets key presses from.
pub trait KeySource {
    /// Waits up to `timeout` for a key. `Ok(None)` means nothing arrived,
    /// including a wakeup for some other terminal event.
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyCode>>;
}

/// Key presses from the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyCode>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            // releases and repeats are reported on some platforms
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key.code)),
            // resizes are picked up by the next frame
            _ => Ok(None),
        }
    }
}
