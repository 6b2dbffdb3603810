use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::Result;

static SIGNAL_HANDLER: AtomicBool = AtomicBool::new(false);

/// Puts the terminal into raw mode on the alternate screen for as long as
/// it lives, and puts it back when dropped or on Ctrl-C.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn start() -> Result<Self> {
        install_signal_handler()?;

        enable_raw_mode()?;
        let unwind = Unwind::new(leave_screen);

        execute!(io::stdout(), EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        unwind.disarm();
        debug!("terminal session started");
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = restore(&mut self.terminal) {
            warn!(error = %err, "unable to restore the terminal");
        }
    }
}

fn restore(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    debug!("terminal restored");
    Ok(())
}

/// Best effort undo of raw mode and the alternate screen, for when there's no
/// terminal handle to restore through.
fn leave_screen() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Runs its callback on drop unless disarmed first.
struct Unwind<F: FnOnce()> {
    callback: Option<F>,
}

impl<F: FnOnce()> Unwind<F> {
    fn new(callback: F) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    fn disarm(mut self) {
        self.callback = None;
    }
}

impl<F: FnOnce()> Drop for Unwind<F> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback();
        }
    }
}

fn install_signal_handler() -> Result<()> {
    if SIGNAL_HANDLER.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    ctrlc::set_handler(|| {
        leave_screen();
        std::process::exit(0);
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_unwind_runs_when_setup_bails() {
        let undone = Cell::new(false);

        let setup = || -> io::Result<()> {
            let _unwind = Unwind::new(|| undone.set(true));
            Err(io::Error::other("no terminal"))
        };

        assert!(setup().is_err());
        assert!(undone.get());
    }

    #[test]
    fn test_disarmed_unwind_does_nothing() {
        let undone = Cell::new(false);

        let unwind = Unwind::new(|| undone.set(true));
        unwind.disarm();

        assert!(!undone.get());
    }
}
