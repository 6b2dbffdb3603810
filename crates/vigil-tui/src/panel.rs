use crossterm::event::KeyCode;
use std::sync::Arc;

use crate::daemon::Daemon;
use crate::surface::{Height, Surface};

/// One view of the dashboard. The interface gives each panel a [`Surface`]
/// and stacks them top to bottom.
pub trait Panel: Send {
    fn name(&self) -> &str;

    /// Rows the panel would like.
    fn height(&self) -> Height {
        Height::Fill
    }

    fn max_width(&self) -> Option<u16> {
        None
    }

    /// Renders into a freshly cleared surface.
    fn draw(&mut self, surface: &mut Surface);

    /// True when content changed since the last draw. Panels that return
    /// false are only drawn when forced or when their surface is replaced.
    fn needs_redraw(&self) -> bool {
        false
    }

    /// Offers a key press. Returns true if the panel consumed it.
    fn handle_key(&mut self, _key: KeyCode) -> bool {
        false
    }

    fn set_visible(&mut self, _visible: bool) {}

    /// Default suspends or resumes the panel's daemon.
    fn set_paused(&mut self, paused: bool) {
        if let Some(daemon) = self.daemon() {
            if paused {
                daemon.pause();
            } else {
                daemon.resume();
            }
        }
    }

    /// Background loop feeding this panel, if it has one.
    fn daemon(&self) -> Option<Arc<dyn Daemon>> {
        None
    }
}
