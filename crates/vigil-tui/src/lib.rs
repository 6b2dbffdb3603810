// NOTE: vigil-tui Architecture
//
// Canvas
// - Panels draw into a private canvas, never straight into ratatui frames
// - Unchanged panels keep their cells between redraw passes
// - The canvas is copied into the frame once per pass
//
// Surfaces
// - A region belongs to one position and height; moving or growing replaces it
// - Shrinking keeps the region and clips writes to the laid-out height
// - Displaced surfaces never erase or flush
//
// Threads
// - Only the render thread touches the canvas
// - Background loops update panel state; the next redraw pass picks it up

mod canvas;
mod daemon;
mod error;
mod input;
mod interface;
mod markup;
mod palette;
mod panel;
mod surface;
pub mod text;

// Public API
pub use canvas::{Canvas, Region};
pub use daemon::{Daemon, Poll, PollLoop};
pub use error::{Error, Result};
pub use input::{KeySource, TerminalKeys};
pub use interface::{Interface, InterfaceSettings, QUIT_CONFIRM_WAIT};
pub use markup::{Segment, Segments, TagTable};
pub use palette::{NamedColor, Palette, bold, detect_color_support, highlight, underline};
pub use panel::Panel;
pub use surface::{Height, Surface};

// Re-exported so panels don't need their own crossterm/ratatui versions
pub use crossterm::event::KeyCode;
pub use ratatui::style::{Color, Modifier, Style};
