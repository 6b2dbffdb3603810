use ratatui::style::{Color, Modifier, Style};
use tracing::debug;

use crate::markup::TagTable;

/// Text colors the dashboard can ask for by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    Magenta,
    Black,
    White,
}

impl NamedColor {
    pub const ALL: [NamedColor; 8] = [
        NamedColor::Red,
        NamedColor::Green,
        NamedColor::Yellow,
        NamedColor::Blue,
        NamedColor::Cyan,
        NamedColor::Magenta,
        NamedColor::Black,
        NamedColor::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Red => "red",
            NamedColor::Green => "green",
            NamedColor::Yellow => "yellow",
            NamedColor::Blue => "blue",
            NamedColor::Cyan => "cyan",
            NamedColor::Magenta => "magenta",
            NamedColor::Black => "black",
            NamedColor::White => "white",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.name() == name)
    }

    fn terminal_color(self) -> Color {
        match self {
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Cyan => Color::Cyan,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Black => Color::Black,
            NamedColor::White => Color::White,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

pub fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn underline() -> Style {
    Style::default().add_modifier(Modifier::UNDERLINED)
}

pub fn highlight() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Whether the terminal claims at least the eight basic colors.
pub fn detect_color_support() -> bool {
    crossterm::style::available_color_count() >= 8
}

/// Maps color names to display styles and holds the markup tags built from
/// them. Until [`Palette::initialize`] runs every color is the neutral style.
#[derive(Debug, Clone)]
pub struct Palette {
    initialized: bool,
    colors: [Style; 8],
    tags: TagTable,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    pub fn new() -> Self {
        let colors = [Style::default(); 8];

        Self {
            initialized: false,
            tags: TagTable::compile(&colors),
            colors,
        }
    }

    /// Sets up color mappings. Only the first call has any effect. Colors
    /// only set a foreground so the terminal's own background shows through.
    pub fn initialize(&mut self, has_colors: bool) {
        if self.initialized {
            return;
        }

        self.initialized = true;

        if has_colors {
            for color in NamedColor::ALL {
                self.colors[color.index()] = Style::default().fg(color.terminal_color());
            }
        }

        self.tags = TagTable::compile(&self.colors);
        debug!(has_colors, "palette initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn color(&self, color: NamedColor) -> Style {
        self.colors[color.index()]
    }

    pub fn lookup(&self, name: &str) -> Option<Style> {
        NamedColor::from_name(name).map(|color| self.color(color))
    }

    pub(crate) fn tags(&self) -> &TagTable {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_colors_are_neutral() {
        let palette = Palette::new();

        assert!(!palette.is_initialized());
        for color in NamedColor::ALL {
            assert_eq!(palette.color(color), Style::default());
        }
    }

    #[test]
    fn test_initialize_with_colors() {
        let mut palette = Palette::new();
        palette.initialize(true);

        assert_eq!(palette.color(NamedColor::Red), Style::default().fg(Color::Red));
        assert_eq!(palette.lookup("cyan"), Some(Style::default().fg(Color::Cyan)));
        assert_eq!(palette.color(NamedColor::Blue).bg, None);
    }

    #[test]
    fn test_initialize_without_colors_stays_neutral() {
        let mut palette = Palette::new();
        palette.initialize(false);

        assert!(palette.is_initialized());
        assert_eq!(palette.lookup("green"), Some(Style::default()));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut palette = Palette::new();
        palette.initialize(false);
        palette.initialize(true);

        assert_eq!(palette.color(NamedColor::Yellow), Style::default());
    }

    #[test]
    fn test_unknown_color_name() {
        let palette = Palette::new();
        assert_eq!(palette.lookup("purple"), None);
    }
}
