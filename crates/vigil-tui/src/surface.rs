use ratatui::style::Style;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

use crate::canvas::{Canvas, Region};
use crate::palette::Palette;
use crate::text::truncate_width;

/// How many rows a surface would like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Height {
    Fixed(u16),
    /// Everything below the surface's top.
    Fill,
}

/// Bounds-checked region of the screen that a panel draws into.
///
/// The surface owns its [`Region`] and replaces it whenever it has to move or
/// grow. When a region can't be placed where it was asked to be, the surface
/// is *displaced*: it keeps the region but refuses to erase, write or flush,
/// since doing so would land on another surface's rows.
#[derive(Debug)]
pub struct Surface {
    palette: Arc<Palette>,
    region: Option<Region>,
    preferred: Height,
    top: u16,
    height: u16,
    bounds: Option<(u16, u16)>,
    displaced: bool,
}

impl Surface {
    pub fn new(preferred: Height, palette: Arc<Palette>) -> Self {
        Self {
            palette,
            region: None,
            preferred,
            top: 0,
            height: 0,
            bounds: None,
            displaced: false,
        }
    }

    pub fn preferred_height(&self) -> Height {
        self.preferred
    }

    /// Row this surface was last laid out at.
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Rows this surface occupies in the stack.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Usable columns, zero before the first layout.
    pub fn width(&self) -> u16 {
        self.bounds.map_or(0, |(_, width)| width)
    }

    pub fn is_displaced(&self) -> bool {
        self.displaced
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Positions the surface at `desired_top`, optionally no wider than
    /// `max_width`. A new region is created if there is none yet, the surface
    /// moved, it has room to grow, it was displaced, or its width changed.
    ///
    /// Returns true if the region was replaced, false if it was kept or
    /// `desired_top` is below the canvas (in which case nothing changes).
    pub fn layout(&mut self, canvas: &Canvas, desired_top: u16, max_width: Option<u16>) -> bool {
        let rows = canvas.rows();

        if desired_top > rows {
            return false;
        }

        let mut height = rows - desired_top;
        if let Height::Fixed(preferred) = self.preferred {
            height = height.min(preferred);
        }

        let cols = canvas.cols();
        let width = max_width.map_or(cols, |max_width| max_width.min(cols));
        self.height = height;

        let keep = match &self.region {
            Some(region) => {
                self.top == desired_top
                    && height <= region.height()
                    && !self.displaced
                    && width == region.width()
            }
            None => false,
        };

        if keep {
            self.reset_bounds();
            return false;
        }

        // a region past the last row is still better than no region at all
        let region = canvas.subregion(desired_top, height, width);
        self.displaced = region.actual_top() < desired_top;
        self.top = desired_top;
        self.region = Some(region);
        self.reset_bounds();
        true
    }

    /// Erases the surface's content, unless it's been displaced.
    pub fn clear(&mut self) {
        if let Some(region) = &mut self.region {
            self.displaced = self.top > region.actual_top();

            if !self.displaced {
                region.erase();
            }
        }

        self.reset_bounds();
    }

    /// Pushes what has been drawn onto the canvas.
    pub fn refresh(&self) {
        if let Some(region) = &self.region
            && !self.displaced
        {
            region.flush(self.height);
        }
    }

    /// Writes text if it fits. Text is clipped by display width, one column
    /// short of the right edge; positions outside the surface are silently ignored.
    pub fn write_text(&mut self, row: u16, col: u16, text: &str, style: Style) {
        let Some((height, width)) = self.writable_bounds() else {
            return;
        };

        if row >= height || col >= width {
            return;
        }

        let max_width = usize::from(width - col - 1);
        if let Some(region) = &mut self.region {
            region.put(row, col, truncate_width(text, max_width), style);
        }
    }

    /// Writes text that may contain formatting tags (see [`crate::TagTable`]).
    /// Tags take no columns. Writing stops at the right edge.
    pub fn write_markup(&mut self, row: u16, col: u16, text: &str) {
        let Some((height, width)) = self.writable_bounds() else {
            return;
        };

        let Some(region) = &mut self.region else {
            return;
        };

        if row >= height {
            return;
        }

        let width = usize::from(width);
        let mut col = usize::from(col);

        for segment in self.palette.tags().segments(text) {
            if col >= width {
                break;
            }

            let clipped = truncate_width(segment.text, width - col - 1);
            // col < width, which is a u16
            region.put(row, col as u16, clipped, segment.style);
            col += segment.text.width();
        }
    }

    fn writable_bounds(&self) -> Option<(u16, u16)> {
        if self.displaced { None } else { self.bounds }
    }

    fn reset_bounds(&mut self) {
        self.bounds = self
            .region
            .as_ref()
            .map(|region| (region.height().min(self.height), region.width()));
    }
}
