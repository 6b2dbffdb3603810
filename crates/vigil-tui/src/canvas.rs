use parking_lot::Mutex;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::sync::Arc;

/// The whole screen as a grid of styled cells. Regions flush into it and the
/// interface copies it into each terminal frame.
#[derive(Debug, Clone)]
pub struct Canvas {
    grid: Arc<Mutex<Buffer>>,
}

impl Canvas {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            grid: Arc::new(Mutex::new(Buffer::empty(Rect::new(0, 0, cols, rows)))),
        }
    }

    pub fn rows(&self) -> u16 {
        self.grid.lock().area.height
    }

    pub fn cols(&self) -> u16 {
        self.grid.lock().area.width
    }

    /// Follows a terminal size change, blanking the grid. Returns false if
    /// the size didn't change.
    pub fn resize(&self, rows: u16, cols: u16) -> bool {
        let mut grid = self.grid.lock();
        let area = Rect::new(0, 0, cols, rows);

        if grid.area == area {
            return false;
        }

        grid.resize(area);
        grid.reset();
        true
    }

    pub fn clear(&self) {
        self.grid.lock().reset();
    }

    /// Creates a region for rows `top..top + height`. A region can't start
    /// below the last row, so `top` is clamped and callers compare
    /// [`Region::actual_top`] with what they asked for.
    pub fn subregion(&self, top: u16, height: u16, width: u16) -> Region {
        let (rows, cols) = {
            let grid = self.grid.lock();
            (grid.area.height, grid.area.width)
        };

        let top = top.min(rows.saturating_sub(1));
        let width = width.min(cols);

        Region {
            grid: Arc::clone(&self.grid),
            top,
            cells: Buffer::empty(Rect::new(0, 0, width, height)),
        }
    }

    /// Copies the grid into a frame buffer, clipped to the area both share.
    pub fn render_into(&self, target: &mut Buffer) {
        let grid = self.grid.lock();
        let area = grid.area.intersection(target.area);

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let cell = grid.content[grid.index_of(x, y)].clone();
                let index = target.index_of(x, y);
                target.content[index] = cell;
            }
        }
    }

    /// Text of a row, one symbol per column.
    pub fn row_text(&self, row: u16) -> String {
        let grid = self.grid.lock();
        if row >= grid.area.height {
            return String::new();
        }

        (0..grid.area.width)
            .map(|x| grid.content[grid.index_of(x, row)].symbol())
            .collect()
    }

    pub fn style_at(&self, row: u16, col: u16) -> Option<Style> {
        let grid = self.grid.lock();
        if row >= grid.area.height || col >= grid.area.width {
            return None;
        }

        Some(grid.content[grid.index_of(col, row)].style())
    }
}

/// A rectangular piece of the canvas with its own cell buffer. Writes land
/// in the buffer and only reach the canvas on [`Region::flush`].
#[derive(Debug)]
pub struct Region {
    grid: Arc<Mutex<Buffer>>,
    top: u16,
    cells: Buffer,
}

impl Region {
    /// Row of the canvas this region actually starts on.
    pub fn actual_top(&self) -> u16 {
        self.top
    }

    pub fn height(&self) -> u16 {
        self.cells.area.height
    }

    pub fn width(&self) -> u16 {
        self.cells.area.width
    }

    /// Writes text at a region-relative position. Anything past the right
    /// edge is dropped; positions outside the region are ignored.
    pub fn put(&mut self, row: u16, col: u16, text: &str, style: Style) {
        if row >= self.height() || col >= self.width() {
            return;
        }

        let max_width = usize::from(self.width() - col);
        self.cells.set_stringn(col, row, text, max_width, style);
    }

    pub fn erase(&mut self) {
        self.cells.reset();
    }

    /// Copies the first `rows` rows onto the canvas, clipped to its current
    /// size.
    pub fn flush(&self, rows: u16) {
        let mut grid = self.grid.lock();
        let bounds = grid.area;
        let rows = rows.min(self.height());

        for y in 0..rows {
            let Some(canvas_y) = self.top.checked_add(y).filter(|y| *y < bounds.bottom()) else {
                break;
            };

            for x in 0..self.width().min(bounds.width) {
                let cell = self.cells.content[self.cells.index_of(x, y)].clone();
                let index = grid.index_of(x, canvas_y);
                grid.content[index] = cell;
            }
        }
    }
}
