use crossterm::event::KeyCode;
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::canvas::Canvas;
use crate::daemon::Daemon;
use crate::error::{Error, Result};
use crate::input::KeySource;
use crate::palette::{self, Palette};
use crate::panel::Panel;
use crate::surface::Surface;

/// How long a quit waits for its confirming key press.
pub const QUIT_CONFIRM_WAIT: Duration = Duration::from_secs(30);

const QUIT_PROMPT: &str = "Are you sure (q again to confirm)?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSettings {
    /// Longest the event loop waits between redraws.
    pub redraw_rate: Duration,
    /// Ask for a second 'q' before quitting.
    pub confirm_quit: bool,
}

impl Default for InterfaceSettings {
    fn default() -> Self {
        Self {
            redraw_rate: Duration::from_secs(5),
            confirm_quit: true,
        }
    }
}

struct Slot {
    panel: Box<dyn Panel>,
    surface: Surface,
    visible: bool,
}

impl Slot {
    fn new(panel: Box<dyn Panel>, palette: &Arc<Palette>) -> Self {
        let surface = Surface::new(panel.height(), Arc::clone(palette));

        Self {
            panel,
            surface,
            visible: false,
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.panel.set_visible(visible);
        }
    }

    /// Lays the panel out at `top` and draws it if needed. Returns the rows
    /// it took, zero if it starts below the screen.
    fn draw(&mut self, canvas: &Canvas, top: u16, force: bool) -> u16 {
        if top > canvas.rows() {
            return 0;
        }

        let replaced = self.surface.layout(canvas, top, self.panel.max_width());

        if replaced || force || self.panel.needs_redraw() {
            self.surface.clear();
            self.panel.draw(&mut self.surface);
            self.surface.refresh();
        }

        self.surface.height()
    }
}

#[derive(Debug)]
struct Notice {
    message: String,
    /// None while reading input; such a notice lasts until the input ends.
    expires: Option<Instant>,
}

/// Top level controller: an always visible header above one page of panels
/// at a time, with paging, pausing and quitting driven by key presses.
pub struct Interface {
    canvas: Canvas,
    palette: Arc<Palette>,
    header: Slot,
    pages: Vec<Vec<Slot>>,
    page: usize,
    paused: bool,
    quit: bool,
    force_redraw: bool,
    notice: Option<Notice>,
    confirming_quit: bool,
    settings: InterfaceSettings,
}

impl Interface {
    /// Builds the interface and starts every panel's daemon. Empty pages are
    /// dropped.
    pub fn new(
        palette: Arc<Palette>,
        header: Box<dyn Panel>,
        pages: Vec<Vec<Box<dyn Panel>>>,
        settings: InterfaceSettings,
    ) -> Result<Self> {
        let header = Slot::new(header, &palette);
        let pages: Vec<Vec<Slot>> = pages
            .into_iter()
            .filter(|page| !page.is_empty())
            .map(|page| {
                page.into_iter()
                    .map(|panel| Slot::new(panel, &palette))
                    .collect()
            })
            .collect();

        let mut interface = Self {
            canvas: Canvas::new(0, 0),
            palette,
            header,
            pages,
            page: 0,
            paused: false,
            quit: false,
            force_redraw: true,
            notice: None,
            confirming_quit: false,
            settings,
        };

        interface.update_visibility();

        for daemon in interface.daemons() {
            daemon.start()?;
        }

        info!(pages = interface.page_count(), "interface ready");
        Ok(interface)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn settings(&self) -> &InterfaceSettings {
        &self.settings
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Switches to another page, failing without change if it doesn't
    /// exist.
    pub fn set_page(&mut self, page: usize) -> Result<()> {
        let count = self.page_count();
        if page >= count {
            return Err(Error::InvalidPage { page, count });
        }

        if page != self.page {
            self.page = page;

            // panels of the old page are still on the canvas
            self.canvas.clear();
            self.header.draw(&self.canvas, 0, true);
            self.update_visibility();
            self.force_redraw = true;

            debug!(page, "page changed");
        }

        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pauses or resumes every panel, redrawing the current page.
    pub fn set_paused(&mut self, paused: bool) {
        if paused == self.paused {
            return;
        }

        self.paused = paused;
        for slot in self.slots_mut() {
            slot.panel.set_paused(paused);
        }

        debug!(paused, "pause toggled");
        self.redraw(true);
    }

    /// Draws the header and then the current page, stacking each panel
    /// directly below the previous one. Panels with nothing new are skipped
    /// unless `force` is set.
    pub fn redraw(&mut self, force: bool) {
        let force = force || std::mem::take(&mut self.force_redraw);
        let notice = self.notice.as_ref().map(|notice| notice.message.as_str());

        let mut top = self.header.draw(&self.canvas, 0, force || notice.is_some());

        if let Some(message) = notice {
            let surface = &mut self.header.surface;
            let row = surface.height().saturating_sub(1);
            let line = format!("{:width$}", message, width = usize::from(surface.width()));

            surface.write_text(row, 0, &line, palette::bold());
            surface.refresh();
        }

        if let Some(page) = self.pages.get_mut(self.page) {
            for slot in page {
                top = top.saturating_add(slot.draw(&self.canvas, top, force));
            }
        }
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }

    pub fn is_quitting(&self) -> bool {
        self.quit
    }

    /// Stops every panel daemon on a separate thread: all are told to stop
    /// before any is joined. Returns without waiting.
    pub fn halt(&self) -> Result<JoinHandle<()>> {
        let daemons: Vec<Arc<dyn Daemon>> = self.daemons().collect();

        let handle = std::thread::Builder::new()
            .name("panel-halt".to_string())
            .spawn(move || {
                for daemon in &daemons {
                    daemon.stop();
                }

                for daemon in &daemons {
                    daemon.join();
                }

                debug!(count = daemons.len(), "panel daemons halted");
            })?;

        Ok(handle)
    }

    /// Shows a message on the header's last row until a key is pressed or
    /// `wait` passes.
    pub fn prompt(&mut self, message: impl Into<String>, wait: Duration) {
        self.notice = Some(Notice {
            message: message.into(),
            expires: Some(Instant::now() + wait),
        });
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|notice| notice.message.as_str())
    }

    /// Names of the header and current page's panels, top to bottom.
    pub fn visible_panels(&self) -> Vec<&str> {
        std::iter::once(&self.header)
            .chain(self.pages.iter().flatten())
            .filter(|slot| slot.visible)
            .map(|slot| slot.panel.name())
            .collect()
    }

    /// Acts on a key press. Arrows page, 'p' pauses, 'q' quits. Anything
    /// else is offered to the visible panels in order until one takes it.
    pub fn handle_key(&mut self, key: KeyCode) {
        if self.notice.take().is_some() {
            // the prompt is gone either way, force the header to redraw
            self.force_redraw = true;
        }

        if std::mem::take(&mut self.confirming_quit) {
            if matches!(key, KeyCode::Char('q' | 'Q')) {
                self.quit();
            }
            return;
        }

        let count = self.page_count();
        match key {
            KeyCode::Right | KeyCode::Left if count > 0 => {
                let page = if key == KeyCode::Right {
                    (self.page + 1) % count
                } else {
                    (self.page + count - 1) % count
                };

                if let Err(err) = self.set_page(page) {
                    warn!(error = %err, "page change failed");
                }
            }
            KeyCode::Char('p' | 'P') => self.set_paused(!self.paused),
            KeyCode::Char('q' | 'Q') => {
                if self.settings.confirm_quit {
                    self.confirming_quit = true;
                    self.prompt(QUIT_PROMPT, QUIT_CONFIRM_WAIT);
                } else {
                    self.quit();
                }
            }
            _ => {
                let page = self.pages.get_mut(self.page).into_iter().flatten();
                for slot in std::iter::once(&mut self.header).chain(page) {
                    if slot.panel.handle_key(key) {
                        break;
                    }
                }
            }
        }
    }

    /// Runs until quit: redraw, show, then wait for a key or the next tick.
    pub fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        keys: &mut dyn KeySource,
    ) -> Result<()> {
        while !self.quit {
            self.expire_notice(Instant::now());
            self.present(terminal)?;

            let timeout = self.next_timeout(Instant::now());
            if let Some(key) = keys.next_key(timeout)? {
                self.handle_key(key);
            }
        }

        info!("interface quit");
        Ok(())
    }

    /// Reads a line of input on the header's last row, after `message` and
    /// starting from `initial`. Enter accepts the line, Esc cancels with
    /// `None`. Panels keep redrawing while the user types.
    pub fn input_prompt<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        keys: &mut dyn KeySource,
        message: &str,
        initial: &str,
    ) -> Result<Option<String>> {
        let mut input = initial.to_string();
        self.confirming_quit = false;

        let accepted = loop {
            self.notice = Some(Notice {
                message: format!("{message}{input}"),
                expires: None,
            });
            self.present(terminal)?;

            let Some(key) = keys.next_key(self.settings.redraw_rate)? else {
                continue;
            };

            match key {
                KeyCode::Enter => break true,
                KeyCode::Esc => break false,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
        };

        self.notice = None;
        self.force_redraw = true;

        debug!(accepted, "input prompt closed");
        Ok(accepted.then_some(input))
    }

    /// Redraws into the canvas and copies it into the terminal's next frame.
    pub fn present<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();

            // a new size means a blank canvas
            let resized = self.canvas.resize(area.height, area.width);
            self.redraw(resized);
            self.canvas.render_into(frame.buffer_mut());
        })?;

        Ok(())
    }

    fn next_timeout(&self, now: Instant) -> Duration {
        match self.notice.as_ref().and_then(|notice| notice.expires) {
            Some(expires) => expires
                .saturating_duration_since(now)
                .min(self.settings.redraw_rate),
            None => self.settings.redraw_rate,
        }
    }

    fn expire_notice(&mut self, now: Instant) {
        let expired = self
            .notice
            .as_ref()
            .and_then(|notice| notice.expires)
            .is_some_and(|expires| expires <= now);

        if expired {
            self.notice = None;
            self.confirming_quit = false;
            self.force_redraw = true;
        }
    }

    fn update_visibility(&mut self) {
        self.header.set_visible(true);

        let current = self.page;
        for (index, page) in self.pages.iter_mut().enumerate() {
            for slot in page {
                slot.set_visible(index == current);
            }
        }
    }

    fn daemons(&self) -> impl Iterator<Item = Arc<dyn Daemon>> + '_ {
        std::iter::once(&self.header)
            .chain(self.pages.iter().flatten())
            .filter_map(|slot| slot.panel.daemon())
    }

    fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        std::iter::once(&mut self.header).chain(self.pages.iter_mut().flatten())
    }
}
