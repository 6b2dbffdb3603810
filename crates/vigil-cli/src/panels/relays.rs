use std::sync::Arc;
use tracing::warn;
use vigil_cache::{Cache, DEFAULT_NICKNAME};
use vigil_tui::{Height, KeyCode, Panel, Surface, highlight, text};

/// Directory authorities, so the demo has something to look up.
const KNOWN_RELAYS: &[(&str, &str, u16, &str)] = &[
    ("9695DFC35FFEB861329B9F1AB04C46397020CE31", "128.31.0.39", 9101, "moria1"),
    ("847B1F850344D7876491A54892F904934E4EB85D", "86.59.21.38", 443, "tor26"),
    ("7EA6EAD6FD83083C538F44038BBFA077587DD755", "45.66.33.45", 443, "dizum"),
    ("F2044413DAC2E02E3D6BCF4735A19BCA1DE97281", "131.188.40.189", 443, "gabelmoo"),
    ("BD6A829255CB08E66FBE7D3748363586E46B3810", "66.111.2.131", 9001, "Serge"),
];

/// Records the known relays in one write scope.
pub fn seed_relays(cache: &Cache) -> vigil_cache::Result<()> {
    let writer = cache.write()?;

    for &(fingerprint, address, or_port, nickname) in KNOWN_RELAYS {
        writer.record_relay(fingerprint, address, or_port, Some(nickname))?;
    }

    writer.commit()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Summary,
    Listing,
}

/// Cache contents, either as a short summary or one relay per row.
pub struct RelayPanel {
    cache: Arc<Cache>,
    view: View,
    selected: usize,
    dirty: bool,
}

impl RelayPanel {
    pub fn summary(cache: Arc<Cache>) -> Self {
        Self::new(cache, View::Summary)
    }

    pub fn listing(cache: Arc<Cache>) -> Self {
        Self::new(cache, View::Listing)
    }

    fn new(cache: Arc<Cache>, view: View) -> Self {
        Self {
            cache,
            view,
            selected: 0,
            dirty: false,
        }
    }

    fn draw_summary(&self, surface: &mut Surface) {
        let location = match self.cache.path() {
            Some(path) => {
                let size = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
                format!("{} ({})", path.display(), text::size_label(size))
            }
            None => "in memory".to_string(),
        };

        let count = match self.cache.relay_count() {
            Ok(count) => count.to_string(),
            Err(e) => {
                warn!("Unable to count cached relays: {}", e);
                "<red>unknown</red>".to_string()
            }
        };

        surface.write_markup(0, 0, "<b>cache</b>");
        surface.write_markup(1, 2, &format!("location: {}", location));
        surface.write_markup(2, 2, &format!("relays: {}", count));
    }

    fn draw_listing(&self, surface: &mut Surface) {
        surface.write_markup(0, 0, "<b>relays</b> (up/down to select)");

        for (index, (fingerprint, ..)) in KNOWN_RELAYS.iter().enumerate() {
            let Ok(row) = u16::try_from(index + 1) else {
                break;
            };

            let line = relay_line(&self.cache, fingerprint);
            if index == self.selected {
                let width = usize::from(surface.width());
                let padded = format!("{:width$}", line, width = width);
                surface.write_text(row, 0, &padded, highlight());
            } else {
                surface.write_text(row, 0, &line, Default::default());
            }
        }
    }
}

fn relay_line(cache: &Cache, fingerprint: &str) -> String {
    let nickname = cache.relay_nickname(fingerprint, Some(DEFAULT_NICKNAME));
    let address = cache.relay_address(fingerprint, None);

    match (nickname, address) {
        (Ok(nickname), Ok(address)) => {
            let nickname = nickname.unwrap_or_default();
            let address = address.map_or_else(|| "unknown".to_string(), |addr| addr.to_string());
            format!(" {:<19} {:<21} {}", nickname, address, fingerprint)
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("Unable to look up relay {}: {}", fingerprint, e);
            format!(" {} (lookup failed)", fingerprint)
        }
    }
}

impl Panel for RelayPanel {
    fn name(&self) -> &str {
        match self.view {
            View::Summary => "cache",
            View::Listing => "relays",
        }
    }

    fn height(&self) -> Height {
        match self.view {
            View::Summary => Height::Fixed(3),
            View::Listing => Height::Fill,
        }
    }

    fn draw(&mut self, surface: &mut Surface) {
        self.dirty = false;

        match self.view {
            View::Summary => self.draw_summary(surface),
            View::Listing => self.draw_listing(surface),
        }
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        if self.view != View::Listing {
            return false;
        }

        let last = KNOWN_RELAYS.len().saturating_sub(1);
        let selected = match key {
            KeyCode::Up => self.selected.saturating_sub(1),
            KeyCode::Down => (self.selected + 1).min(last),
            _ => return false,
        };

        self.dirty |= selected != self.selected;
        self.selected = selected;
        true
    }
}
