use chrono::{DateTime, Local};
use vigil_tui::{Height, Panel, Surface};

/// Top two rows: name, clock and pause state, then the key bindings. The
/// interface shows its prompts over the second row.
pub struct HeaderPanel {
    shown: Option<i64>,
    paused: bool,
}

impl Default for HeaderPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderPanel {
    pub fn new() -> Self {
        Self {
            shown: None,
            paused: false,
        }
    }

    fn title(&self, now: DateTime<Local>) -> String {
        let mut title = format!("<b>vigil</b> - {}", now.format("%Y-%m-%d %H:%M:%S"));

        if self.paused {
            title.push_str(" <yellow>(paused)</yellow>");
        }

        title
    }
}

impl Panel for HeaderPanel {
    fn name(&self) -> &str {
        "header"
    }

    fn height(&self) -> Height {
        Height::Fixed(2)
    }

    fn draw(&mut self, surface: &mut Surface) {
        let now = Local::now();
        self.shown = Some(now.timestamp());

        surface.write_markup(0, 0, &self.title(now));
        surface.write_markup(
            1,
            0,
            "page: <b>left</b>/<b>right</b>, pause: <b>p</b>, quit: <b>q</b>",
        );
    }

    fn needs_redraw(&self) -> bool {
        self.shown != Some(Local::now().timestamp())
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_title_shows_pause() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut header = HeaderPanel::new();

        assert_eq!(header.title(now), "<b>vigil</b> - 2024-05-01 12:30:00");

        header.set_paused(true);
        assert!(header.title(now).ends_with("<yellow>(paused)</yellow>"));
    }

    #[test]
    fn test_needs_redraw_until_drawn() {
        let header = HeaderPanel::new();
        assert!(header.needs_redraw());
    }
}
