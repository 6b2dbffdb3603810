use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use vigil_tui::{Daemon, Height, NamedColor, Panel, PollLoop, Surface, text};

const HISTORY: usize = 30;
const LATE: Duration = Duration::from_millis(100);

/// How late each poll of the background loop ran. A quick read on whether
/// the machine is keeping up.
#[derive(Debug, Default)]
struct Beats {
    polls: u64,
    last: Option<Instant>,
    delays: VecDeque<Duration>,
}

impl Beats {
    fn record(&mut self, now: Instant, interval: Duration) {
        if let Some(last) = self.last {
            let delay = now.duration_since(last).saturating_sub(interval);

            if self.delays.len() == HISTORY {
                self.delays.pop_front();
            }
            self.delays.push_back(delay);
        }

        self.polls += 1;
        self.last = Some(now);
    }

    fn worst(&self) -> Duration {
        self.delays.iter().copied().max().unwrap_or_default()
    }
}

pub struct HeartbeatPanel {
    beats: Arc<Mutex<Beats>>,
    shown: u64,
    interval: Duration,
    daemon: Arc<PollLoop>,
}

impl HeartbeatPanel {
    pub fn new(interval: Duration) -> Self {
        let beats = Arc::new(Mutex::new(Beats::default()));

        let shared = Arc::clone(&beats);
        let poll = move || -> anyhow::Result<()> {
            shared.lock().record(Instant::now(), interval);
            Ok(())
        };

        Self {
            beats,
            shown: 0,
            interval,
            daemon: Arc::new(PollLoop::new("heartbeat", interval, poll)),
        }
    }
}

fn delay_markup(delay: Duration) -> String {
    let color = if delay > LATE {
        NamedColor::Red
    } else {
        NamedColor::Green
    };

    format!("<{0}>{1}</{0}>", color.name(), delay.as_millis())
}

impl Panel for HeartbeatPanel {
    fn name(&self) -> &str {
        "heartbeat"
    }

    fn height(&self) -> Height {
        Height::Fixed(4)
    }

    fn draw(&mut self, surface: &mut Surface) {
        let beats = self.beats.lock();
        self.shown = beats.polls;

        surface.write_markup(
            0,
            0,
            &format!(
                "<b>heartbeat</b> (every {}s, delays in ms)",
                self.interval.as_secs()
            ),
        );
        surface.write_markup(
            1,
            2,
            &format!(
                "polls: {}, worst delay: {}",
                beats.polls,
                delay_markup(beats.worst())
            ),
        );

        // newest first, as many as fit
        let recent: Vec<String> = beats
            .delays
            .iter()
            .rev()
            .map(|delay| delay.as_millis().to_string())
            .collect();
        let width = usize::from(surface.width().saturating_sub(3));
        surface.write_markup(2, 2, &text::join(&recent, " ", Some(width)));
    }

    fn needs_redraw(&self) -> bool {
        self.beats.lock().polls != self.shown
    }

    fn daemon(&self) -> Option<Arc<dyn Daemon>> {
        Some(self.daemon.clone())
    }
}
