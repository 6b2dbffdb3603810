use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use vigil_tui::{
    Canvas, Daemon, Height, Interface, InterfaceSettings, KeyCode, KeySource, Palette, Panel,
    PollLoop, Style, Surface,
};

/// Replays a fixed list of key presses, then keeps answering 'q'.
struct ScriptedKeys {
    script: VecDeque<Option<KeyCode>>,
}

impl ScriptedKeys {
    fn new(script: impl IntoIterator<Item = Option<KeyCode>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self, _timeout: Duration) -> io::Result<Option<KeyCode>> {
        Ok(self
            .script
            .pop_front()
            .unwrap_or(Some(KeyCode::Char('q'))))
    }
}

struct Label {
    name: &'static str,
    height: Height,
}

impl Panel for Label {
    fn name(&self) -> &str {
        self.name
    }

    fn height(&self) -> Height {
        self.height
    }

    fn draw(&mut self, surface: &mut Surface) {
        surface.write_text(0, 0, self.name, Style::default());
    }
}

/// Shows how many times its loop has polled.
struct Ticker {
    ticks: Arc<AtomicU64>,
    shown: u64,
    daemon: Arc<PollLoop>,
}

impl Ticker {
    fn new() -> Self {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);
        let poll = move || -> anyhow::Result<()> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };
        let daemon = PollLoop::new("ticker", Duration::from_millis(1), poll);

        Self {
            ticks,
            shown: 0,
            daemon: Arc::new(daemon),
        }
    }
}

impl Panel for Ticker {
    fn name(&self) -> &str {
        "ticker"
    }

    fn draw(&mut self, surface: &mut Surface) {
        self.shown = self.ticks.load(Ordering::SeqCst);
        surface.write_markup(0, 0, &format!("<b>ticks:</b> {}", self.shown));
    }

    fn needs_redraw(&self) -> bool {
        self.ticks.load(Ordering::SeqCst) != self.shown
    }

    fn daemon(&self) -> Option<Arc<dyn Daemon>> {
        Some(self.daemon.clone())
    }
}

fn label(name: &'static str, height: Height) -> Box<dyn Panel> {
    Box::new(Label { name, height })
}

fn settings() -> InterfaceSettings {
    InterfaceSettings {
        redraw_rate: Duration::from_millis(1),
        confirm_quit: true,
    }
}

fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;

    let lines: Vec<String> = (area.top()..area.bottom())
        .map(|y| {
            let line: String = (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect();

    lines.join("\n").trim_end().to_string()
}

#[test]
fn test_event_loop_pages_and_quits() {
    let pages = vec![
        vec![label("status", Height::Fixed(2)), label("events", Height::Fill)],
        vec![label("relays", Height::Fill)],
    ];

    let mut interface = Interface::new(
        Arc::new(Palette::new()),
        label("vigil", Height::Fixed(2)),
        pages,
        settings(),
    )
    .unwrap();

    let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
    let mut keys = ScriptedKeys::new([
        None,
        Some(KeyCode::Right),
        Some(KeyCode::Char('q')),
        Some(KeyCode::Char('q')),
    ]);

    interface.run(&mut terminal, &mut keys).unwrap();

    assert!(interface.is_quitting());
    assert_eq!(interface.page(), 1);
    assert_eq!(interface.visible_panels(), vec!["vigil", "relays"]);
    insta::assert_snapshot!("quit_prompt", screen(&terminal));
}

#[test]
fn test_event_loop_first_frame_stacks_panels() {
    let pages = vec![vec![
        label("status", Height::Fixed(2)),
        label("events", Height::Fill),
    ]];

    let mut interface = Interface::new(
        Arc::new(Palette::new()),
        label("vigil", Height::Fixed(1)),
        pages,
        settings(),
    )
    .unwrap();

    let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
    interface.present(&mut terminal).unwrap();

    insta::assert_snapshot!("first_frame", screen(&terminal));
}

#[test]
fn test_quit_prompt_can_be_dismissed() {
    let mut interface = Interface::new(
        Arc::new(Palette::new()),
        label("vigil", Height::Fixed(1)),
        vec![vec![label("status", Height::Fill)]],
        settings(),
    )
    .unwrap();

    let mut terminal = Terminal::new(TestBackend::new(40, 4)).unwrap();
    let mut keys = ScriptedKeys::new([
        Some(KeyCode::Char('q')),
        Some(KeyCode::Esc),
        None,
        Some(KeyCode::Char('q')),
        Some(KeyCode::Char('q')),
    ]);

    interface.run(&mut terminal, &mut keys).unwrap();

    assert!(interface.is_quitting());
    assert!(keys.script.is_empty());
}

#[test]
fn test_pause_and_halt_with_running_daemon() {
    let ticker = Ticker::new();
    let daemon = Arc::clone(&ticker.daemon);
    let ticker: Box<dyn Panel> = Box::new(ticker);

    let mut interface = Interface::new(
        Arc::new(Palette::new()),
        label("vigil", Height::Fixed(1)),
        vec![vec![ticker]],
        settings(),
    )
    .unwrap();

    let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
    let mut keys = ScriptedKeys::new([None, None, Some(KeyCode::Char('p'))]);

    interface.run(&mut terminal, &mut keys).unwrap();

    assert!(interface.is_paused());
    assert!(daemon.is_paused());
    assert!(screen(&terminal).contains("ticks:"));

    interface.halt().unwrap().join().unwrap();
    assert!(daemon.is_stopped());
}

fn single_page() -> Interface {
    Interface::new(
        Arc::new(Palette::new()),
        label("vigil", Height::Fixed(2)),
        vec![vec![label("status", Height::Fill)]],
        settings(),
    )
    .unwrap()
}

#[test]
fn test_input_prompt_accepts_edited_line() {
    let mut interface = single_page();
    let mut terminal = Terminal::new(TestBackend::new(30, 4)).unwrap();
    let mut keys = ScriptedKeys::new([
        None,
        Some(KeyCode::Backspace),
        Some(KeyCode::Char('1')),
        Some(KeyCode::Left),
        Some(KeyCode::Char('q')),
        Some(KeyCode::Enter),
    ]);

    let input = interface
        .input_prompt(&mut terminal, &mut keys, "Port: ", "9050")
        .unwrap();

    assert_eq!(input.as_deref(), Some("9051q"));
    assert!(keys.script.is_empty());
    assert!(!interface.is_quitting());
    assert_eq!(interface.page(), 0);
    assert_eq!(interface.notice(), None);

    interface.present(&mut terminal).unwrap();
    assert_eq!(screen(&terminal), "vigil\n\nstatus");
}

#[test]
fn test_input_prompt_cancel_returns_none() {
    let mut interface = single_page();
    let mut terminal = Terminal::new(TestBackend::new(30, 4)).unwrap();
    let mut keys = ScriptedKeys::new([Some(KeyCode::Char('x')), Some(KeyCode::Esc)]);

    let input = interface
        .input_prompt(&mut terminal, &mut keys, "Nickname: ", "")
        .unwrap();

    assert_eq!(input, None);
    assert_eq!(interface.notice(), None);
    assert!(!interface.is_quitting());
}

/// Types a fixed list of keys, noting the header's prompt row before each.
struct Typist {
    canvas: Canvas,
    keys: VecDeque<KeyCode>,
    seen: Vec<String>,
}

impl KeySource for Typist {
    fn next_key(&mut self, _timeout: Duration) -> io::Result<Option<KeyCode>> {
        self.seen.push(self.canvas.row_text(1).trim_end().to_string());
        Ok(Some(self.keys.pop_front().unwrap_or(KeyCode::Esc)))
    }
}

#[test]
fn test_input_prompt_shows_typed_text() {
    let mut interface = single_page();
    let mut terminal = Terminal::new(TestBackend::new(30, 4)).unwrap();
    let mut keys = Typist {
        canvas: interface.canvas().clone(),
        keys: VecDeque::from([KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Enter]),
        seen: Vec::new(),
    };

    let input = interface
        .input_prompt(&mut terminal, &mut keys, "Name: ", "")
        .unwrap();

    assert_eq!(input.as_deref(), Some("ab"));
    assert_eq!(keys.seen, vec!["Name:", "Name: a", "Name: ab"]);
}
