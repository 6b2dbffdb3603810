mod panels;

use anyhow::{Context, Result};
use std::time::Duration;
use vigil_runtime::AppContext;
use vigil_tui::Panel;

use panels::{HeaderPanel, HeartbeatPanel, RelayPanel};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let context = AppContext::load(None).context("unable to load configuration")?;

    // the dashboard still works without a log file
    if let Err(e) = context.init_logging() {
        eprintln!("Warning: {}", e);
    }

    let cache = context.cache();
    panels::seed_relays(&cache).context("unable to seed the relay cache")?;

    let header: Box<dyn Panel> = Box::new(HeaderPanel::new());
    let overview: Vec<Box<dyn Panel>> = vec![
        Box::new(HeartbeatPanel::new(Duration::from_secs(1))),
        Box::new(RelayPanel::summary(cache.clone())),
    ];
    let relays: Vec<Box<dyn Panel>> = vec![Box::new(RelayPanel::listing(cache))];

    context.run(header, vec![overview, relays])?;
    Ok(())
}
