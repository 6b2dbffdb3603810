use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use vigil_cache::Cache;
use vigil_tui::{Interface, Palette, Panel, TerminalKeys, detect_color_support};

use crate::config::{Config, resolve_workspace_path};
use crate::session::TerminalSession;
use crate::{Result, logging};

const CONFIG_FILE: &str = "config.toml";
const CACHE_FILE: &str = "cache.sqlite";
const LOG_FILE: &str = "vigil.log";

/// Everything a dashboard shares: settings, the cache and the palette.
/// Built once at startup and handed to whatever needs it.
pub struct AppContext {
    workspace: PathBuf,
    config: Config,
    cache: Arc<Cache>,
    palette: Arc<Palette>,
}

impl AppContext {
    /// Loads config.toml from the workspace and opens the cache.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let workspace = resolve_workspace_path(explicit_path)?;
        let config = Config::load_from(&workspace.join(CONFIG_FILE))?;

        Self::new(workspace, config, detect_color_support())
    }

    pub fn new(workspace: PathBuf, config: Config, has_colors: bool) -> Result<Self> {
        let cache_path = config.data_path(CACHE_FILE);
        let cache = Cache::open(cache_path.as_deref())?;

        let mut palette = Palette::new();
        palette.initialize(has_colors);

        Ok(Self {
            workspace,
            config,
            cache: Arc::new(cache),
            palette: Arc::new(palette),
        })
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> Arc<Cache> {
        Arc::clone(&self.cache)
    }

    pub fn palette(&self) -> Arc<Palette> {
        Arc::clone(&self.palette)
    }

    /// Log file in the data directory, or the workspace if that's disabled.
    pub fn log_path(&self) -> PathBuf {
        self.config
            .data_path(LOG_FILE)
            .unwrap_or_else(|| self.workspace.join(LOG_FILE))
    }

    pub fn init_logging(&self) -> Result<()> {
        logging::init(&self.log_path(), &self.config.log_level)
    }

    pub fn interface(
        &self,
        header: Box<dyn Panel>,
        pages: Vec<Vec<Box<dyn Panel>>>,
    ) -> Result<Interface> {
        let interface = Interface::new(
            self.palette(),
            header,
            pages,
            self.config.interface_settings(),
        )?;
        Ok(interface)
    }

    /// Takes over the terminal and runs the dashboard until the user quits.
    /// Panel daemons are stopped before returning, even if the terminal
    /// couldn't be set up.
    pub fn run(&self, header: Box<dyn Panel>, pages: Vec<Vec<Box<dyn Panel>>>) -> Result<()> {
        let mut interface = self.interface(header, pages)?;

        let outcome = halt_after(&mut interface, |interface| {
            let mut session = TerminalSession::start()?;
            interface.run(session.terminal_mut(), &mut TerminalKeys)?;
            Ok(())
        });

        info!(persistent_cache = self.cache.is_persistent(), "dashboard closed");
        outcome
    }
}

/// Runs `body`, then halts the interface's daemons and waits for them
/// whether or not it succeeded.
fn halt_after<F>(interface: &mut Interface, body: F) -> Result<()>
where
    F: FnOnce(&mut Interface) -> Result<()>,
{
    let outcome = body(interface);

    match interface.halt() {
        Ok(halted) => {
            if halted.join().is_err() {
                warn!("halting panel daemons panicked");
            }
        }
        Err(err) => {
            warn!(error = %err, "unable to halt panel daemons");
            outcome?;
            return Err(err.into());
        }
    }

    outcome
}
