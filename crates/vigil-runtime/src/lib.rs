pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod session;

pub use config::{Config, resolve_workspace_path};
pub use context::AppContext;
pub use error::{Error, Result};
pub use session::TerminalSession;
