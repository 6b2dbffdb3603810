mod header;
mod heartbeat;
mod relays;

pub use header::HeaderPanel;
pub use heartbeat::HeartbeatPanel;
pub use relays::{RelayPanel, seed_relays};
