// SQLite cache for slow-changing lookups
// Persists to disk when it can, otherwise lives in memory

mod cache;
mod error;
mod records;
mod schema;

// Public API
pub use cache::{Cache, CacheWriter};
pub use error::{Error, Result};
pub use records::{DEFAULT_NICKNAME, RelayRecord, is_valid_fingerprint, is_valid_nickname};
pub use schema::SCHEMA_VERSION;
