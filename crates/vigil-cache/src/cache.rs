use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::cell::RefCell;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::records::RelayRecord;
use crate::schema::{self, SCHEMA_VERSION};
use crate::{Error, Result};

/// Cache for frequently needed, slow-changing information. Persists to disk
/// when it can and otherwise holds the same schema in memory.
///
/// Every statement goes through one re-entrant lock around a single
/// connection, so a thread holding a [`CacheWriter`] can still read.
pub struct Cache {
    conn: ReentrantMutex<RefCell<Connection>>,
    path: Option<PathBuf>,
}

impl Cache {
    /// Opens the cache at `path`. Stores with a missing or outdated schema are
    /// deleted and rebuilt. If the location can't be used, or no path is given,
    /// this falls back to an in-memory store.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => match open_persistent(path) {
                Ok(conn) => return Ok(Self::with_connection(conn, Some(path.to_path_buf()))),
                Err(err) => warn!(
                    "Unable to open a cache at {} ({}). Using an in-memory cache instead.",
                    path.display(),
                    err
                ),
            },
            None => info!("Unable to cache to disk. Using an in-memory cache instead."),
        }

        Self::in_memory()
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::create_schema(&conn)?;
        Ok(Self::with_connection(conn, None))
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Self {
        Self {
            conn: ReentrantMutex::new(RefCell::new(conn)),
            path,
        }
    }

    /// Location of the on-disk store, `None` for an in-memory cache.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    /// Provides a scope in which we can modify the cache. Mutations made
    /// through the writer are applied together by [`CacheWriter::commit`];
    /// dropping the writer without committing discards all of them.
    pub fn write(&self) -> Result<CacheWriter<'_>> {
        let guard = self.conn.lock();
        guard.borrow().execute_batch("SAVEPOINT cache_write")?;

        Ok(CacheWriter {
            guard,
            finished: false,
        })
    }

    /// Nickname of the given relay, or `default` if we don't know it.
    pub fn relay_nickname(&self, fingerprint: &str, default: Option<&str>) -> Result<Option<String>> {
        let nickname = self.query_relay(
            "SELECT nickname FROM relays WHERE fingerprint = ?1",
            fingerprint,
            |row| row.get::<_, String>(0),
        )?;

        Ok(nickname.or_else(|| default.map(str::to_string)))
    }

    /// Address and ORPort of the given relay, or `default` if we don't know it.
    pub fn relay_address(
        &self,
        fingerprint: &str,
        default: Option<SocketAddr>,
    ) -> Result<Option<SocketAddr>> {
        let stored = self.query_relay(
            "SELECT address, or_port FROM relays WHERE fingerprint = ?1",
            fingerprint,
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, u16>(1)?)),
        )?;

        let Some((address, or_port)) = stored else {
            return Ok(default);
        };

        match address.parse::<IpAddr>() {
            Ok(ip) => Ok(Some(SocketAddr::new(ip, or_port))),
            Err(_) => {
                warn!("Cached address '{}' for {} is malformed", address, fingerprint);
                Ok(default)
            }
        }
    }

    pub fn relay_count(&self) -> Result<usize> {
        let guard = self.conn.lock();
        let conn = guard.borrow();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM relays", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query_relay<T, F>(&self, sql: &str, fingerprint: &str, map: F) -> Result<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let guard = self.conn.lock();
        let conn = guard.borrow();
        let result = conn
            .query_row(sql, [fingerprint.to_ascii_uppercase()], map)
            .optional()?;
        Ok(result)
    }
}

/// Scoped, exclusive write access to the [`Cache`]. Holds the cache lock
/// for its whole lifetime.
pub struct CacheWriter<'a> {
    guard: ReentrantMutexGuard<'a, RefCell<Connection>>,
    finished: bool,
}

impl CacheWriter<'_> {
    /// Records relay metadata, replacing anything we had for the fingerprint.
    /// Malformed input is rejected before the store is touched.
    pub fn record_relay(
        &self,
        fingerprint: &str,
        address: &str,
        or_port: u16,
        nickname: Option<&str>,
    ) -> Result<()> {
        let record = RelayRecord::new(fingerprint, address, or_port, nickname)?;
        self.upsert_relay(&record)
    }

    pub fn upsert_relay(&self, record: &RelayRecord) -> Result<()> {
        let conn = self.guard.borrow();
        conn.execute(
            r#"
            INSERT INTO relays (fingerprint, address, or_port, nickname)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(fingerprint) DO UPDATE SET
                address = ?2,
                or_port = ?3,
                nickname = ?4
            "#,
            params![
                &record.fingerprint,
                record.address.to_string(),
                record.or_port,
                &record.nickname
            ],
        )?;

        Ok(())
    }

    /// Applies every mutation made through this writer.
    pub fn commit(mut self) -> Result<()> {
        self.guard.borrow().execute_batch("RELEASE cache_write")?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for CacheWriter<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        debug!("Discarding uncommitted cache writes");
        let conn = self.guard.borrow();
        if let Err(err) = conn.execute_batch("ROLLBACK TO cache_write; RELEASE cache_write") {
            warn!("Unable to roll back cache writes: {}", err);
        }
    }
}

fn open_persistent(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;

    match schema::read_version(&conn) {
        Some(SCHEMA_VERSION) => {
            info!("Cache loaded from {}", path.display());
            return Ok(conn);
        }
        Some(version) => info!(
            "Cache at {} has schema version {} but the current version is {}, clearing it.",
            path.display(),
            version,
            SCHEMA_VERSION
        ),
        None => info!(
            "Cache at {} is missing a schema, clearing it.",
            path.display()
        ),
    }

    drop(conn);

    if let Err(err) = std::fs::remove_file(path)
        && err.kind() != std::io::ErrorKind::NotFound
    {
        return Err(Error::Io(err));
    }

    let conn = Connection::open(path)?;
    schema::create_schema(&conn)?;
    Ok(conn)
}
