use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Failures of the data store. Not-found verses are not errors; loaders return
/// `None` for them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not open the verse database at {}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("verse database query failed")]
    Query(#[from] rusqlite::Error),

    #[error("verse database connection lock was poisoned")]
    Poisoned,

    #[error("store read task did not complete: {0}")]
    Task(String),
}

/// Shared handle to the bundled, read-only verse database. Cloning is cheap;
/// every clone talks to the same connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Store {
    /// Open the database without write access. The file must already exist;
    /// the reader never creates or migrates it.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| StoreError::Unavailable {
            path: path.clone(),
            source,
        })?;

        // Opening is lazy in SQLite; touch the schema so a non-database file
        // fails here instead of on the first chapter load.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|source| StoreError::Unavailable {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "opened verse database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// File the store was opened from; included in error logs.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a read against the connection on the calling thread.
    pub fn read_blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let guard = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&guard)?)
    }

    /// Run a read on the blocking thread pool so async callers never stall
    /// the UI loop on SQLite.
    pub async fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read_blocking(f))
            .await
            .map_err(|err| StoreError::Task(err.to_string()))?
    }
}
