//! Request Ledger
//!
//! Durable record of requests that have not reached `READY`. An entry is written
//! before the first partition is dispatched and deleted when the last report
//! arrives, so whatever is left in the ledger at startup is unfinished work.

use super::types::{PersistedRequest, RequestId};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Inserts or replaces the entry for `request.request_id`.
    async fn save(&self, request: &PersistedRequest) -> Result<()>;
    async fn remove(&self, request_id: &RequestId) -> Result<()>;
    async fn get_all(&self) -> Result<Vec<PersistedRequest>>;
}

const CREATE_LEDGER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS crack_hash (
    request_id TEXT NOT NULL PRIMARY KEY,
    hash TEXT NOT NULL,
    max_length INTEGER NOT NULL
)
"#;

fn check_entry(request_id: &RequestId, hash: Option<&str>) -> Result<()> {
    if request_id.0.is_empty() {
        return Err(anyhow::anyhow!("request_id cannot be empty"));
    }
    if hash.is_some_and(str::is_empty) {
        return Err(anyhow::anyhow!("hash cannot be empty"));
    }
    Ok(())
}

/// SQLite-backed ledger. All statements run on the blocking pool.
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLedger {
    /// Opens (or creates) the database at `path`, creating parent directories
    /// and the table as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(CREATE_LEDGER_TABLE)?;

        tracing::info!("Opened request ledger at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| anyhow::anyhow!("ledger connection poisoned"))?;
            f(&conn).map_err(anyhow::Error::from)
        })
        .await?
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn save(&self, request: &PersistedRequest) -> Result<()> {
        check_entry(&request.request_id, Some(request.hash.as_str()))?;

        let request = request.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO crack_hash (request_id, hash, max_length) VALUES (?1, ?2, ?3)",
                params![request.request_id.0, request.hash, request.max_length],
            )
        })
        .await?;

        Ok(())
    }

    async fn remove(&self, request_id: &RequestId) -> Result<()> {
        check_entry(request_id, None)?;

        let request_id = request_id.0.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM crack_hash WHERE request_id = ?1",
                params![request_id],
            )
        })
        .await?;

        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<PersistedRequest>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT request_id, hash, max_length FROM crack_hash")?;
            let rows = stmt.query_map([], |row| {
                Ok(PersistedRequest {
                    request_id: RequestId(row.get(0)?),
                    hash: row.get(1)?,
                    max_length: row.get(2)?,
                })
            })?;
            let requests = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(requests)
        })
        .await
    }
}

/// Process-local ledger. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryLedger {
    entries: DashMap<RequestId, PersistedRequest>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, request_id: &RequestId) -> bool {
        self.entries.contains_key(request_id)
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn save(&self, request: &PersistedRequest) -> Result<()> {
        check_entry(&request.request_id, Some(request.hash.as_str()))?;
        self.entries
            .insert(request.request_id.clone(), request.clone());
        Ok(())
    }

    async fn remove(&self, request_id: &RequestId) -> Result<()> {
        check_entry(request_id, None)?;
        self.entries.remove(request_id);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<PersistedRequest>> {
        Ok(self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}
