use crate::domain::model::{BillionaireRecord, ConflictPolicy, LoadReport};
use crate::domain::ports::RecordSink;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_sql_identifier, validate_sqlite_url};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// Batch writer over a SQLite database.
///
/// The database is opened on first use, so a run that fails before loading
/// never touches it. Each call to [`SqliteSink::insert_batch`] runs in one
/// transaction with a single prepared, parameter-bound statement. Any error
/// rolls the whole batch back; nothing is retried row by row.
pub struct SqliteSink {
    inner: Arc<Inner>,
}

struct Inner {
    conn: Mutex<Option<Connection>>,
    location: String,
    table: String,
    policy: ConflictPolicy,
    create_table: bool,
}

impl SqliteSink {
    /// Accepts `sqlite://path`, `sqlite:path` or a bare path; other schemes are rejected.
    ///
    /// With `create_table`, the table is created right after the database is opened.
    pub fn new(
        database_url: &str,
        table: &str,
        policy: ConflictPolicy,
        create_table: bool,
    ) -> Result<Self> {
        let path = sqlite_path(database_url)?;
        Self::build(None, path, table, policy, create_table)
    }

    pub fn from_connection(
        conn: Connection,
        location: &str,
        table: &str,
        policy: ConflictPolicy,
    ) -> Result<Self> {
        Self::build(Some(conn), location, table, policy, false)
    }

    fn build(
        conn: Option<Connection>,
        location: &str,
        table: &str,
        policy: ConflictPolicy,
        create_table: bool,
    ) -> Result<Self> {
        validate_sql_identifier("load.table", table)?;
        Ok(Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                location: location.to_string(),
                table: table.to_string(),
                policy,
                create_table,
            }),
        })
    }

    /// Creates the target table when missing; `name` carries the conflict key.
    pub fn create_table(&self) -> Result<()> {
        self.inner
            .with_connection(|conn| Ok(conn.execute_batch(&self.inner.create_table_sql())?))
    }

    pub fn insert_sql(&self) -> String {
        self.inner.insert_sql()
    }

    /// Returns the number of rows the batch actually inserted or updated.
    pub fn insert_batch(&self, records: &[BillionaireRecord]) -> Result<usize> {
        self.inner.insert_batch(records)
    }

    pub fn row_count(&self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.inner.table);
        let count: i64 = self
            .inner
            .with_connection(|conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))?;
        Ok(count as usize)
    }

    pub fn is_open(&self) -> bool {
        self.inner
            .conn
            .lock()
            .map(|conn| conn.is_some())
            .unwrap_or(false)
    }
}

impl Inner {
    fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut guard = self.conn.lock().map_err(|_| EtlError::ProcessingError {
            message: "database connection lock poisoned".to_string(),
        })?;

        if guard.is_none() {
            tracing::debug!("Opening SQLite database at {}", self.location);
            let conn = Connection::open(&self.location)?;
            if self.create_table {
                conn.execute_batch(&self.create_table_sql())?;
            }
            *guard = Some(conn);
        }

        let conn = guard.as_mut().ok_or_else(|| EtlError::ProcessingError {
            message: format!("database {} is not open", self.location),
        })?;
        f(conn)
    }

    fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id        INTEGER PRIMARY KEY,
                name      TEXT NOT NULL UNIQUE,
                image_url TEXT NOT NULL DEFAULT '',
                net_worth TEXT NOT NULL
            );",
            self.table
        )
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (name, image_url, net_worth) VALUES (?1, ?2, ?3){}",
            self.table,
            self.policy.clause()
        )
    }

    fn insert_batch(&self, records: &[BillionaireRecord]) -> Result<usize> {
        let sql = self.insert_sql();
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            let mut written = 0;
            {
                let mut stmt = tx.prepare(&sql)?;
                for record in records {
                    written += stmt.execute(params![
                        record.name,
                        record.image_reference,
                        record.net_worth
                    ])?;
                }
            }
            tx.commit()?;
            Ok(written)
        })
    }
}

#[async_trait]
impl RecordSink for SqliteSink {
    fn destination(&self) -> String {
        format!("sqlite:{} ({})", self.inner.location, self.inner.table)
    }

    async fn write(&self, records: &[BillionaireRecord]) -> Result<LoadReport> {
        let inner = Arc::clone(&self.inner);
        let batch = records.to_vec();
        let written = tokio::task::spawn_blocking(move || inner.insert_batch(&batch))
            .await
            .map_err(|e| EtlError::ProcessingError {
                message: format!("database task did not complete: {}", e),
            })??;

        tracing::info!(
            "Inserted {} of {} billionaires into {}",
            written,
            records.len(),
            self.inner.table
        );
        Ok(LoadReport::new(self.destination(), records.len(), written))
    }
}

pub fn sqlite_path(database_url: &str) -> Result<&str> {
    validate_sqlite_url("load.database_url", database_url)
}
