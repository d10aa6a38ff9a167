use crate::core::sql_literal::render_sql;
use crate::domain::model::{BillionaireRecord, ConflictPolicy, LoadReport};
use crate::domain::ports::{RecordSink, Storage};
use crate::utils::error::Result;
use crate::utils::validation::validate_sql_identifier;
use async_trait::async_trait;

/// Writes one literal statement per record into a single SQL file, replacing it.
pub struct SqlFileSink<S: Storage> {
    storage: S,
    file_name: String,
    table: String,
    policy: ConflictPolicy,
}

impl<S: Storage> SqlFileSink<S> {
    pub fn new(storage: S, file_name: &str, table: &str, policy: ConflictPolicy) -> Result<Self> {
        validate_sql_identifier("load.table", table)?;
        Ok(Self {
            storage,
            file_name: file_name.to_string(),
            table: table.to_string(),
            policy,
        })
    }
}

#[async_trait]
impl<S: Storage> RecordSink for SqlFileSink<S> {
    fn destination(&self) -> String {
        self.storage.describe(&self.file_name)
    }

    async fn write(&self, records: &[BillionaireRecord]) -> Result<LoadReport> {
        let sql = render_sql(records, &self.table, self.policy);
        tracing::debug!("Writing {} statements ({} bytes)", records.len(), sql.len());
        self.storage.write_file(&self.file_name, sql.as_bytes()).await?;
        Ok(LoadReport::new(self.destination(), records.len(), records.len()))
    }
}
