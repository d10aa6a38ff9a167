pub mod database;
pub mod sql_file;

pub use database::SqliteSink;
pub use sql_file::SqlFileSink;

use crate::adapters::storage::LocalStorage;
use crate::domain::model::SinkSettings;
use crate::domain::ports::RecordSink;
use crate::utils::error::Result;

/// Builds the sink described by the configuration. Nothing is opened or written yet.
pub fn build_sink(settings: &SinkSettings) -> Result<Box<dyn RecordSink>> {
    match settings {
        SinkSettings::Database {
            url,
            table,
            policy,
            create_table,
        } => {
            Ok(Box::new(SqliteSink::new(url, table, *policy, *create_table)?))
        }
        SinkSettings::SqlFile {
            output_path,
            file_name,
            table,
            policy,
        } => {
            let storage = LocalStorage::new(output_path.clone());
            Ok(Box::new(SqlFileSink::new(storage, file_name, table, *policy)?))
        }
    }
}
