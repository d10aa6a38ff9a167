#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::SinkSettings;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_selector, validate_sql_identifier, validate_sqlite_url, validate_url,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_URL: &str = "https://www.forbes.com/real-time-billionaires/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TABLE: &str = "billionaires";
pub const DEFAULT_SQL_FILE: &str = "billionaires.sql";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Parameter-bound inserts into SQLite.
    #[default]
    Database,
    /// Literal statements written to a file.
    SqlFile,
}

/// Checks shared by every configuration source, expressed through the provider.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_url("source.url", config.page_url())?;
    validate_non_empty_string("source.user_agent", config.user_agent())?;

    if let Some(limit) = config.row_limit() {
        validate_positive_number("extract.row_limit", limit, 1)?;
    }

    let selectors = config.selectors();
    validate_selector("extract.selectors.row", &selectors.row)?;
    validate_selector("extract.selectors.name", &selectors.name)?;
    validate_selector("extract.selectors.net_worth", &selectors.net_worth)?;
    validate_selector("extract.selectors.image", &selectors.image)?;

    if let Some(images) = config.image_settings() {
        validate_path("transform.images.dir", &images.dir)?;
        validate_range("transform.images.size", images.size, 1, 4096)?;
    }

    match config.sink_settings()? {
        SinkSettings::Database { url, table, .. } => {
            validate_sqlite_url("load.database_url", &url)?;
            validate_sql_identifier("load.table", &table)?;
        }
        SinkSettings::SqlFile {
            output_path,
            file_name,
            table,
            ..
        } => {
            validate_path("load.output_path", &output_path)?;
            validate_file_extension("load.sql_file", &file_name, &["sql"])?;
            validate_sql_identifier("load.table", &table)?;
        }
    }

    Ok(())
}

/// `${VAR}` left in place by substitution means the variable was not set.
pub(crate) fn is_unresolved_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with("${") && trimmed.ends_with('}')
}
