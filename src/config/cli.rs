use super::{
    validate_provider, SinkKind, DEFAULT_PAGE_URL, DEFAULT_SQL_FILE, DEFAULT_TABLE,
    DEFAULT_USER_AGENT,
};
use crate::domain::model::{
    ConflictPolicy, ImageSettings, NetWorthFormat, RowSelectors, SinkSettings,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "billionaire-etl")]
#[command(about = "Scrape the real-time billionaires list into SQLite or an SQL file")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_PAGE_URL)]
    pub url: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(short = 'n', long, help = "Only read the first N row nodes")]
    pub limit: Option<usize>,

    #[arg(long, default_value = "div.table-row")]
    pub row_selector: String,

    #[arg(long, default_value = "div.personName")]
    pub name_selector: String,

    #[arg(long, default_value = "div.netWorth")]
    pub net_worth_selector: String,

    #[arg(long, default_value = "img")]
    pub image_selector: String,

    #[arg(long, value_enum, default_value_t = NetWorthFormat::Raw)]
    pub net_worth_format: NetWorthFormat,

    #[arg(long, help = "Download profile images and resize them")]
    pub images: bool,

    #[arg(long, default_value = "billionaire_images")]
    pub image_dir: String,

    #[arg(long, default_value = "300")]
    pub image_size: u32,

    #[arg(long, value_enum, default_value_t = SinkKind::Database)]
    pub sink: SinkKind,

    #[arg(long, env = "DATABASE_URL", help = "SQLite database (sqlite://path or a path)")]
    pub database_url: Option<String>,

    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    #[arg(long, value_enum, default_value_t = ConflictPolicy::DoNothing)]
    pub conflict: ConflictPolicy,

    #[arg(long, help = "Create the table if it does not exist")]
    pub create_table: bool,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_SQL_FILE)]
    pub sql_file: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn page_url(&self) -> &str {
        &self.url
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn request_timeout_secs(&self) -> Option<u64> {
        self.timeout
    }

    fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    fn selectors(&self) -> RowSelectors {
        RowSelectors {
            row: self.row_selector.clone(),
            name: self.name_selector.clone(),
            net_worth: self.net_worth_selector.clone(),
            image: self.image_selector.clone(),
        }
    }

    fn net_worth_format(&self) -> NetWorthFormat {
        self.net_worth_format
    }

    fn image_settings(&self) -> Option<ImageSettings> {
        self.images.then(|| ImageSettings {
            dir: self.image_dir.clone(),
            size: self.image_size,
        })
    }

    fn sink_settings(&self) -> Result<SinkSettings> {
        match self.sink {
            SinkKind::Database => {
                let url = validate_required_field("database_url", &self.database_url)?;
                Ok(SinkSettings::Database {
                    url: url.clone(),
                    table: self.table.clone(),
                    policy: self.conflict,
                    create_table: self.create_table,
                })
            }
            SinkKind::SqlFile => Ok(SinkSettings::SqlFile {
                output_path: self.output_path.clone(),
                file_name: self.sql_file.clone(),
                table: self.table.clone(),
                policy: self.conflict,
            }),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
