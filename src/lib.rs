pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::sink::{build_sink, SqlFileSink, SqliteSink};
pub use adapters::storage::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{etl::EtlEngine, pipeline::ScrapePipeline};
pub use domain::model::{BillionaireRecord, ConflictPolicy, NetWorthFormat};
pub use utils::error::{EtlError, Result};
