use super::{
    is_unresolved_placeholder, validate_provider, SinkKind, DEFAULT_PAGE_URL, DEFAULT_SQL_FILE,
    DEFAULT_TABLE, DEFAULT_USER_AGENT,
};
use crate::domain::model::{
    ConflictPolicy, ImageSettings, NetWorthFormat, RowSelectors, SinkSettings,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_page_url")]
    pub url: String,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_page_url(),
            user_agent: None,
            timeout_seconds: None,
        }
    }
}

fn default_page_url() -> String {
    DEFAULT_PAGE_URL.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub row_limit: Option<usize>,
    pub selectors: Option<SelectorConfig>,
}

/// Unset selectors fall back to the Forbes defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub row: Option<String>,
    pub name: Option<String>,
    pub net_worth: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    pub net_worth_format: Option<NetWorthFormat>,
    pub images: Option<ImageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub enabled: bool,
    pub dir: Option<String>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub sink: SinkKind,
    pub database_url: Option<String>,
    pub table: Option<String>,
    pub conflict: Option<ConflictPolicy>,
    pub create_table: Option<bool>,
    pub output_path: Option<String>,
    pub sql_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Loads a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay verbatim.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn table(&self) -> &str {
        self.load.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.load.conflict.unwrap_or_default()
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn page_url(&self) -> &str {
        &self.source.url
    }

    fn user_agent(&self) -> &str {
        self.source
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    fn request_timeout_secs(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn row_limit(&self) -> Option<usize> {
        self.extract.row_limit
    }

    fn selectors(&self) -> RowSelectors {
        let defaults = RowSelectors::default();
        match &self.extract.selectors {
            None => defaults,
            Some(custom) => RowSelectors {
                row: custom.row.clone().unwrap_or(defaults.row),
                name: custom.name.clone().unwrap_or(defaults.name),
                net_worth: custom.net_worth.clone().unwrap_or(defaults.net_worth),
                image: custom.image.clone().unwrap_or(defaults.image),
            },
        }
    }

    fn net_worth_format(&self) -> NetWorthFormat {
        self.transform.net_worth_format.unwrap_or_default()
    }

    fn image_settings(&self) -> Option<ImageSettings> {
        let images = self.transform.images.as_ref().filter(|i| i.enabled)?;
        let defaults = ImageSettings::default();
        Some(ImageSettings {
            dir: images.dir.clone().unwrap_or(defaults.dir),
            size: images.size.unwrap_or(defaults.size),
        })
    }

    fn sink_settings(&self) -> Result<SinkSettings> {
        match self.load.sink {
            SinkKind::Database => {
                let url = self
                    .load
                    .database_url
                    .as_deref()
                    .filter(|url| !is_unresolved_placeholder(url))
                    .ok_or_else(|| EtlError::MissingConfigError {
                        field: "load.database_url".to_string(),
                    })?;
                Ok(SinkSettings::Database {
                    url: url.to_string(),
                    table: self.table().to_string(),
                    policy: self.conflict_policy(),
                    create_table: self.load.create_table.unwrap_or(false),
                })
            }
            SinkKind::SqlFile => Ok(SinkSettings::SqlFile {
                output_path: self
                    .load
                    .output_path
                    .clone()
                    .unwrap_or_else(|| ".".to_string()),
                file_name: self
                    .load
                    .sql_file
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SQL_FILE.to_string()),
                table: self.table().to_string(),
                policy: self.conflict_policy(),
            }),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_images_variant() {
        let toml_content = r#"
[pipeline]
name = "top25-with-images"

[extract]
row_limit = 25

[transform.images]
enabled = true

[load]
sink = "database"
database_url = "sqlite://billionaires.sqlite"
table = "users"
conflict = "insert"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "top25-with-images");
        assert_eq!(config.page_url(), DEFAULT_PAGE_URL);
        assert_eq!(config.user_agent(), "Mozilla/5.0");
        assert_eq!(config.row_limit(), Some(25));
        assert_eq!(config.image_settings(), Some(ImageSettings::default()));
        assert_eq!(
            config.sink_settings().unwrap(),
            SinkSettings::Database {
                url: "sqlite://billionaires.sqlite".to_string(),
                table: "users".to_string(),
                policy: ConflictPolicy::Insert,
                create_table: false,
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_selectors_keep_defaults() {
        let toml_content = r#"
[pipeline]
name = "sql-file"

[extract]
row_limit = 100

[extract.selectors]
row = "div.rtb-table div.rtb-row"
image = "img.profile-image"

[transform]
net_worth_format = "billions"

[load]
sink = "sql_file"
conflict = "do_update"
table = "users"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let selectors = config.selectors();

        assert_eq!(selectors.row, "div.rtb-table div.rtb-row");
        assert_eq!(selectors.name, "div.personName");
        assert_eq!(selectors.image, "img.profile-image");
        assert_eq!(config.net_worth_format(), NetWorthFormat::Billions);
        assert!(config.image_settings().is_none());
        assert!(matches!(
            config.sink_settings().unwrap(),
            SinkSettings::SqlFile { policy: ConflictPolicy::DoUpdate, .. }
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BILLIONAIRE_ETL_TEST_DB", "sqlite://from-env.sqlite");

        let toml_content = r#"
[pipeline]
name = "env"

[load]
sink = "database"
database_url = "${BILLIONAIRE_ETL_TEST_DB}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.load.database_url.as_deref(),
            Some("sqlite://from-env.sqlite")
        );

        std::env::remove_var("BILLIONAIRE_ETL_TEST_DB");
    }

    #[test]
    fn test_unset_env_var_is_missing_database_url() {
        let toml_content = r#"
[pipeline]
name = "env"

[load]
sink = "database"
database_url = "${BILLIONAIRE_ETL_SURELY_UNSET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.sink_settings().unwrap_err(),
            EtlError::MissingConfigError { .. }
        ));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "bad"

[source]
url = "invalid-url"

[load]
sink = "sql_file"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[pipeline").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[load]
sink = "sql_file"
sql_file = "out.sql"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert!(config.validate().is_ok());
    }
}
