use billionaire_etl::adapters::http::HttpFetcher;
use billionaire_etl::core::extractor::Extractor;
use billionaire_etl::domain::ports::{ConfigProvider, PageFetcher};
use billionaire_etl::utils::{logger, validation::Validate};
use billionaire_etl::{build_sink, EtlEngine, EtlError, ScrapePipeline, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Run the billionaires scraper from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "configs/all_billionaires.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the row limit from the config
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Fetch and extract only, printing the records as JSON
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init(args.verbose || config.verbose_logging(), config.json_logging());
    tracing::info!("📁 Loaded configuration '{}' from {}", config.pipeline.name, args.config);

    if let Some(limit) = args.limit {
        config.extract.row_limit = Some(limit);
        tracing::info!("🔧 Row limit overridden to: {}", limit);
    }

    let result = if args.dry_run {
        dry_run(config).await
    } else {
        run(config).await
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code());
    }
}

async fn run(config: TomlConfig) -> Result<(), EtlError> {
    config.validate()?;
    display_config_summary(&config);

    let sink = build_sink(&config.sink_settings()?)?;
    let engine = EtlEngine::new(ScrapePipeline::from_config(config, sink)?);

    let report = engine.run().await?;
    println!("✅ {}", report);
    Ok(())
}

/// Fetches and extracts, printing records and skipped rows; nothing is written.
async fn dry_run(config: TomlConfig) -> Result<(), EtlError> {
    tracing::info!("🔍 DRY RUN MODE - nothing will be written");
    config.validate()?;
    display_config_summary(&config);

    let fetcher = HttpFetcher::from_config(&config)?;
    let html = fetcher.fetch_text(config.page_url()).await?;
    let extraction = Extractor::new(&config.selectors())?.extract(&html, config.row_limit());

    println!("{}", serde_json::to_string_pretty(&extraction)?);
    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("🌐 Source: {}", config.page_url());
    match config.row_limit() {
        Some(limit) => tracing::info!("✂️  Row limit: {}", limit),
        None => tracing::info!("✂️  Row limit: none"),
    }
    tracing::info!("💵 Net worth format: {:?}", config.net_worth_format());
    if let Some(images) = config.image_settings() {
        tracing::info!("🖼️  Images: {}x{} into {}", images.size, images.size, images.dir);
    }
    tracing::info!("💾 Sink: {:?}, table {}, {:?}", config.load.sink, config.table(), config.conflict_policy());
}
