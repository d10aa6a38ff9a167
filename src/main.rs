use billionaire_etl::domain::ports::ConfigProvider;
use billionaire_etl::utils::{logger, validation::Validate};
use billionaire_etl::{build_sink, CliConfig, EtlEngine, EtlError, ScrapePipeline};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init(config.verbose, config.json_logs);

    tracing::info!("Starting billionaire-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config).await {
        report_failure(&e);
        std::process::exit(e.severity().exit_code());
    }
}

async fn run(config: CliConfig) -> Result<(), EtlError> {
    config.validate()?;

    let sink = build_sink(&config.sink_settings()?)?;
    let pipeline = ScrapePipeline::from_config(config, sink)?;
    let engine = EtlEngine::new(pipeline);

    let report = engine.run().await?;
    println!("✅ {}", report);
    Ok(())
}

fn report_failure(e: &EtlError) {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}
