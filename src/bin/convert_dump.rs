use anyhow::Context;
use billionaire_etl::core::schema_converter::convert_with_counts;
use billionaire_etl::domain::ports::Storage;
use billionaire_etl::utils::logger;
use billionaire_etl::LocalStorage;
use clap::Parser;

#[derive(Parser)]
#[command(name = "convert-dump")]
#[command(about = "Rewrite an SQLite .dump file into PostgreSQL syntax")]
struct Args {
    /// SQLite dump to read
    #[arg(short, long, default_value = "dump.sql")]
    input: String,

    /// Converted file to write (overwritten)
    #[arg(short, long, default_value = "dump_postgres.sql")]
    output: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let storage = LocalStorage::new(".".to_string());

    let raw = storage
        .read_file(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input))?;
    let sql = String::from_utf8(raw).with_context(|| format!("{} is not UTF-8", args.input))?;

    let (converted, counts) = convert_with_counts(&sql);
    tracing::debug!("Substitutions: {:?}", counts);
    tracing::info!(
        "Applied {} substitutions ({} PRAGMA lines removed)",
        counts.total(),
        counts.pragmas_removed
    );

    storage
        .write_file(&args.output, converted.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", args.output))?;

    println!("Converted dump file saved as {}", args.output);
    Ok(())
}
