//! rag-ingest CLI entry point

use clap::Parser;
use rag_em_ingest::{
    commands::{cmd_dry_run, cmd_ingest_file, print_ingest_stats, IngestOptions},
    config::{default_input_file, Config},
    error::Result,
    models::RppBundle,
    progress::{LogWriterFactory, ReportWriter},
    store::RagApiClient,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "rag-ingest")]
#[command(version, about = "Store rpp.v1 document sections in the RAG EM API", long_about = None)]
struct Cli {
    /// rpp.v1 bundle to ingest
    #[arg(short, long, default_value = default_input_file())]
    input: PathBuf,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RAG EM API endpoint (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// API token (defaults to the configured environment variable)
    #[arg(long)]
    token: Option<String>,

    /// List the sections that would be stored without calling the API
    #[arg(long)]
    dry_run: bool,

    /// Print the final stats as JSON
    #[arg(long)]
    json: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(LogWriterFactory::default()))
        .with(filter)
        .init();

    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
        config.validate()?;
    }

    let mut out = ReportWriter;

    let stats = if cli.dry_run {
        let bundle = RppBundle::load(&cli.input)?;
        cmd_dry_run(&bundle, &mut out)?
    } else {
        let client = RagApiClient::from_config(&config, cli.token)?;
        let options = IngestOptions {
            show_progress: !cli.no_progress && !cli.json,
        };
        cmd_ingest_file(&client, &cli.input, &options, &mut out).await?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_ingest_stats(&stats, cli.dry_run);
    }

    Ok(())
}
