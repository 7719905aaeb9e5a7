use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use artist_tracker::app::cycle::{CycleOutcome, CycleState, Orchestrator};
use artist_tracker::app::scheduler::{run_loop, shutdown_channel};
use artist_tracker::config::{Config, DEFAULT_CONFIG_PATH};
use artist_tracker::infra::discord::DiscordWebhook;
use artist_tracker::infra::http_client::ReqwestHttp;
use artist_tracker::infra::wayback::WaybackArchiver;
use artist_tracker::pipeline::assemble::build_records;
use artist_tracker::pipeline::extract::{ExtractRules, TableExtractor};
use artist_tracker::pipeline::snapshot;
use artist_tracker::{logging, metrics};

#[derive(Parser)]
#[command(name = "artist_tracker")]
#[command(about = "Keeps artists.csv in sync with the tracker sheet and announces changes")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the update loop until interrupted
    Run,
    /// Run a single update cycle and exit
    Once,
    /// Build artists.csv from a local Artists.html without downloading anything
    Extract {
        /// Exported sheet HTML
        html: PathBuf,
        /// Output CSV path (defaults to the configured artists.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn build_orchestrator(config: Config) -> Result<Orchestrator> {
    let http = ReqwestHttp::new(&config.source.user_agent).context("Failed to build HTTP client")?;
    let archiver = WaybackArchiver::new(&config.source.user_agent).context("Failed to build archive client")?;
    let notifier = DiscordWebhook::new(&config.notify);
    Ok(Orchestrator::new(config, Arc::new(http), Arc::new(notifier), Arc::new(archiver)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    logging::init_logging(&config.output.log_dir);

    match cli.command {
        Commands::Run => {
            metrics::init_metrics(config.metrics.listen_addr.as_deref());
            let interval = config.schedule.interval();
            let orchestrator = build_orchestrator(config)?;
            let (shutdown_tx, shutdown_rx) = shutdown_channel();

            info!("Starting background update loop (every {}s)...", interval.as_secs());
            let worker = tokio::spawn(async move {
                run_loop(&orchestrator, CycleState::default(), interval, shutdown_rx).await;
            });

            tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
            info!("Interrupt received, stopping after the current cycle");
            let _ = shutdown_tx.send(true);
            worker.await.context("Update loop panicked")?;
        }
        Commands::Once => {
            let orchestrator = build_orchestrator(config)?;
            let mut state = CycleState::default();
            match orchestrator.run_cycle(&mut state).await {
                CycleOutcome::Aborted { stage, error } => {
                    error!("Cycle aborted while {}: {}", stage.as_str(), error);
                    println!("❌ Cycle aborted while {}: {}", stage.as_str(), error);
                }
                outcome => println!("✅ Cycle finished: {}", outcome.label()),
            }
        }
        Commands::Extract { html, out } => {
            let bytes = std::fs::read(&html).with_context(|| format!("Failed to read {}", html.display()))?;
            let extractor = TableExtractor::new(ExtractRules::from_config(&config.extract));
            let records = build_records(&extractor, &config.extract.overrides, &bytes)?;
            let out = out.unwrap_or_else(|| config.output.csv_path());
            snapshot::save(&out, &records)?;
            println!("📝 Wrote {} records to {}", records.len(), out.display());
        }
    }
    Ok(())
}
