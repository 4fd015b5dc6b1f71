//! docstore-config
//!
//! Loads a configuration document from a document store, flattens it, and
//! keeps it fresh with etag-conditional reloads.
//!
//! ```text
//! settings.toml → HttpDocumentStore ──read_document──▶ document store
//!                         │
//!                         ▼
//!              DocumentConfigProvider ──▶ flat snapshot ──▶ subscribers
//!                         ▲
//!                   RefreshTask (interval)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use docstore_config::config::{load_settings, Settings};
use docstore_config::lifecycle::signals::shutdown_on_signal;
use docstore_config::observability::{logging, metrics};
use docstore_config::{
    DocumentConfigProvider, HttpDocumentStore, ProviderOptions, RefreshTask, Shutdown,
};

#[derive(Parser)]
#[command(name = "docstore-config")]
#[command(about = "Serve a document store JSON document as flat configuration", long_about = None)]
struct Cli {
    /// Settings file
    #[arg(short, long, default_value = "docstore-config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the document and keep it refreshed until interrupted
    Run,
    /// Load the document once and print the flattened keys as JSON
    Dump,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;

    logging::init_logging(&settings.observability.log_level);
    tracing::info!(
        config = %cli.config.display(),
        document_id = %settings.document.id,
        endpoint = %settings.store.endpoint,
        "docstore-config v0.1.0 starting"
    );

    let provider = Arc::new(build_provider(&settings)?);

    match cli.command {
        Commands::Dump => {
            let shutdown = Shutdown::new();
            provider.reload(&shutdown.token()).await?;
            let snapshot = provider.snapshot();
            println!("{}", serde_json::to_string_pretty(snapshot.data())?);
        }
        Commands::Run => run(settings, provider).await?,
    }

    Ok(())
}

fn build_provider(settings: &Settings) -> Result<DocumentConfigProvider, Box<dyn std::error::Error>> {
    let store = Arc::new(HttpDocumentStore::from_config(&settings.store)?);
    let options = ProviderOptions::from_config(store, &settings.document)?;
    Ok(DocumentConfigProvider::new(options))
}

async fn run(
    settings: Settings,
    provider: Arc<DocumentConfigProvider>,
) -> Result<(), Box<dyn std::error::Error>> {
    if settings.observability.metrics_enabled {
        let addr = settings.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    provider.reload(&shutdown.token()).await?;
    tracing::info!(keys = provider.snapshot().data().len(), "Initial configuration loaded");

    let mut changes = provider.subscribe();
    let watched = provider.clone();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let snapshot = watched.snapshot();
            tracing::info!(
                generation = snapshot.generation(),
                keys = snapshot.data().len(),
                etag = %snapshot.etag(),
                "Configuration snapshot replaced"
            );
        }
    });

    if settings.refresh.enabled {
        let task = RefreshTask::new(provider, Duration::from_secs(settings.refresh.interval_secs));
        let stats = task.run(shutdown.token()).await;
        tracing::info!(?stats, "Refresh finished");
    } else {
        tracing::info!("Periodic refresh disabled, waiting for shutdown");
        shutdown.wait().await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
