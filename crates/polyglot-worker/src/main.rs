use anyhow::{Context, Result};
use polyglot_worker::{ShutdownSignal, TemporalConnector, WorkerConfig, WorkerProcess};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Real environment variables take precedence over .env entries
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polyglot_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{:#}", e), "Worker terminated");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing::info!("polyglot-worker starting...");

    let config = WorkerConfig::from_env();
    let shutdown = ShutdownSignal::install().context("Failed to install signal handlers")?;

    WorkerProcess::new(TemporalConnector::new(), config)
        .run(shutdown.recv())
        .await?;

    Ok(())
}
