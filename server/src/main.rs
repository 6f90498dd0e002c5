use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use expense_tracker::backend::backup::{run_daily, BackupSchedule};
use expense_tracker::backend::config::AppConfig;
use expense_tracker::backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    info!(
        "⚙️ Data file {}, monthly budget {:.2}, salary day {}, timezone {}",
        config.data_path.display(),
        config.monthly_budget,
        config.cycle_day.get(),
        config.timezone
    );

    let app_state = initialize_backend(&config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let backup = tokio::spawn(run_daily(BackupSchedule::from_config(&config), shutdown_rx));

    let router = create_router(app_state);
    let listener = TcpListener::bind(&config.web_address)
        .await
        .with_context(|| format!("failed to bind {}", config.web_address))?;
    info!("🌐 Serving /expenses on {}", config.web_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("🛑 Shutting down");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    if let Err(e) = backup.await {
        warn!("Backup loop ended abnormally: {}", e);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
