use std::sync::Arc;

use findoc_pipeline::{CrewPipeline, PipelineConfig};
use findoc_worker::{Worker, WorkerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "findoc_worker=debug,findoc_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env();
    let pipeline_config = PipelineConfig::from_env();
    tracing::info!(worker = %config.name, "Loaded worker configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = findoc_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    findoc_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection pool created");

    // --- Pipeline ---
    let pipeline = CrewPipeline::new(&pipeline_config).expect("Failed to build analysis pipeline");

    // --- Run ---
    let cancel = CancellationToken::new();
    let worker = Worker::new(pool, Arc::new(pipeline), config);
    let handle = tokio::spawn(worker.run(cancel.clone()));

    shutdown_signal().await;
    cancel.cancel();

    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Worker task ended abnormally");
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
