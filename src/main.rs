// Movie Search Service Main Entry Point
// Connects to MongoDB, serves the search API, and closes the connection on SIGINT/SIGTERM
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use movie_search::{
    api::{search_routes, AppState},
    search::{pipelines_for, QueryGateway},
    Database, Lifecycle, SearchConfig,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SearchConfig::from_env().context("Invalid configuration")?;

    let lifecycle = Arc::new(Lifecycle::new());
    lifecycle.begin_connecting()?;

    let database = match Database::connect(&config).await {
        Ok(database) => database,
        Err(e) => {
            error!("✗ MongoDB connection error: {:#}", e);
            lifecycle.mark_closed()?;
            std::process::exit(1);
        }
    };
    lifecycle.mark_ready()?;

    let gateway = QueryGateway::new(database.store(), pipelines_for(&config));
    info!(strategy = gateway.strategy(), "Search pipelines configured");

    let state = web::Data::new(AppState {
        gateway: Arc::new(gateway),
        database: config.database.clone(),
        collection: config.collection_name.clone(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(search_routes)
    })
    .disable_signals()
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("Failed to bind {}", config.server_url()))?
    .run();

    // Stop accepting on signal, let in-flight requests finish, then release the client
    let handle = server.handle();
    let shutdown_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("⏹ Shutting down gracefully...");
        if let Err(e) = shutdown_lifecycle.begin_shutdown() {
            warn!("{}", e);
        }
        handle.stop(true).await;
    });

    info!("🚀 MongoDB Movie Database API started");
    info!("   Server running at {}", config.server_url());
    info!("   Health check: {}/api/health", config.server_url());

    server.await.context("HTTP server failed")?;

    if lifecycle.is_ready() {
        lifecycle.begin_shutdown()?;
    }
    database.close().await;
    lifecycle.mark_closed()?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
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
