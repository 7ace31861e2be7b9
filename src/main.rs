use anyhow::{Context, Result};
use dotenv::dotenv;

use std::sync::Arc;

use clickvault::{api, config::Config, gamedb::GameDb};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the logger reads RUST_LOG
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    // Initialize database
    let db = Arc::new(
        GameDb::open(&config.db_path)
            .with_context(|| format!("Could not open database at {}", config.db_path.display()))?,
    );
    log::info!("Database ready with {} saved players.", db.count_players()?);

    if !config.frontend_dir.join("index.html").is_file() {
        log::warn!("No index.html in {}; the client will not be served.",
                   config.frontend_dir.display());
    }

    let app = api::router(Arc::clone(&db), &config.frontend_dir);

    let bind_addr = config.bind_addr().await?;
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Could not bind {bind_addr}"))?;
    log::info!("Server running: http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Every connection has drained, so this is the last handle.
    log::info!("Shutting down.");
    match Arc::try_unwrap(db) {
        Ok(db) => db.close().context("Could not close database")?,
        Err(_) => log::warn!("Database still in use at shutdown; leaving it to drop."),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Could not listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
