use std::{env, net::SocketAddr, time::Duration};
use streak_tracker::{AppState, handlers, router, storage};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

// Day boundaries are re-checked hourly so streaks move even when nobody
// loads the page.
const REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_dir = storage::resolve_data_dir();
    fs::create_dir_all(&data_dir).await?;

    let streaks = storage::load_streaks(&data_dir).await;
    let preferences = storage::load_preferences(&data_dir).await;
    info!("loaded {} streak(s) from {}", streaks.len(), data_dir.display());

    let state = AppState::new(data_dir, streaks, preferences);

    // Catch up on day boundaries crossed while the app was not running.
    handlers::refresh_and_persist(&state).await;

    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            handlers::refresh_and_persist(&sweeper).await;
        }
    });

    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {err}");
    }
}
