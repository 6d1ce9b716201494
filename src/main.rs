use std::env;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use eduqa_backend::core::logging;
use eduqa_backend::dataset;
use eduqa_backend::server::router;
use eduqa_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::initialize().await?;
    logging::init(&state.paths);

    // Build the index before binding; a missing or malformed dataset must
    // abort startup rather than serve an empty index.
    let records = dataset::load_dataset(&state.dataset_path)
        .with_context(|| "failed to load QA dataset".to_string())?;
    let indexed = state.engine.build_index(&records).await?;
    state.set_dataset_size(records.len());
    tracing::info!("Dataset ready: {} records indexed", indexed);

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(state.config.server.port);
    let bind_addr = format!("127.0.0.1:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!("Listening on {}", addr);

    let app: Router = router::router(state.clone());
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
