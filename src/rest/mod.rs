use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};

use crate::storage::Storage;

mod handlers;
pub mod models;

use handlers::{
    create_full_occurrence, get_occurrence, health, list_languages, list_occurrences, not_found,
};

pub const API_PREFIX: &str = "/api/v0_0_1";

#[derive(Clone)]
pub struct AppState<S: Storage> {
    pub storage: S,
    pub started_at: std::time::SystemTime,
}

pub fn router<S: Storage + Clone + Send + Sync + 'static>(storage: S) -> Router {
    let state = AppState {
        storage,
        started_at: std::time::SystemTime::now(),
    };

    let api = Router::new()
        .route("/full-occurrence", post(create_full_occurrence::<S>))
        .route("/occurrences", get(list_occurrences::<S>))
        .route("/occurrences/:id", get(get_occurrence::<S>))
        .route("/languages", get(list_languages::<S>));

    Router::new()
        .route("/health", get(health::<S>))
        .nest(API_PREFIX, api)
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    storage: S,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}{}", addr, API_PREFIX);

    let app = router(storage);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
