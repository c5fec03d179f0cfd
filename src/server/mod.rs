pub mod error;
pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::engine::IngestEngine;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// Shared state behind every request handler.
pub struct AppState<P: Pipeline> {
    pub engine: IngestEngine<P>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

pub fn build_router<P: Pipeline + 'static>(state: Arc<AppState<P>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    // multipart 本身有 framing 開銷，body 上限要比檔案上限再寬一點
    let body_limit = state.max_upload_bytes + 1024 * 1024;

    let logged_routes = Router::new()
        .route("/ingest", post(handlers::ingest::<P>))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

pub async fn serve<P: Pipeline + 'static>(state: Arc<AppState<P>>, addr: &str) -> Result<()> {
    tokio::fs::create_dir_all(&state.upload_dir).await?;

    let app = build_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
