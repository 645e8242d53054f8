use axum::{
    extract::Request,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use crate::handlers::{dashboard, health, sessions};
use crate::services::DashboardService;

pub fn create_router(service: DashboardService) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/options", get(sessions::options))
        .route("/api/v1/sessions", post(sessions::create))
        .route("/api/v1/sessions/{id}", delete(sessions::delete))
        .route("/api/v1/sessions/{id}/dashboard", get(dashboard::dashboard))
        .route("/api/v1/sessions/{id}/map", get(dashboard::map))
        .route("/api/v1/sessions/{id}/chart", get(dashboard::chart))
        .route("/api/v1/sessions/{id}/summary", get(dashboard::summary))
        .route("/api/v1/sessions/{id}/export", get(dashboard::export));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(
                            Level::INFO,
                            status = response.status().as_u16(),
                            latency = ?latency,
                            "request completed"
                        );
                    },
                ),
        )
}
