//! Top-level router: routes plus the middleware stack.

use axum::routing::get;
use axum::Router;
use http::{header, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;

use super::health::health;
use super::payment::payment_routes;
use super::state::AppState;
use super::webhook::webhook_routes;

/// Preflight cache lifetime in seconds.
const CORS_MAX_AGE_SECS: u64 = 3600;

/// Build the complete application router.
///
/// # Routes
/// - `POST /api/webhooks/stripe`
/// - `POST /api/create-payment-intent`
/// - `GET /api/payment-status/:payment_intent_id`
/// - `POST /api/create-subscription`
/// - `POST /api/cancel-subscription`
/// - `GET /health`
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TimeoutLayer::new(server.request_timeout()));

    let api = Router::new()
        .merge(payment_routes())
        .nest("/webhooks", webhook_routes());

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .layer(middleware)
        .with_state(state)
}

/// CORS for the configured browser origins.
///
/// Origins that are not valid header values are skipped; config validation
/// rejects them before the server starts.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(CORS_MAX_AGE_SECS))
}
