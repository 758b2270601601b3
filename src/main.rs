//! Checkout Gateway
//!
//! ## Endpoints
//!
//! - `POST /api/webhooks/stripe` - Stripe webhook handler
//! - `POST /api/create-payment-intent` - Create a one-off payment intent
//! - `GET /api/payment-status/:id` - Payment intent status
//! - `POST /api/create-subscription` - Start a subscription
//! - `POST /api/cancel-subscription` - Cancel a subscription
//! - `GET /health` - Liveness check

use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use checkout_gateway::adapters::{
    build_router, AppState, LoggingEventHandler, StripeConfig, StripePaymentAdapter,
};
use checkout_gateway::config::{AppConfig, LogFormat, ServerConfig};
use checkout_gateway::domain::payment::Currency;
use checkout_gateway::domain::webhook::{ReplayWindow, WebhookGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env)
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config.server)?;

    config.validate().context("invalid configuration")?;
    tracing::info!(
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        "Starting Checkout Gateway"
    );

    // Outbound Stripe client
    let provider = Arc::new(StripePaymentAdapter::new(StripeConfig::from_payment_config(
        &config.payment,
    )));

    // Inbound webhook gateway
    let window = ReplayWindow::new(
        config.payment.webhook_tolerance_secs,
        config.payment.webhook_clock_skew_secs,
    );
    let gateway = Arc::new(WebhookGateway::new(
        SecretString::new(config.payment.stripe_webhook_secret.clone()),
        window,
        Arc::new(LoggingEventHandler::new()),
    ));

    let default_currency = Currency::parse(&config.payment.default_currency)
        .context("invalid default currency")?;
    let state = AppState::new(
        gateway,
        provider,
        default_currency,
        config.payment.stripe_price_id.clone(),
    )
    .with_description_prefix(config.payment.description_prefix.clone())
    .with_placeholder_email_domain(config.payment.placeholder_email_domain.clone());

    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(server: &ServerConfig) -> anyhow::Result<()> {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()?,
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
