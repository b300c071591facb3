// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chat_service::ChatService;
use crate::application::contact_service::ContactService;
use crate::application::dashboard_service::DashboardService;
use crate::application::insight_service::InsightService;
use crate::application::random_source::SeededRandom;
use crate::application::simulation_service::SimulationRuntime;
use crate::infrastructure::config::{load_app_config, load_widgets_config};
use crate::infrastructure::gemini_gateway::GeminiGateway;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    contact_options, get_chat, get_dashboard, get_latest, get_telemetry, get_vision, health_check,
    list_dashboards, post_chat, post_contact, stream_live,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let widgets_config = load_widgets_config()?;

    if app_config.insight.api_key.is_none() {
        tracing::warn!("No insight API key configured; chat replies will use the fallback message");
    }

    // Create gateway (infrastructure layer)
    let insight_timeout = Duration::from_secs(app_config.insight.timeout_secs);
    let gateway = Arc::new(GeminiGateway::new(
        app_config.insight.endpoint.clone(),
        app_config.insight.api_key.clone(),
        insight_timeout,
    )?);

    // Start the simulation; vision gets its own stream derived from the seed
    let seed = app_config.simulation.seed;
    let runtime = SimulationRuntime::start(
        &app_config.simulation,
        SeededRandom::from_config(seed),
        SeededRandom::from_config(seed.map(|s| s.wrapping_add(1))),
    );

    // Create services (application layer)
    let insight_service = InsightService::new(
        gateway,
        app_config.insight.model.clone(),
        app_config.insight.temperature,
        insight_timeout,
    );
    let chat_service = ChatService::new(insight_service, app_config.chat.max_messages);
    let contact_service = ContactService::new(Duration::from_millis(app_config.contact.submit_delay_ms));

    // Create application state
    let state = Arc::new(AppState {
        simulation: runtime.reader(),
        dashboard_service: DashboardService::new(widgets_config),
        chat_service: chat_service.clone(),
        contact_service,
    });

    // Build router (presentation layer)
    // JSON bodies are compressed in the response helpers, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/telemetry", get(get_telemetry))
        .route("/telemetry/latest", get(get_latest))
        .route("/dashboards", get(list_dashboards))
        .route("/dashboards/:id", get(get_dashboard))
        .route("/vision", get(get_vision))
        .route("/live", get(stream_live))
        .route("/chat", get(get_chat).post(post_chat))
        .route("/contact", post(post_contact))
        .route("/contact/options", get(contact_options))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind))?;
    tracing::info!("Starting plant-telemetry-sim on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal(runtime.shutdown_token()))
        .await?;

    // Late insight replies are dropped; timers were cancelled by the signal
    chat_service.close().await;
    runtime.stop().await?;

    Ok(())
}

/// Waits for Ctrl-C, then cancels the simulation so open live streams end
/// and the server can drain.
async fn shutdown_signal(simulation: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    simulation.cancel();
}
