//! Main entry point for the mammography triage worklist service.
//!
//! Resolves configuration from the environment once at startup, builds the
//! shared services and serves the REST API (with OpenAPI/Swagger UI).

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use report_gateway::ReportClient;
use triage_core::{CoreConfig, QueueService};

/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `REPORT_API_URL`: base URL of the report-generation service
///   (default: "http://localhost:8000/api"; `/report` is appended per call)
/// - `TRIAGE_SEED_DEMO`: truthy to start with the demo worklist instead of
///   an empty queue
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the report service URL is invalid, or
/// - the server address cannot be bound or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("triage_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let report_api_url =
        std::env::var("REPORT_API_URL").unwrap_or_else(|_| "http://localhost:8000/api".into());

    tracing::info!("++ Starting triage REST on {}", addr);
    tracing::info!("++ Report service at {}", report_api_url);

    let cfg = CoreConfig::new(report_api_url)?;

    let queue = if seed_demo_requested() {
        tracing::info!("seeding the demo worklist");
        QueueService::with_cases(triage_core::demo::demo_cases())
    } else {
        QueueService::new()
    };

    let state = AppState {
        queue: Arc::new(queue),
        reports: Arc::new(ReportClient::from_config(&cfg)),
    };

    api_rest::serve(&addr, state).await
}

fn seed_demo_requested() -> bool {
    std::env::var("TRIAGE_SEED_DEMO")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
