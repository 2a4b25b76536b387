// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::application::pool_service::PoolService;
use crate::application::reading_service::ReadingService;
use crate::application::streaming_service::BalanceStreamService;
use crate::application::treatment_service::TreatmentService;
use crate::infrastructure::config::{load_backend_config, load_dashboard_config, load_dosing_config};
use crate::infrastructure::rest_repository::RestRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    daily_report, health_check, list_pools, list_resorts, log_treatment, record_daily_read,
    record_weekly_read, saturation, stream_balance, treatment_plan, weekly_report,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let backend_config = load_backend_config()?;
    let dosing_config = load_dosing_config()?;
    let dashboard_config = load_dashboard_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(RestRepository::new(
        backend_config.backend.host,
        backend_config.backend.api_key,
    ));

    // Create services (application layer)
    let pool_service = PoolService::new(repository.clone());
    let reading_service = ReadingService::new(repository.clone());
    let treatment_service = TreatmentService::new(repository.clone(), dosing_config.chart());
    let streaming_service = BalanceStreamService::new(repository.clone(), dashboard_config);

    // Create application state
    let state = Arc::new(AppState {
        pool_service,
        reading_service,
        treatment_service,
        streaming_service,
    });

    // Build router (presentation layer)
    // Note: We compress list and stream responses manually, so no
    // CompressionLayer here; it would double-compress the payloads.
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/resorts", get(list_resorts))
        .route("/resorts/:resort_id/pools", get(list_pools))
        .route("/chemistry/saturation", get(saturation))
        .route("/pools/:pool_id/daily-reads", post(record_daily_read))
        .route("/pools/:pool_id/weekly-reads", post(record_weekly_read))
        .route("/pools/:pool_id/treatment-plan", get(treatment_plan))
        .route("/pools/:pool_id/treatments", post(log_treatment))
        .route("/pools/:pool_id/balance", get(stream_balance))
        .route("/reports/daily-reads", get(daily_report))
        .route("/reports/weekly-reads", get(weekly_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    println!("Starting pool-chemistry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
