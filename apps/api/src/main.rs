//! Seatrelay webhook API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use seatrelay_application::RelayService;
use seatrelay_core::AppError;
use seatrelay_infrastructure::HttpLicenseProvisioner;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        license_api_mode = ?config.license_api.mode(),
        license_api_base_url = %config.license_api.base_url(),
        "license API configured"
    );

    let provisioner = Arc::new(HttpLicenseProvisioner::new(
        http_client,
        config.license_api.clone(),
    ));
    let app_state = AppState {
        relay_service: RelayService::new(provisioner),
    };
    let app = api_router::build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "seatrelay-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
