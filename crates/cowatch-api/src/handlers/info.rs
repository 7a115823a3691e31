use crate::constants::API_VERSION;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub api_version: String,
    pub docs: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub api_version: String,
    pub environment: String,
    pub storage_backend: String,
    pub metadata_backend: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "info",
    responses((status = 200, description = "Service information", body = ServiceInfo))
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "cowatch-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_version: API_VERSION.to_string(),
        docs: "/docs".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "info",
    responses((status = 200, description = "API status", body = StatusResponse))
)]
pub async fn api_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        api_version: API_VERSION.to_string(),
        environment: state.config.environment().to_string(),
        storage_backend: state.storage.backend_type().to_string(),
        metadata_backend: state.repository.backend_name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}
