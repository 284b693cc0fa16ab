//! Health check and service identity endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::ServiceRole;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Which service role this process runs as
    pub service: String,
    /// Version of the service
    pub version: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<crate::AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.server.role.as_str().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    /// Display name of the running service
    pub service: String,
    pub status: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn for_role(role: ServiceRole) -> Self {
        Self {
            service: role.display_name().to_string(),
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Service identity, served at the root
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    )
)]
pub async fn service_info(State(state): State<crate::AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo::for_role(state.config.server.role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_names_the_running_role() {
        let info = ServiceInfo::for_role(ServiceRole::Auth);
        assert_eq!(info.service, "Auth Service");
        assert_eq!(info.status, "running");

        let info = ServiceInfo::for_role(ServiceRole::Reports);
        assert_eq!(info.service, "Reports Service");
    }
}
