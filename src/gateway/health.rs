//! Gateway info and aggregated health probes

use std::time::Duration;

use axum::{extract::State, Json};
use indexmap::IndexMap;
use serde::Serialize;

use super::GatewayState;

const PROBE_TIMEOUT_SECS: u64 = 5;

#[derive(Serialize)]
pub struct GatewayInfo {
    pub service: String,
    pub version: String,
    pub services: Vec<String>,
}

#[derive(Serialize)]
pub struct GatewayHealth {
    pub gateway: String,
    pub services: IndexMap<String, String>,
}

/// Gateway name, version and known services
pub async fn gateway_info(State(state): State<GatewayState>) -> Json<GatewayInfo> {
    Json(GatewayInfo {
        service: "Activo API Gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services: state.registry.keys().cloned().collect(),
    })
}

/// Probe every downstream independently; one failure never fails the others
pub async fn gateway_health(State(state): State<GatewayState>) -> Json<GatewayHealth> {
    let mut services = IndexMap::new();
    for (name, base) in &state.registry {
        let url = format!("{}/health", base.trim_end_matches('/'));
        let status = match state
            .client
            .get(&url)
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => "healthy",
            Ok(_) => "unhealthy",
            Err(e) => {
                tracing::warn!("Health probe for {} failed: {}", name, e);
                "unreachable"
            }
        };
        services.insert(name.clone(), status.to_string());
    }

    Json(GatewayHealth {
        gateway: "healthy".to_string(),
        services,
    })
}
