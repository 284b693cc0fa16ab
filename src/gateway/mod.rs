//! API gateway: routes requests to the downstream services

pub mod forward;
pub mod health;

use std::time::Duration;

use axum::{
    routing::{any, get},
    Router,
};
use indexmap::IndexMap;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::ServicesConfig, error::AppError};

/// Forwarding timeout for downstream requests
const FORWARD_TIMEOUT_SECS: u64 = 30;

/// Shared gateway state: one pooled client and the service registry
#[derive(Clone)]
pub struct GatewayState {
    pub client: reqwest::Client,
    /// service name -> base URL, in routing order
    pub registry: IndexMap<String, String>,
}

impl GatewayState {
    pub fn new(services: &ServicesConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FORWARD_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let mut registry = IndexMap::new();
        registry.insert("auth".to_string(), services.auth.clone());
        registry.insert("equipment".to_string(), services.equipment.clone());
        registry.insert("provider".to_string(), services.provider.clone());
        registry.insert("maintenance".to_string(), services.maintenance.clone());
        registry.insert("reports".to_string(), services.reports.clone());

        Ok(Self { client, registry })
    }

    /// Resolve a path segment to a registered base URL. The dashboard calls
    /// the provider service "providers", so that alias is accepted too.
    pub fn resolve(&self, service: &str) -> Option<&str> {
        let canonical = match service {
            "providers" => "provider",
            other => other,
        };
        self.registry.get(canonical).map(String::as_str)
    }
}

/// Build the gateway router
pub fn router(state: GatewayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::gateway_info))
        .route("/health", get(health::gateway_health))
        .route("/api/:service", any(forward::forward_root))
        .route("/api/:service/*path", any(forward::forward_path))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServicesConfig;

    #[test]
    fn resolve_accepts_the_plural_provider_alias() {
        let state = GatewayState::new(&ServicesConfig::default()).unwrap();
        assert_eq!(
            state.resolve("providers"),
            Some("http://provider-service:8003")
        );
        assert_eq!(
            state.resolve("provider"),
            Some("http://provider-service:8003")
        );
    }

    #[test]
    fn resolve_rejects_unknown_services() {
        let state = GatewayState::new(&ServicesConfig::default()).unwrap();
        assert_eq!(state.resolve("billing"), None);
    }
}
