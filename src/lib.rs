//! Activo IT Asset Management
//!
//! One binary covering the asset-management services: an API gateway and the
//! auth, equipment, provider, maintenance and reports services, selected at
//! startup by the configured role.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
