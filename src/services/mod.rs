//! Business logic services

pub mod auth;
pub mod equipment;
pub mod maintenance;
pub mod providers;
pub mod reports;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub equipment: equipment::EquipmentService,
    pub providers: providers::ProviderService,
    pub maintenance: maintenance::MaintenanceService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            equipment: equipment::EquipmentService::new(repository.clone()),
            providers: providers::ProviderService::new(repository.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone()),
            reports: reports::ReportsService::new(repository),
        }
    }
}
