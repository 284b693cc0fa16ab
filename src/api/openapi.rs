//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, health, maintenance, providers, reports};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Activo API",
        version = "1.0.0",
        description = "IT Asset Management REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::service_info,
        // Auth
        auth::login,
        auth::register,
        auth::me,
        auth::change_password,
        auth::list_users,
        auth::get_user,
        auth::update_user,
        auth::delete_user,
        auth::verify_token,
        // Equipment
        equipment::create_category,
        equipment::list_categories,
        equipment::get_category,
        equipment::create_location,
        equipment::list_locations,
        equipment::get_location,
        equipment::create_equipment,
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::move_equipment,
        equipment::location_history,
        equipment::stats_by_status,
        equipment::stats_by_category,
        equipment::stats_by_location,
        // Providers
        providers::create_provider,
        providers::list_providers,
        providers::get_provider,
        providers::update_provider,
        providers::delete_provider,
        providers::create_contract,
        providers::list_contracts,
        providers::get_contract,
        providers::update_contract,
        providers::delete_contract,
        providers::purchase_history,
        providers::top_providers,
        // Maintenance
        maintenance::create_type,
        maintenance::list_types,
        maintenance::create_maintenance,
        maintenance::list_maintenance,
        maintenance::get_maintenance,
        maintenance::update_maintenance,
        maintenance::delete_maintenance,
        maintenance::equipment_history,
        maintenance::next_maintenance,
        maintenance::upcoming_maintenance,
        maintenance::overdue_maintenance,
        maintenance::stats_by_type,
        maintenance::stats_by_status,
        maintenance::costs_by_month,
        maintenance::equipment_frequency,
        // Reports
        reports::equipment_excel,
        reports::equipment_pdf,
        reports::maintenance_excel,
        reports::maintenance_pdf,
        reports::dashboard_statistics,
    ),
    components(
        schemas(
            // Users
            crate::models::user::Role,
            crate::models::user::UserProfile,
            crate::models::user::LoginRequest,
            crate::models::user::TokenResponse,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::PasswordChange,
            // Equipment
            crate::models::equipment::EquipmentStatus,
            crate::models::equipment::EquipmentCategory,
            crate::models::equipment::CreateCategory,
            crate::models::equipment::Location,
            crate::models::equipment::CreateLocation,
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::MoveEquipment,
            crate::models::equipment::LocationHistoryEntry,
            crate::models::equipment::StatusCount,
            crate::models::equipment::CategoryCount,
            crate::models::equipment::LocationCount,
            // Providers
            crate::models::provider::ContractStatus,
            crate::models::provider::Provider,
            crate::models::provider::CreateProvider,
            crate::models::provider::UpdateProvider,
            crate::models::provider::Contract,
            crate::models::provider::CreateContract,
            crate::models::provider::UpdateContract,
            crate::models::provider::ProviderWithContracts,
            crate::models::provider::PurchaseHistory,
            crate::models::provider::TopProvider,
            // Maintenance
            crate::models::maintenance::MaintenanceKind,
            crate::models::maintenance::MaintenanceStatus,
            crate::models::maintenance::MaintenanceType,
            crate::models::maintenance::CreateMaintenanceType,
            crate::models::maintenance::Maintenance,
            crate::models::maintenance::MaintenancePart,
            crate::models::maintenance::CreateMaintenancePart,
            crate::models::maintenance::CreateMaintenance,
            crate::models::maintenance::UpdateMaintenance,
            crate::models::maintenance::MaintenanceDetail,
            crate::models::maintenance::KindStat,
            crate::models::maintenance::StatusStat,
            crate::models::maintenance::MonthlyCost,
            crate::models::maintenance::EquipmentFrequency,
            // Reports
            crate::models::report::DashboardStatistics,
            crate::models::report::EquipmentStatusCount,
            crate::models::report::EquipmentCategoryCount,
            crate::models::report::EquipmentLocationCount,
            crate::models::report::MonthlyMaintenanceCost,
            crate::models::report::MaintenanceKindCount,
            crate::models::report::TopProviderEntry,
            // Health
            health::HealthResponse,
            health::ServiceInfo,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and user management"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "providers", description = "Providers and contracts"),
        (name = "maintenance", description = "Maintenance scheduling"),
        (name = "reports", description = "Reports and dashboard")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
