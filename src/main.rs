//! Activo - IT Asset Management services
//!
//! One binary, several roles: the configured role decides which service this
//! process becomes.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use activo_server::{
    api,
    config::{AppConfig, ServiceRole},
    gateway,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("activo_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let role = config.server.role;
    tracing::info!(
        "Starting Activo {} service v{}",
        role.as_str(),
        env!("CARGO_PKG_VERSION")
    );

    let addr = SocketAddr::new(
        config.server.host.parse().expect("Invalid host address"),
        config.server.port,
    );

    let app = if role == ServiceRole::Gateway {
        let state = gateway::GatewayState::new(&config.services)
            .expect("Failed to initialize gateway");
        gateway::router(state)
    } else {
        // Wait for the database, then run migrations before serving
        let pool = Repository::connect(&config.database)
            .await
            .expect("Failed to connect to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations");

        tracing::info!("Database migrations completed");

        let repository = Repository::new(pool);
        let services = Services::new(repository, config.auth.clone());

        let state = AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        };
        create_router(state, role)
    };

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router for a database-backed role
fn create_router(state: AppState, role: ServiceRole) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = service_routes(role)
        .route("/", get(api::health::service_info))
        .route("/health", get(api::health::health_check))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// The routes each role serves
fn service_routes(role: ServiceRole) -> Router<AppState> {
    match role {
        ServiceRole::Gateway => unreachable!("gateway uses its own router"),
        ServiceRole::Auth => Router::new()
            .route("/login", post(api::auth::login))
            .route("/register", post(api::auth::register))
            .route("/me", get(api::auth::me))
            .route("/me/password", put(api::auth::change_password))
            .route("/users", get(api::auth::list_users))
            .route("/users/:id", get(api::auth::get_user))
            .route("/users/:id", put(api::auth::update_user))
            .route("/users/:id", delete(api::auth::delete_user))
            .route("/verify-token", post(api::auth::verify_token)),
        ServiceRole::Equipment => Router::new()
            .route("/categories", post(api::equipment::create_category))
            .route("/categories", get(api::equipment::list_categories))
            .route("/categories/:id", get(api::equipment::get_category))
            .route("/locations", post(api::equipment::create_location))
            .route("/locations", get(api::equipment::list_locations))
            .route("/locations/:id", get(api::equipment::get_location))
            .route("/equipment", post(api::equipment::create_equipment))
            .route("/equipment", get(api::equipment::list_equipment))
            .route("/equipment/:id", get(api::equipment::get_equipment))
            .route("/equipment/:id", put(api::equipment::update_equipment))
            .route("/equipment/:id", delete(api::equipment::delete_equipment))
            .route("/equipment/:id/move", post(api::equipment::move_equipment))
            .route("/equipment/:id/history", get(api::equipment::location_history))
            .route("/stats/by-status", get(api::equipment::stats_by_status))
            .route("/stats/by-category", get(api::equipment::stats_by_category))
            .route("/stats/by-location", get(api::equipment::stats_by_location)),
        ServiceRole::Provider => Router::new()
            .route("/providers", post(api::providers::create_provider))
            .route("/providers", get(api::providers::list_providers))
            .route("/providers/:id", get(api::providers::get_provider))
            .route("/providers/:id", put(api::providers::update_provider))
            .route("/providers/:id", delete(api::providers::delete_provider))
            .route(
                "/providers/:id/purchase-history",
                get(api::providers::purchase_history),
            )
            .route("/contracts", post(api::providers::create_contract))
            .route("/contracts", get(api::providers::list_contracts))
            .route("/contracts/:id", get(api::providers::get_contract))
            .route("/contracts/:id", put(api::providers::update_contract))
            .route("/contracts/:id", delete(api::providers::delete_contract))
            .route("/stats/top-providers", get(api::providers::top_providers)),
        ServiceRole::Maintenance => Router::new()
            .route("/types", post(api::maintenance::create_type))
            .route("/types", get(api::maintenance::list_types))
            .route("/maintenance", post(api::maintenance::create_maintenance))
            .route("/maintenance", get(api::maintenance::list_maintenance))
            .route("/maintenance/:id", get(api::maintenance::get_maintenance))
            .route("/maintenance/:id", put(api::maintenance::update_maintenance))
            .route(
                "/maintenance/:id",
                delete(api::maintenance::delete_maintenance),
            )
            .route(
                "/equipment/:id/maintenance-history",
                get(api::maintenance::equipment_history),
            )
            .route(
                "/equipment/:id/next-maintenance",
                get(api::maintenance::next_maintenance),
            )
            .route(
                "/upcoming-maintenance",
                get(api::maintenance::upcoming_maintenance),
            )
            .route(
                "/overdue-maintenance",
                get(api::maintenance::overdue_maintenance),
            )
            .route("/stats/by-type", get(api::maintenance::stats_by_type))
            .route("/stats/by-status", get(api::maintenance::stats_by_status))
            .route("/stats/costs-by-month", get(api::maintenance::costs_by_month))
            .route(
                "/stats/equipment-maintenance-frequency",
                get(api::maintenance::equipment_frequency),
            ),
        ServiceRole::Reports => Router::new()
            .route("/equipment/excel", get(api::reports::equipment_excel))
            .route("/equipment/pdf", get(api::reports::equipment_pdf))
            .route("/maintenance/excel", get(api::reports::maintenance_excel))
            .route("/maintenance/pdf", get(api::reports::maintenance_pdf))
            .route(
                "/dashboard/statistics",
                get(api::reports::dashboard_statistics),
            ),
    }
}
