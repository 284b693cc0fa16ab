//! Maintenance endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        maintenance::{
            CreateMaintenance, CreateMaintenanceType, EquipmentFrequency, KindStat, Maintenance,
            MaintenanceDetail, MaintenanceQuery, MaintenanceType, MonthlyCost, StatusStat,
            UpdateMaintenance,
        },
        user::Role,
    },
};

use super::AuthenticatedUser;

/// Create a maintenance type
#[utoipa::path(
    post,
    path = "/types",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceType,
    responses(
        (status = 201, description = "Type created", body = MaintenanceType),
        (status = 409, description = "Type already exists")
    )
)]
pub async fn create_type(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateMaintenanceType>,
) -> AppResult<(StatusCode, Json<MaintenanceType>)> {
    claims.require_role(&[Role::Admin, Role::Technician])?;
    data.validate()?;

    let kind = state.services.maintenance.create_type(&data).await?;
    Ok((StatusCode::CREATED, Json(kind)))
}

/// List maintenance types
#[utoipa::path(
    get,
    path = "/types",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "List of types", body = [MaintenanceType]))
)]
pub async fn list_types(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<MaintenanceType>>> {
    let types = state.services.maintenance.list_types().await?;
    Ok(Json(types))
}

/// Create a maintenance record with its parts
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenance,
    responses((status = 201, description = "Record created", body = Maintenance))
)]
pub async fn create_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateMaintenance>,
) -> AppResult<(StatusCode, Json<Maintenance>)> {
    claims.require_role(&[Role::Admin, Role::Technician])?;
    data.validate()?;

    let record = state.services.maintenance.create(&data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// List maintenance records with filters
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(MaintenanceQuery),
    responses((status = 200, description = "List of records", body = [Maintenance]))
)]
pub async fn list_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<MaintenanceQuery>,
) -> AppResult<Json<Vec<Maintenance>>> {
    let records = state.services.maintenance.list(&query).await?;
    Ok(Json(records))
}

/// Get a record with its type and parts
#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Record details", body = MaintenanceDetail),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MaintenanceDetail>> {
    let detail = state.services.maintenance.get_detail(id).await?;
    Ok(Json(detail))
}

/// Update a record
#[utoipa::path(
    put,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    request_body = UpdateMaintenance,
    responses(
        (status = 200, description = "Record updated", body = Maintenance),
        (status = 404, description = "Record not found")
    )
)]
pub async fn update_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateMaintenance>,
) -> AppResult<Json<Maintenance>> {
    claims.require_role(&[Role::Admin, Role::Technician])?;

    let record = state.services.maintenance.update(id, &data).await?;
    Ok(Json(record))
}

/// Delete a record
#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.maintenance.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Maintenance history for one piece of equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/maintenance-history",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses((status = 200, description = "Maintenance history", body = [Maintenance]))
)]
pub async fn equipment_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Maintenance>>> {
    let records = state.services.maintenance.history_for_equipment(id).await?;
    Ok(Json(records))
}

/// Next scheduled maintenance for one piece of equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/next-maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses((status = 200, description = "Next scheduled record, null when none"))
)]
pub async fn next_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Option<Maintenance>>> {
    let next = state.services.maintenance.next_for_equipment(id).await?;
    Ok(Json(next))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UpcomingQuery {
    pub days: Option<u64>,
}

/// Scheduled records within the coming window
#[utoipa::path(
    get,
    path = "/upcoming-maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(UpcomingQuery),
    responses((status = 200, description = "Upcoming records", body = [Maintenance]))
)]
pub async fn upcoming_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<UpcomingQuery>,
) -> AppResult<Json<Vec<Maintenance>>> {
    let records = state
        .services
        .maintenance
        .upcoming(query.days.unwrap_or(30))
        .await?;
    Ok(Json(records))
}

/// Scheduled records whose date has passed
#[utoipa::path(
    get,
    path = "/overdue-maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Overdue records", body = [Maintenance]))
)]
pub async fn overdue_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Maintenance>>> {
    let records = state.services.maintenance.overdue().await?;
    Ok(Json(records))
}

/// Counts and summed cost grouped by type
#[utoipa::path(
    get,
    path = "/stats/by-type",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Stats by type", body = [KindStat]))
)]
pub async fn stats_by_type(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<KindStat>>> {
    let stats = state.services.maintenance.stats_by_kind().await?;
    Ok(Json(stats))
}

/// Counts grouped by status
#[utoipa::path(
    get,
    path = "/stats/by-status",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Stats by status", body = [StatusStat]))
)]
pub async fn stats_by_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<StatusStat>>> {
    let stats = state.services.maintenance.stats_by_status().await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CostsQuery {
    pub year: Option<i32>,
}

/// Completed-work costs grouped by month
#[utoipa::path(
    get,
    path = "/stats/costs-by-month",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(CostsQuery),
    responses((status = 200, description = "Monthly costs", body = [MonthlyCost]))
)]
pub async fn costs_by_month(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<CostsQuery>,
) -> AppResult<Json<Vec<MonthlyCost>>> {
    use chrono::Datelike;
    let year = query.year.unwrap_or_else(|| chrono::Utc::now().year());
    let stats = state.services.maintenance.costs_by_month(year).await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FrequencyQuery {
    pub limit: Option<i64>,
}

/// Equipment ranked by maintenance count
#[utoipa::path(
    get,
    path = "/stats/equipment-maintenance-frequency",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(FrequencyQuery),
    responses((status = 200, description = "Maintenance frequency", body = [EquipmentFrequency]))
)]
pub async fn equipment_frequency(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<FrequencyQuery>,
) -> AppResult<Json<Vec<EquipmentFrequency>>> {
    let stats = state
        .services
        .maintenance
        .equipment_frequency(query.limit.unwrap_or(10))
        .await?;
    Ok(Json(stats))
}
