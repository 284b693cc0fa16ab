//! Equipment, category and location endpoints

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
        equipment::{
            CategoryCount, CreateCategory, CreateEquipment, CreateLocation, Equipment,
            EquipmentCategory, EquipmentQuery, Location, LocationCount, LocationHistoryEntry,
            MoveEquipment, StatusCount, UpdateEquipment,
        },
        user::Role,
    },
};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Create an equipment category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = EquipmentCategory),
        (status = 409, description = "Category already exists")
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<EquipmentCategory>)> {
    claims.require_role(&[Role::Admin, Role::Technician])?;
    data.validate()?;

    let category = state.services.equipment.create_category(&data).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(Pagination),
    responses((status = 200, description = "List of categories", body = [EquipmentCategory]))
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<EquipmentCategory>>> {
    let categories = state
        .services
        .equipment
        .list_categories(page.skip.unwrap_or(0), page.limit.unwrap_or(100))
        .await?;
    Ok(Json(categories))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = EquipmentCategory),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipmentCategory>> {
    let category = state.services.equipment.get_category(id).await?;
    Ok(Json(category))
}

/// Create a location
#[utoipa::path(
    post,
    path = "/locations",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateLocation,
    responses((status = 201, description = "Location created", body = Location))
)]
pub async fn create_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    claims.require_role(&[Role::Admin, Role::Technician])?;
    data.validate()?;

    let location = state.services.equipment.create_location(&data).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// List locations
#[utoipa::path(
    get,
    path = "/locations",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(Pagination),
    responses((status = 200, description = "List of locations", body = [Location]))
)]
pub async fn list_locations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Location>>> {
    let locations = state
        .services
        .equipment
        .list_locations(page.skip.unwrap_or(0), page.limit.unwrap_or(100))
        .await?;
    Ok(Json(locations))
}

/// Get a location by ID
#[utoipa::path(
    get,
    path = "/locations/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location details", body = Location),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Location>> {
    let location = state.services.equipment.get_location(id).await?;
    Ok(Json(location))
}

/// Register new equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 409, description = "Asset code already exists")
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_role(&[Role::Admin, Role::Technician])?;
    data.validate()?;

    let equipment = state.services.equipment.create_equipment(&data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// List equipment with filters
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses((status = 200, description = "List of equipment", body = [Equipment]))
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list_equipment(&query).await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_equipment(id).await?;
    Ok(Json(equipment))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_role(&[Role::Admin, Role::Technician])?;

    let equipment = state.services.equipment.update_equipment(id, &data).await?;
    Ok(Json(equipment))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.equipment.delete_equipment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move equipment to another location
#[utoipa::path(
    post,
    path = "/equipment/{id}/move",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = MoveEquipment,
    responses(
        (status = 200, description = "Equipment moved", body = Equipment),
        (status = 404, description = "Equipment or location not found")
    )
)]
pub async fn move_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<MoveEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_role(&[Role::Admin, Role::Technician])?;

    let equipment = state.services.equipment.move_equipment(id, &data).await?;
    Ok(Json(equipment))
}

/// Location history, newest first
#[utoipa::path(
    get,
    path = "/equipment/{id}/history",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Location history", body = [LocationHistoryEntry]),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn location_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<LocationHistoryEntry>>> {
    let history = state.services.equipment.location_history(id).await?;
    Ok(Json(history))
}

/// Equipment counts grouped by status
#[utoipa::path(
    get,
    path = "/stats/by-status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Counts by status", body = [StatusCount]))
)]
pub async fn stats_by_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<StatusCount>>> {
    let stats = state.services.equipment.stats_by_status().await?;
    Ok(Json(stats))
}

/// Equipment counts grouped by category
#[utoipa::path(
    get,
    path = "/stats/by-category",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Counts by category", body = [CategoryCount]))
)]
pub async fn stats_by_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<CategoryCount>>> {
    let stats = state.services.equipment.stats_by_category().await?;
    Ok(Json(stats))
}

/// Equipment counts grouped by location
#[utoipa::path(
    get,
    path = "/stats/by-location",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Counts by location", body = [LocationCount]))
)]
pub async fn stats_by_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LocationCount>>> {
    let stats = state.services.equipment.stats_by_location().await?;
    Ok(Json(stats))
}
