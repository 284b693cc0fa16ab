//! Provider and contract endpoints

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
        provider::{
            Contract, ContractQuery, CreateContract, CreateProvider, Provider, ProviderQuery,
            ProviderWithContracts, PurchaseHistory, TopProvider, UpdateContract, UpdateProvider,
        },
        user::Role,
    },
};

use super::AuthenticatedUser;

/// Register a provider
#[utoipa::path(
    post,
    path = "/providers",
    tag = "providers",
    security(("bearer_auth" = [])),
    request_body = CreateProvider,
    responses(
        (status = 201, description = "Provider created", body = Provider),
        (status = 409, description = "RUC already registered")
    )
)]
pub async fn create_provider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateProvider>,
) -> AppResult<(StatusCode, Json<Provider>)> {
    claims.require_role(&[Role::Admin, Role::Technician])?;
    data.validate()?;

    let provider = state.services.providers.create_provider(&data).await?;
    Ok((StatusCode::CREATED, Json(provider)))
}

/// List providers with filters
#[utoipa::path(
    get,
    path = "/providers",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(ProviderQuery),
    responses((status = 200, description = "List of providers", body = [Provider]))
)]
pub async fn list_providers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ProviderQuery>,
) -> AppResult<Json<Vec<Provider>>> {
    let providers = state.services.providers.list_providers(&query).await?;
    Ok(Json(providers))
}

/// Get a provider with its contracts
#[utoipa::path(
    get,
    path = "/providers/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider details", body = ProviderWithContracts),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn get_provider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ProviderWithContracts>> {
    let provider = state.services.providers.get_provider(id).await?;
    Ok(Json(provider))
}

/// Update a provider
#[utoipa::path(
    put,
    path = "/providers/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Provider ID")),
    request_body = UpdateProvider,
    responses(
        (status = 200, description = "Provider updated", body = Provider),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn update_provider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateProvider>,
) -> AppResult<Json<Provider>> {
    claims.require_role(&[Role::Admin, Role::Technician])?;
    data.validate()?;

    let provider = state.services.providers.update_provider(id, &data).await?;
    Ok(Json(provider))
}

/// Delete a provider; refused while it has active contracts
#[utoipa::path(
    delete,
    path = "/providers/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 204, description = "Provider deleted"),
        (status = 404, description = "Provider not found"),
        (status = 409, description = "Provider has active contracts")
    )
)]
pub async fn delete_provider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.providers.delete_provider(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Register a contract
#[utoipa::path(
    post,
    path = "/contracts",
    tag = "providers",
    security(("bearer_auth" = [])),
    request_body = CreateContract,
    responses(
        (status = 201, description = "Contract created", body = Contract),
        (status = 404, description = "Provider not found"),
        (status = 409, description = "Contract number already exists")
    )
)]
pub async fn create_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<Contract>)> {
    claims.require_role(&[Role::Admin, Role::Technician])?;
    data.validate()?;

    let contract = state.services.providers.create_contract(&data).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// List contracts with filters
#[utoipa::path(
    get,
    path = "/contracts",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(ContractQuery),
    responses((status = 200, description = "List of contracts", body = [Contract]))
)]
pub async fn list_contracts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ContractQuery>,
) -> AppResult<Json<Vec<Contract>>> {
    let contracts = state.services.providers.list_contracts(&query).await?;
    Ok(Json(contracts))
}

/// Get a contract by ID
#[utoipa::path(
    get,
    path = "/contracts/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract details", body = Contract),
        (status = 404, description = "Contract not found")
    )
)]
pub async fn get_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Contract>> {
    let contract = state.services.providers.get_contract(id).await?;
    Ok(Json(contract))
}

/// Update a contract
#[utoipa::path(
    put,
    path = "/contracts/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Contract ID")),
    request_body = UpdateContract,
    responses(
        (status = 200, description = "Contract updated", body = Contract),
        (status = 404, description = "Contract not found")
    )
)]
pub async fn update_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateContract>,
) -> AppResult<Json<Contract>> {
    claims.require_role(&[Role::Admin, Role::Technician])?;

    let contract = state.services.providers.update_contract(id, &data).await?;
    Ok(Json(contract))
}

/// Delete a contract
#[utoipa::path(
    delete,
    path = "/contracts/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Contract ID")),
    responses(
        (status = 204, description = "Contract deleted"),
        (status = 404, description = "Contract not found")
    )
)]
pub async fn delete_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.providers.delete_contract(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Contract roll-up for one provider
#[utoipa::path(
    get,
    path = "/providers/{id}/purchase-history",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Purchase history", body = PurchaseHistory),
        (status = 404, description = "Provider not found")
    )
)]
pub async fn purchase_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<PurchaseHistory>> {
    let history = state.services.providers.purchase_history(id).await?;
    Ok(Json(history))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TopProvidersQuery {
    pub limit: Option<i64>,
}

/// Providers ranked by contract count
#[utoipa::path(
    get,
    path = "/stats/top-providers",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(TopProvidersQuery),
    responses((status = 200, description = "Top providers", body = [TopProvider]))
)]
pub async fn top_providers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<TopProvidersQuery>,
) -> AppResult<Json<Vec<TopProvider>>> {
    let top = state
        .services
        .providers
        .top_providers(query.limit.unwrap_or(10))
        .await?;
    Ok(Json(top))
}
