//! Authentication and user management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{
        CreateUser, LoginRequest, PasswordChange, Role, TokenResponse, UpdateUser, UserProfile,
        UserQuery,
    },
};

use super::AuthenticatedUser;

/// Authenticate with username and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let response = state.services.auth.login(&request).await?;
    Ok(Json(response))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Username or email already registered")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    claims.require_admin()?;
    data.validate()?;

    let user = state.services.auth.register(&data).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Current user's profile, re-fetched from the store
#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = UserProfile),
        (status = 403, description = "Account disabled")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserProfile>> {
    let user = state.services.auth.get_user(claims.user_id).await?;
    if !user.is_active {
        return Err(crate::error::AppError::Authorization(
            "Account is disabled".to_string(),
        ));
    }
    Ok(Json(user.into()))
}

/// Change the current user's password
#[utoipa::path(
    put,
    path = "/me/password",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = PasswordChange,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, description = "Current password incorrect")
    )
)]
pub async fn change_password(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<PasswordChange>,
) -> AppResult<StatusCode> {
    data.validate()?;
    state
        .services
        .auth
        .change_password(claims.user_id, &data)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List users with pagination
#[utoipa::path(
    get,
    path = "/users",
    tag = "auth",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "List of users", body = [UserProfile]),
        (status = 403, description = "Not allowed")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<UserProfile>>> {
    claims.require_role(&[Role::Admin, Role::Technician])?;

    let users = state.services.auth.list_users(&query).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "auth",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<UserProfile>> {
    let user = state.services.auth.get_user(id).await?;
    Ok(Json(user.into()))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "auth",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateUser>,
) -> AppResult<Json<UserProfile>> {
    claims.require_admin()?;
    data.validate()?;

    let user = state.services.auth.update_user(id, &data).await?;
    Ok(Json(user.into()))
}

/// Delete a user (self-deletion rejected)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "auth",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete own account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.auth.delete_user(id, claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Validate a token and return the profile it belongs to
#[utoipa::path(
    post,
    path = "/verify-token",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token is valid", body = UserProfile),
        (status = 401, description = "Token invalid or expired")
    )
)]
pub async fn verify_token(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserProfile>> {
    let user = state.services.auth.get_user(claims.user_id).await?;
    Ok(Json(user.into()))
}
