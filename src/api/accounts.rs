//! Account endpoints: registration, login, profile, follows, roles

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::account::{
        AccountDetail, GrantPermission, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role,
        UpdateAccount, UpdateRole,
    },
    permissions::{enforce, Action, HasRole},
    AppState,
};

use super::ApiUser;

/// Register an account; the response carries its API token
#[utoipa::path(
    post,
    path = "/accounts/register/",
    tag = "accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let created = state.services.accounts.register_api(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Exchange credentials for the account's token
#[utoipa::path(
    post,
    path = "/accounts/login/",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.services.accounts.login_api(&request).await?;
    Ok(Json(response))
}

/// Current account
#[utoipa::path(
    get,
    path = "/accounts/profile/",
    tag = "accounts",
    security(("token_auth" = [])),
    responses(
        (status = 200, description = "Own account", body = AccountDetail),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
) -> AppResult<Json<AccountDetail>> {
    let detail = state.services.accounts.get_detail(actor.id).await?;
    Ok(Json(detail))
}

/// Update own email, bio or picture reference
#[utoipa::path(
    put,
    path = "/accounts/profile/",
    tag = "accounts",
    security(("token_auth" = [])),
    request_body = UpdateAccount,
    responses(
        (status = 200, description = "Account updated", body = AccountDetail),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Json(request): Json<UpdateAccount>,
) -> AppResult<Json<AccountDetail>> {
    let detail = state.services.accounts.update_account(&actor, &request).await?;
    Ok(Json(detail))
}

/// Public account view with follow counts
#[utoipa::path(
    get,
    path = "/accounts/{id}/",
    tag = "accounts",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = AccountDetail),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AccountDetail>> {
    let detail = state.services.accounts.get_detail(id).await?;
    Ok(Json(detail))
}

/// Follow an account (idempotent)
#[utoipa::path(
    post,
    path = "/accounts/follow/{id}/",
    tag = "accounts",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Account to follow")),
    responses(
        (status = 200, description = "Followed account", body = AccountDetail),
        (status = 400, description = "Cannot follow yourself"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn follow(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AccountDetail>> {
    let detail = state.services.accounts.follow(&actor, id).await?;
    Ok(Json(detail))
}

/// Stop following an account (idempotent)
#[utoipa::path(
    post,
    path = "/accounts/unfollow/{id}/",
    tag = "accounts",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Account to unfollow")),
    responses(
        (status = 200, description = "Unfollowed account", body = AccountDetail),
        (status = 404, description = "Account not found")
    )
)]
pub async fn unfollow(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AccountDetail>> {
    let detail = state.services.accounts.unfollow(&actor, id).await?;
    Ok(Json(detail))
}

/// Change an account's role (Admin only)
#[utoipa::path(
    put,
    path = "/accounts/{id}/role/",
    tag = "accounts",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Account ID")),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = AccountDetail),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn set_role(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRole>,
) -> AppResult<Json<AccountDetail>> {
    enforce(&HasRole(Role::Admin), Some(&actor), Action::Write, &())?;

    let detail = state.services.accounts.set_role(id, request.role).await?;
    Ok(Json(detail))
}

/// Grant a capability flag (Admin only)
#[utoipa::path(
    post,
    path = "/accounts/{id}/permissions/",
    tag = "accounts",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Account ID")),
    request_body = GrantPermission,
    responses(
        (status = 200, description = "Flags now held", body = Vec<String>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn grant_permission(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path(id): Path<i64>,
    Json(request): Json<GrantPermission>,
) -> AppResult<Json<Vec<String>>> {
    enforce(&HasRole(Role::Admin), Some(&actor), Action::Write, &())?;

    let codenames = state.services.accounts.grant_permission(id, &request).await?;
    Ok(Json(codenames))
}

/// Revoke a capability flag (Admin only)
#[utoipa::path(
    delete,
    path = "/accounts/{id}/permissions/{codename}/",
    tag = "accounts",
    security(("token_auth" = [])),
    params(
        ("id" = i64, Path, description = "Account ID"),
        ("codename" = String, Path, description = "Capability flag")
    ),
    responses(
        (status = 200, description = "Flags now held", body = Vec<String>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn revoke_permission(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path((id, codename)): Path<(i64, String)>,
) -> AppResult<Json<Vec<String>>> {
    enforce(&HasRole(Role::Admin), Some(&actor), Action::Write, &())?;

    let codenames = state.services.accounts.revoke_permission(id, &codename).await?;
    Ok(Json(codenames))
}
