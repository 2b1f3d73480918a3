//! JSON API handlers and the application router

pub mod accounts;
pub mod comments;
pub mod health;
pub mod library;
pub mod openapi;
pub mod posts;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::account::Actor, web, AppState};

/// Token from `Authorization: Token <key>` or `Authorization: Bearer <key>`.
/// No header yields `None`; a malformed header is rejected.
fn api_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;

    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;
    Ok(Some(token))
}

/// Extractor for an authenticated API caller
pub struct ApiUser(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for ApiUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = api_token(parts)?
            .ok_or_else(|| AppError::Authentication("Authentication credentials were not provided.".to_string()))?;
        let actor = state.services.accounts.actor_from_api_token(token).await?;
        Ok(ApiUser(actor))
    }
}

/// Optional API caller. Anonymous when no header is sent; a bad token is still a 401.
pub struct MaybeApiUser(pub Option<Actor>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeApiUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match api_token(parts)? {
            Some(token) => {
                let actor = state.services.accounts.actor_from_api_token(token).await?;
                Ok(MaybeApiUser(Some(actor)))
            }
            None => Ok(MaybeApiUser(None)),
        }
    }
}

/// Create the application router: JSON API under `/api`, HTML pages at the root
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health & docs
        .route("/health", get(health::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        // Accounts
        .route("/accounts/register/", post(accounts::register))
        .route("/accounts/login/", post(accounts::login))
        .route(
            "/accounts/profile/",
            get(accounts::get_profile).put(accounts::update_profile),
        )
        .route("/accounts/follow/:id/", post(accounts::follow))
        .route("/accounts/unfollow/:id/", post(accounts::unfollow))
        .route("/accounts/:id/", get(accounts::get_account))
        .route("/accounts/:id/role/", put(accounts::set_role))
        .route("/accounts/:id/permissions/", post(accounts::grant_permission))
        .route(
            "/accounts/:id/permissions/:codename/",
            delete(accounts::revoke_permission),
        )
        // Posts
        .route("/posts/", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/:id/",
            get(posts::get_post)
                .put(posts::replace_post)
                .patch(posts::patch_post)
                .delete(posts::delete_post),
        )
        .route("/feed/", get(posts::feed))
        // Comments
        .route("/comments/", get(comments::list_comments).post(comments::create_comment))
        .route(
            "/comments/:id/",
            get(comments::get_comment)
                .put(comments::replace_comment)
                .patch(comments::patch_comment)
                .delete(comments::delete_comment),
        )
        // Library catalog
        .route("/books/", get(library::list_books))
        .route("/authors/", get(library::list_authors).post(library::create_author))
        .route("/authors/:id/", delete(library::delete_author))
        .route("/authors/:id/books/", get(library::author_books))
        .route("/libraries/", get(library::list_libraries).post(library::create_library))
        .route(
            "/libraries/:id/",
            get(library::get_library).delete(library::delete_library),
        )
        .route("/libraries/:id/books/", post(library::link_book))
        .route("/libraries/:id/books/:book_id/", delete(library::unlink_book))
        .route("/libraries/:id/librarian/", put(library::assign_librarian));

    Router::new()
        .nest("/api", api)
        .merge(web::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
