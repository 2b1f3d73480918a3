//! Post endpoints and the follow feed

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        pagination::{Paginated, PostPage},
        social::{CreatePost, FeedQuery, PatchPost, Post, PostQuery},
    },
    permissions::{enforce, Action, IsAuthenticatedOrReadOnly, IsOwnerOrReadOnly},
    AppState,
};

use super::{ApiUser, MaybeApiUser};

/// List posts with search, filters, ordering and pagination
#[utoipa::path(
    get,
    path = "/posts/",
    tag = "posts",
    params(PostQuery),
    responses(
        (status = 200, description = "Page of posts", body = PostPage),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    MaybeApiUser(_actor): MaybeApiUser,
    Query(query): Query<PostQuery>,
) -> AppResult<Json<Paginated<Post>>> {
    let page = state.services.social.list_posts(&query).await?;
    Ok(Json(page))
}

/// Create a post authored by the caller
#[utoipa::path(
    post,
    path = "/posts/",
    tag = "posts",
    security(("token_auth" = [])),
    request_body = CreatePost,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Json(request): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = state.services.social.create_post(&actor, &request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/",
    tag = "posts",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    MaybeApiUser(_actor): MaybeApiUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Post>> {
    let post = state.services.social.get_post(id).await?;
    Ok(Json(post))
}

/// Replace title and content (author only)
#[utoipa::path(
    put,
    path = "/posts/{id}/",
    tag = "posts",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Post ID")),
    request_body = CreatePost,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn replace_post(
    State(state): State<AppState>,
    method: Method,
    MaybeApiUser(actor): MaybeApiUser,
    Path(id): Path<i64>,
    Json(request): Json<CreatePost>,
) -> AppResult<Json<Post>> {
    let post = state.services.social.get_post(id).await?;
    enforce(
        &(IsAuthenticatedOrReadOnly, IsOwnerOrReadOnly),
        actor.as_ref(),
        Action::from_method(&method),
        &post,
    )?;

    let updated = state.services.social.replace_post(id, &request).await?;
    Ok(Json(updated))
}

/// Partial update (author only)
#[utoipa::path(
    patch,
    path = "/posts/{id}/",
    tag = "posts",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Post ID")),
    request_body = PatchPost,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn patch_post(
    State(state): State<AppState>,
    method: Method,
    MaybeApiUser(actor): MaybeApiUser,
    Path(id): Path<i64>,
    Json(request): Json<PatchPost>,
) -> AppResult<Json<Post>> {
    let post = state.services.social.get_post(id).await?;
    enforce(
        &(IsAuthenticatedOrReadOnly, IsOwnerOrReadOnly),
        actor.as_ref(),
        Action::from_method(&method),
        &post,
    )?;

    let updated = state.services.social.patch_post(id, &request).await?;
    Ok(Json(updated))
}

/// Delete a post and its comments (author only)
#[utoipa::path(
    delete,
    path = "/posts/{id}/",
    tag = "posts",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    method: Method,
    MaybeApiUser(actor): MaybeApiUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let post = state.services.social.get_post(id).await?;
    enforce(
        &(IsAuthenticatedOrReadOnly, IsOwnerOrReadOnly),
        actor.as_ref(),
        Action::from_method(&method),
        &post,
    )?;

    state.services.social.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Posts by accounts the caller follows, newest first
#[utoipa::path(
    get,
    path = "/feed/",
    tag = "posts",
    security(("token_auth" = [])),
    params(FeedQuery),
    responses(
        (status = 200, description = "Page of posts", body = PostPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn feed(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Paginated<Post>>> {
    let page = state.services.social.feed(&actor, &query).await?;
    Ok(Json(page))
}
