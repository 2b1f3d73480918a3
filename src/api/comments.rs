//! Comment endpoints

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        pagination::{CommentPage, Paginated},
        social::{Comment, CommentQuery, CreateComment, PatchComment},
    },
    permissions::{enforce, Action, IsAuthenticatedOrReadOnly, IsOwnerOrReadOnly},
    AppState,
};

use super::{ApiUser, MaybeApiUser};

#[utoipa::path(
    get,
    path = "/comments/",
    tag = "comments",
    params(CommentQuery),
    responses(
        (status = 200, description = "Page of comments", body = CommentPage)
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    MaybeApiUser(_actor): MaybeApiUser,
    Query(query): Query<CommentQuery>,
) -> AppResult<Json<Paginated<Comment>>> {
    let page = state.services.social.list_comments(&query).await?;
    Ok(Json(page))
}

/// Comment on an existing post
#[utoipa::path(
    post,
    path = "/comments/",
    tag = "comments",
    security(("token_auth" = [])),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Invalid fields or unknown post"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Json(request): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment = state.services.social.create_comment(&actor, &request).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    get,
    path = "/comments/{id}/",
    tag = "comments",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn get_comment(
    State(state): State<AppState>,
    MaybeApiUser(_actor): MaybeApiUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Comment>> {
    let comment = state.services.social.get_comment(id).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    put,
    path = "/comments/{id}/",
    tag = "comments",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn replace_comment(
    State(state): State<AppState>,
    method: Method,
    MaybeApiUser(actor): MaybeApiUser,
    Path(id): Path<i64>,
    Json(request): Json<CreateComment>,
) -> AppResult<Json<Comment>> {
    let comment = state.services.social.get_comment(id).await?;
    enforce(
        &(IsAuthenticatedOrReadOnly, IsOwnerOrReadOnly),
        actor.as_ref(),
        Action::from_method(&method),
        &comment,
    )?;

    let updated = state.services.social.replace_comment(id, &request).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    patch,
    path = "/comments/{id}/",
    tag = "comments",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = PatchComment,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn patch_comment(
    State(state): State<AppState>,
    method: Method,
    MaybeApiUser(actor): MaybeApiUser,
    Path(id): Path<i64>,
    Json(request): Json<PatchComment>,
) -> AppResult<Json<Comment>> {
    let comment = state.services.social.get_comment(id).await?;
    enforce(
        &(IsAuthenticatedOrReadOnly, IsOwnerOrReadOnly),
        actor.as_ref(),
        Action::from_method(&method),
        &comment,
    )?;

    let updated = state.services.social.patch_comment(id, &request).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}/",
    tag = "comments",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    method: Method,
    MaybeApiUser(actor): MaybeApiUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let comment = state.services.social.get_comment(id).await?;
    enforce(
        &(IsAuthenticatedOrReadOnly, IsOwnerOrReadOnly),
        actor.as_ref(),
        Action::from_method(&method),
        &comment,
    )?;

    state.services.social.delete_comment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
