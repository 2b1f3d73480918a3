//! Blog pages: listing, search, tags, posts and comments

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Form,
};

use crate::{
    error::{AppError, FieldErrors},
    models::{
        account::Actor,
        blog::{BlogComment, BlogPost, CommentForm, PostDetail, PostForm, PostSummary, SearchQuery},
    },
    permissions::{enforce, Action, IsOwnerOrReadOnly},
    AppState,
};

use super::{Html, MaybeSessionUser, PageResult, SessionUser};

#[derive(Template)]
#[template(path = "blog/post_list.html")]
pub struct PostListTemplate {
    pub current: Option<Actor>,
    pub heading: String,
    pub query: String,
    pub posts: Vec<PostSummary>,
}

#[derive(Template)]
#[template(path = "blog/post_detail.html")]
pub struct PostDetailTemplate {
    pub current: Option<Actor>,
    pub detail: PostDetail,
    pub form: CommentForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "blog/post_form.html")]
pub struct PostFormTemplate {
    pub current: Option<Actor>,
    pub heading: String,
    pub action: String,
    pub form: PostForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "blog/post_confirm_delete.html")]
pub struct PostDeleteTemplate {
    pub current: Option<Actor>,
    pub post: BlogPost,
}

#[derive(Template)]
#[template(path = "blog/comment_form.html")]
pub struct CommentFormTemplate {
    pub current: Option<Actor>,
    pub comment: BlogComment,
    pub form: CommentForm,
    pub errors: FieldErrors,
}

fn post_url(id: i64) -> String {
    format!("/post/{}/", id)
}

// =============================================================================
// LISTINGS
// =============================================================================

pub async fn post_list(State(state): State<AppState>, MaybeSessionUser(current): MaybeSessionUser) -> PageResult {
    let posts = state.services.blog.list().await?;
    Ok(Html(PostListTemplate {
        current,
        heading: "Latest posts".to_string(),
        query: String::new(),
        posts,
    })
    .into_response())
}

pub async fn search(
    State(state): State<AppState>,
    MaybeSessionUser(current): MaybeSessionUser,
    Query(query): Query<SearchQuery>,
) -> PageResult {
    let posts = state.services.blog.search(&query.q).await?;
    let heading = if query.q.trim().is_empty() {
        "All posts".to_string()
    } else {
        format!("Search results for \"{}\"", query.q.trim())
    };
    Ok(Html(PostListTemplate {
        current,
        heading,
        query: query.q,
        posts,
    })
    .into_response())
}

pub async fn tagged_posts(
    State(state): State<AppState>,
    MaybeSessionUser(current): MaybeSessionUser,
    Path(name): Path<String>,
) -> PageResult {
    let posts = state.services.blog.by_tag(&name).await?;
    Ok(Html(PostListTemplate {
        current,
        heading: format!("Posts tagged \"{}\"", name),
        query: String::new(),
        posts,
    })
    .into_response())
}

// =============================================================================
// POSTS
// =============================================================================

pub async fn post_detail(
    State(state): State<AppState>,
    MaybeSessionUser(current): MaybeSessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    let detail = state.services.blog.detail(id).await?;
    Ok(Html(PostDetailTemplate {
        current,
        detail,
        form: CommentForm::default(),
        errors: FieldErrors::new(),
    })
    .into_response())
}

fn post_form(actor: Actor, heading: &str, action: String, form: PostForm, errors: FieldErrors) -> PageResult {
    Ok(Html(PostFormTemplate {
        current: Some(actor),
        heading: heading.to_string(),
        action,
        form,
        errors,
    })
    .into_response())
}

pub async fn new_post_page(SessionUser(actor): SessionUser) -> PageResult {
    post_form(actor, "New post", "/post/new/".to_string(), PostForm::default(), FieldErrors::new())
}

pub async fn create_post(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Form(form): Form<PostForm>,
) -> PageResult {
    match state.services.blog.create(&actor, &form).await {
        Ok(post) => Ok(Redirect::to(&post_url(post.id)).into_response()),
        Err(AppError::InvalidFields(errors)) => post_form(actor, "New post", "/post/new/".to_string(), form, errors),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_post_page(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    let detail = state.services.blog.detail(id).await?;
    enforce(&IsOwnerOrReadOnly, Some(&actor), Action::Write, &detail.post)?;

    let form = PostForm::from(&detail);
    post_form(actor, "Edit post", format!("/post/{}/update/", id), form, FieldErrors::new())
}

pub async fn update_post(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> PageResult {
    let post = state.services.blog.get(id).await?;
    enforce(&IsOwnerOrReadOnly, Some(&actor), Action::Write, &post)?;

    match state.services.blog.update(id, &form).await {
        Ok(post) => Ok(Redirect::to(&post_url(post.id)).into_response()),
        Err(AppError::InvalidFields(errors)) => {
            post_form(actor, "Edit post", format!("/post/{}/update/", id), form, errors)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_post_page(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    let post = state.services.blog.get(id).await?;
    enforce(&IsOwnerOrReadOnly, Some(&actor), Action::Write, &post)?;

    Ok(Html(PostDeleteTemplate {
        current: Some(actor),
        post,
    })
    .into_response())
}

pub async fn delete_post(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    let post = state.services.blog.get(id).await?;
    enforce(&IsOwnerOrReadOnly, Some(&actor), Action::Write, &post)?;

    state.services.blog.delete(id).await?;
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// COMMENTS
// =============================================================================

/// Invalid submissions re-render the post with the form errors
pub async fn create_comment(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(post_id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> PageResult {
    match state.services.blog.add_comment(post_id, &actor, &form).await {
        Ok(_) => Ok(Redirect::to(&post_url(post_id)).into_response()),
        Err(AppError::InvalidFields(errors)) => {
            let detail = state.services.blog.detail(post_id).await?;
            Ok(Html(PostDetailTemplate {
                current: Some(actor),
                detail,
                form,
                errors,
            })
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_comment_page(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    let comment = state.services.blog.get_comment(id).await?;
    enforce(&IsOwnerOrReadOnly, Some(&actor), Action::Write, &comment)?;

    let form = CommentForm {
        content: comment.content.clone(),
    };
    Ok(Html(CommentFormTemplate {
        current: Some(actor),
        comment,
        form,
        errors: FieldErrors::new(),
    })
    .into_response())
}

pub async fn update_comment(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> PageResult {
    let comment = state.services.blog.get_comment(id).await?;
    enforce(&IsOwnerOrReadOnly, Some(&actor), Action::Write, &comment)?;

    match state.services.blog.update_comment(id, &form).await {
        Ok(updated) => Ok(Redirect::to(&post_url(updated.post_id)).into_response()),
        Err(AppError::InvalidFields(errors)) => Ok(Html(CommentFormTemplate {
            current: Some(actor),
            comment,
            form,
            errors,
        })
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_comment(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    let comment = state.services.blog.get_comment(id).await?;
    enforce(&IsOwnerOrReadOnly, Some(&actor), Action::Write, &comment)?;

    state.services.blog.delete_comment(id).await?;
    Ok(Redirect::to(&post_url(comment.post_id)).into_response())
}
