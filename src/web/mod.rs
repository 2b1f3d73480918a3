//! HTML pages: library catalog, blog and account pages

pub mod auth;
pub mod blog;
pub mod library;

use askama::Template;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{error::AppError, models::account::Actor, AppState};

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub current: Option<Actor>,
    pub status: u16,
    pub reason: String,
    pub message: String,
}

/// Page handler failure: rendered as an HTML error page with the error's status
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(error: AppError) -> Self {
        PageError(error)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        // Anonymous requests are redirected by `SessionUser`, which keeps the
        // `next` target; page handlers only enforce against a signed-in actor.
        if let AppError::Authentication(_) = self.0 {
            return Redirect::to("/login/").into_response();
        }

        let (status, _) = self.0.status();
        let page = ErrorTemplate {
            current: None,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.0.public_message(),
        };
        (status, Html(page)).into_response()
    }
}

pub type PageResult<T = Response> = Result<T, PageError>;

/// Login page URL that returns to `path` afterwards
pub fn login_url(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    format!("/login/?next={}", encoded)
}

/// Only same-site absolute paths are honored as redirect targets
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim)
        .filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

pub fn session_cookie(name: &str, value: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn expired_session_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), String::new())).path("/").build()
}

async fn session_actor(parts: &Parts, state: &AppState) -> Result<Option<Actor>, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);
    match jar.get(&state.config.auth.session_cookie) {
        Some(cookie) => state.services.accounts.actor_from_session(cookie.value()).await,
        None => Ok(None),
    }
}

/// Logged-in page visitor. Anonymous visitors are sent to the login page.
pub struct SessionUser(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match session_actor(parts, state).await {
            Ok(Some(actor)) => Ok(SessionUser(actor)),
            Ok(None) => {
                let path = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                Err(Redirect::to(&login_url(path)).into_response())
            }
            Err(e) => Err(PageError(e).into_response()),
        }
    }
}

/// Page visitor who may be anonymous
pub struct MaybeSessionUser(pub Option<Actor>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeSessionUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        session_actor(parts, state)
            .await
            .map(MaybeSessionUser)
            .map_err(|e| PageError(e).into_response())
    }
}

/// HTML routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Blog
        .route("/", get(blog::post_list))
        .route("/post/new/", get(blog::new_post_page).post(blog::create_post))
        .route("/post/:id/", get(blog::post_detail))
        .route("/post/:id/update/", get(blog::update_post_page).post(blog::update_post))
        .route("/post/:id/delete/", get(blog::delete_post_page).post(blog::delete_post))
        .route("/post/:id/comments/new/", post(blog::create_comment))
        .route(
            "/comment/:id/update/",
            get(blog::update_comment_page).post(blog::update_comment),
        )
        .route("/comment/:id/delete/", post(blog::delete_comment))
        .route("/search/", get(blog::search))
        .route("/tags/:name/", get(blog::tagged_posts))
        // Library
        .route("/books/", get(library::book_list))
        .route("/library/:id/", get(library::library_detail))
        .route("/add_book/", get(library::add_book_page).post(library::add_book))
        .route("/edit_book/:id/", get(library::edit_book_page).post(library::edit_book))
        .route("/delete_book/:id/", post(library::delete_book))
        .route("/admin-dashboard/", get(library::admin_dashboard))
        .route("/librarian-dashboard/", get(library::librarian_dashboard))
        .route("/member-dashboard/", get(library::member_dashboard))
        // Accounts
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/register/", get(auth::register_page).post(auth::register))
        .route("/logout/", post(auth::logout))
        .route("/profile/", get(auth::profile_page).post(auth::update_profile))
}
