//! Login, registration, logout and profile pages

use askama::Template;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    error::{AppError, FieldErrors},
    models::account::{Account, Actor, LoginForm, ProfileForm, RegisterForm},
    AppState,
};

use super::{expired_session_cookie, safe_next, session_cookie, Html, MaybeSessionUser, PageResult, SessionUser};

const AFTER_LOGIN: &str = "/profile/";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current: Option<Actor>,
    pub username: String,
    pub next: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current: Option<Actor>,
    pub username: String,
    pub email: String,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "auth/profile.html")]
pub struct ProfileTemplate {
    pub current: Option<Actor>,
    pub account: Account,
    pub email: String,
    pub errors: FieldErrors,
}

pub async fn login_page(MaybeSessionUser(current): MaybeSessionUser, Query(query): Query<NextQuery>) -> Response {
    Html(LoginTemplate {
        current,
        username: String::new(),
        next: safe_next(query.next.as_deref()).unwrap_or_default().to_string(),
        error: None,
    })
    .into_response()
}

pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> PageResult {
    let next = safe_next(form.next.as_deref()).map(str::to_string);

    match state.services.accounts.authenticate(&form.username, &form.password).await {
        Ok(account) => {
            let token = state.services.accounts.start_session(&account)?;
            let jar = jar.add(session_cookie(&state.config.auth.session_cookie, token));
            let target = next.as_deref().unwrap_or(AFTER_LOGIN);
            Ok((jar, Redirect::to(target)).into_response())
        }
        Err(AppError::Authentication(message)) => Ok(Html(LoginTemplate {
            current: None,
            username: form.username,
            next: next.unwrap_or_default(),
            error: Some(message),
        })
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn register_page(MaybeSessionUser(current): MaybeSessionUser) -> Response {
    Html(RegisterTemplate {
        current,
        username: String::new(),
        email: String::new(),
        errors: FieldErrors::new(),
    })
    .into_response()
}

/// Create the account and its profile, then start a session
pub async fn register(State(state): State<AppState>, jar: CookieJar, Form(form): Form<RegisterForm>) -> PageResult {
    match state.services.accounts.register_page(&form).await {
        Ok(account) => {
            let token = state.services.accounts.start_session(&account)?;
            let jar = jar.add(session_cookie(&state.config.auth.session_cookie, token));
            Ok((jar, Redirect::to(AFTER_LOGIN)).into_response())
        }
        Err(AppError::InvalidFields(errors)) => Ok(Html(RegisterTemplate {
            current: None,
            username: form.username,
            email: form.email,
            errors,
        })
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = jar.remove(expired_session_cookie(&state.config.auth.session_cookie));
    (jar, Redirect::to("/login/")).into_response()
}

pub async fn profile_page(State(state): State<AppState>, SessionUser(actor): SessionUser) -> PageResult {
    let account = state.services.accounts.get_account(actor.id).await?;
    Ok(Html(ProfileTemplate {
        email: account.email.clone(),
        current: Some(actor),
        account,
        errors: FieldErrors::new(),
    })
    .into_response())
}

/// Only the email is editable here
pub async fn update_profile(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Form(form): Form<ProfileForm>,
) -> PageResult {
    match state.services.accounts.update_email(&actor, &form).await {
        Ok(_) => Ok(Redirect::to(AFTER_LOGIN).into_response()),
        Err(AppError::InvalidFields(errors)) => {
            let account = state.services.accounts.get_account(actor.id).await?;
            Ok(Html(ProfileTemplate {
                current: Some(actor),
                account,
                email: form.email,
                errors,
            })
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
