//! Library catalog pages and role dashboards

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    Form,
};

use crate::{
    error::{AppError, FieldErrors},
    models::{
        account::{Actor, Role},
        library::{Book, BookForm, LibraryDetail, CAN_ADD_BOOK, CAN_CHANGE_BOOK, CAN_DELETE_BOOK},
    },
    permissions::{enforce, Action, HasPermission, HasRole},
    AppState,
};

use super::{Html, MaybeSessionUser, PageResult, SessionUser};

#[derive(Template)]
#[template(path = "library/book_list.html")]
pub struct BookListTemplate {
    pub current: Option<Actor>,
    pub books: Vec<Book>,
}

#[derive(Template)]
#[template(path = "library/library_detail.html")]
pub struct LibraryDetailTemplate {
    pub current: Option<Actor>,
    pub detail: LibraryDetail,
}

#[derive(Template)]
#[template(path = "library/book_form.html")]
pub struct BookFormTemplate {
    pub current: Option<Actor>,
    pub heading: String,
    pub action: String,
    pub form: BookForm,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "library/dashboard.html")]
pub struct DashboardTemplate {
    pub current: Option<Actor>,
    pub role: Role,
}

pub async fn book_list(State(state): State<AppState>, MaybeSessionUser(current): MaybeSessionUser) -> PageResult {
    let books = state.services.library.list_books().await?;
    Ok(Html(BookListTemplate { current, books }).into_response())
}

pub async fn library_detail(
    State(state): State<AppState>,
    MaybeSessionUser(current): MaybeSessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    let detail = state.services.library.library_detail(id).await?;
    Ok(Html(LibraryDetailTemplate { current, detail }).into_response())
}

fn book_form(actor: Actor, heading: &str, action: String, form: BookForm, errors: FieldErrors) -> PageResult {
    Ok(Html(BookFormTemplate {
        current: Some(actor),
        heading: heading.to_string(),
        action,
        form,
        errors,
    })
    .into_response())
}

pub async fn add_book_page(SessionUser(actor): SessionUser) -> PageResult {
    enforce(&HasPermission(CAN_ADD_BOOK), Some(&actor), Action::Write, &())?;
    book_form(actor, "Add book", "/add_book/".to_string(), BookForm::default(), FieldErrors::new())
}

pub async fn add_book(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Form(form): Form<BookForm>,
) -> PageResult {
    enforce(&HasPermission(CAN_ADD_BOOK), Some(&actor), Action::Write, &())?;

    match state.services.library.add_book(&form).await {
        Ok(_) => Ok(Redirect::to("/books/").into_response()),
        Err(AppError::InvalidFields(errors)) => book_form(actor, "Add book", "/add_book/".to_string(), form, errors),
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_book_page(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    enforce(&HasPermission(CAN_CHANGE_BOOK), Some(&actor), Action::Write, &())?;

    let book = state.services.library.get_book(id).await?;
    book_form(actor, "Edit book", format!("/edit_book/{}/", id), BookForm::from(&book), FieldErrors::new())
}

pub async fn edit_book(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
    Form(form): Form<BookForm>,
) -> PageResult {
    enforce(&HasPermission(CAN_CHANGE_BOOK), Some(&actor), Action::Write, &())?;

    match state.services.library.edit_book(id, &form).await {
        Ok(_) => Ok(Redirect::to("/books/").into_response()),
        Err(AppError::InvalidFields(errors)) => book_form(actor, "Edit book", format!("/edit_book/{}/", id), form, errors),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_book(
    State(state): State<AppState>,
    SessionUser(actor): SessionUser,
    Path(id): Path<i64>,
) -> PageResult {
    enforce(&HasPermission(CAN_DELETE_BOOK), Some(&actor), Action::Write, &())?;

    state.services.library.delete_book(id).await?;
    Ok(Redirect::to("/books/").into_response())
}

fn dashboard(actor: Actor, role: Role) -> PageResult {
    enforce(&HasRole(role), Some(&actor), Action::Read, &())?;
    Ok(Html(DashboardTemplate {
        current: Some(actor),
        role,
    })
    .into_response())
}

pub async fn admin_dashboard(SessionUser(actor): SessionUser) -> PageResult {
    dashboard(actor, Role::Admin)
}

pub async fn librarian_dashboard(SessionUser(actor): SessionUser) -> PageResult {
    dashboard(actor, Role::Librarian)
}

pub async fn member_dashboard(SessionUser(actor): SessionUser) -> PageResult {
    dashboard(actor, Role::Member)
}
