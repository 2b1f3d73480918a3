//! Library catalog administration endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        account::{Actor, Role},
        library::{AssignLibrarian, Author, Book, CreateAuthor, CreateLibrary, Librarian, Library, LibraryDetail, LinkBook},
    },
    permissions::{enforce, Action, HasRole},
    AppState,
};

use super::ApiUser;

fn require_admin(actor: &Actor) -> AppResult<()> {
    enforce(&HasRole(Role::Admin), Some(actor), Action::Write, &())
}

#[utoipa::path(
    get,
    path = "/books/",
    tag = "library",
    responses((status = 200, description = "All books", body = Vec<Book>))
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.library.list_books().await?;
    Ok(Json(books))
}

#[utoipa::path(
    get,
    path = "/authors/",
    tag = "library",
    responses((status = 200, description = "All authors", body = Vec<Author>))
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.library.list_authors().await?;
    Ok(Json(authors))
}

#[utoipa::path(
    post,
    path = "/authors/",
    tag = "library",
    security(("token_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Json(request): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    require_admin(&actor)?;

    let author = state.services.library.create_author(&request).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Books written by an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books/",
    tag = "library",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books by the author", body = Vec<Book>),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_books(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.library.author_books(id).await?;
    Ok(Json(books))
}

/// Delete an author together with their books
#[utoipa::path(
    delete,
    path = "/authors/{id}/",
    tag = "library",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    require_admin(&actor)?;

    state.services.library.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/libraries/",
    tag = "library",
    responses((status = 200, description = "All libraries", body = Vec<Library>))
)]
pub async fn list_libraries(State(state): State<AppState>) -> AppResult<Json<Vec<Library>>> {
    let libraries = state.services.library.list_libraries().await?;
    Ok(Json(libraries))
}

#[utoipa::path(
    post,
    path = "/libraries/",
    tag = "library",
    security(("token_auth" = [])),
    request_body = CreateLibrary,
    responses(
        (status = 201, description = "Library created", body = Library),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_library(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Json(request): Json<CreateLibrary>,
) -> AppResult<(StatusCode, Json<Library>)> {
    require_admin(&actor)?;

    let library = state.services.library.create_library(&request).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// Library with its books and librarian
#[utoipa::path(
    get,
    path = "/libraries/{id}/",
    tag = "library",
    params(("id" = i64, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library detail", body = LibraryDetail),
        (status = 404, description = "Library not found")
    )
)]
pub async fn get_library(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<LibraryDetail>> {
    let detail = state.services.library.library_detail(id).await?;
    Ok(Json(detail))
}

/// Delete a library, its librarian and its book links
#[utoipa::path(
    delete,
    path = "/libraries/{id}/",
    tag = "library",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Library ID")),
    responses(
        (status = 204, description = "Library deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Library not found")
    )
)]
pub async fn delete_library(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    require_admin(&actor)?;

    state.services.library.delete_library(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add an existing book to a library's holdings
#[utoipa::path(
    post,
    path = "/libraries/{id}/books/",
    tag = "library",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Library ID")),
    request_body = LinkBook,
    responses(
        (status = 200, description = "Updated library", body = LibraryDetail),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Library or book not found")
    )
)]
pub async fn link_book(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path(id): Path<i64>,
    Json(request): Json<LinkBook>,
) -> AppResult<Json<LibraryDetail>> {
    require_admin(&actor)?;

    let detail = state.services.library.link_book(id, request.book_id).await?;
    Ok(Json(detail))
}

/// Remove a book from a library's holdings; the book itself stays
#[utoipa::path(
    delete,
    path = "/libraries/{id}/books/{book_id}/",
    tag = "library",
    security(("token_auth" = [])),
    params(
        ("id" = i64, Path, description = "Library ID"),
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Updated library", body = LibraryDetail),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Library not found")
    )
)]
pub async fn unlink_book(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path((id, book_id)): Path<(i64, i64)>,
) -> AppResult<Json<LibraryDetail>> {
    require_admin(&actor)?;

    let detail = state.services.library.unlink_book(id, book_id).await?;
    Ok(Json(detail))
}

/// Assign the library's single librarian, renaming any existing one
#[utoipa::path(
    put,
    path = "/libraries/{id}/librarian/",
    tag = "library",
    security(("token_auth" = [])),
    params(("id" = i64, Path, description = "Library ID")),
    request_body = AssignLibrarian,
    responses(
        (status = 200, description = "Librarian assigned", body = Librarian),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Library not found")
    )
)]
pub async fn assign_librarian(
    State(state): State<AppState>,
    ApiUser(actor): ApiUser,
    Path(id): Path<i64>,
    Json(request): Json<AssignLibrarian>,
) -> AppResult<Json<Librarian>> {
    require_admin(&actor)?;

    let librarian = state.services.library.assign_librarian(id, &request).await?;
    Ok(Json(librarian))
}
