//! Library catalog models: authors, books, libraries and librarians

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Capability flags guarding book management
pub const CAN_ADD_BOOK: &str = "can_add_book";
pub const CAN_CHANGE_BOOK: &str = "can_change_book";
pub const CAN_DELETE_BOOK: &str = "can_delete_book";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// Book joined with its author's name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub author_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Librarian {
    pub id: i64,
    pub name: String,
    pub library_id: i64,
}

/// Library with its books and librarian
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryDetail {
    pub library: Library,
    pub books: Vec<Book>,
    pub librarian: Option<Librarian>,
}

/// Book page form; the author is found or created by name
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Enter a title of at most 200 characters."))]
    pub title: String,
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Enter an author name of at most 200 characters."))]
    pub author: String,
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_name.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[serde(deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Enter a name of at most 200 characters."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLibrary {
    #[serde(deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Enter a name of at most 200 characters."))]
    pub name: String,
}

/// Attach an existing book to a library
#[derive(Debug, Deserialize, ToSchema)]
pub struct LinkBook {
    pub book_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignLibrarian {
    #[serde(deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Enter a name of at most 200 characters."))]
    pub name: String,
}
