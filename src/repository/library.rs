//! Library catalog repository

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::library::{Author, Book, Librarian, Library},
};

const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, a.name AS author_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

#[derive(Clone)]
pub struct LibraryRepository {
    pool: Pool<Sqlite>,
}

impl LibraryRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    /// All books, each with its author's name
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!("{} ORDER BY b.title, b.id", BOOK_SELECT))
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = ?", BOOK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Reuse the first author with this exact name, or create one
    pub async fn find_or_create_author(conn: &mut SqliteConnection, name: &str) -> AppResult<i64> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM authors WHERE name = ? ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let id: i64 = sqlx::query_scalar("INSERT INTO authors (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
        Ok(id)
    }

    pub async fn insert_book(conn: &mut SqliteConnection, title: &str, author_id: i64) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar("INSERT INTO books (title, author_id) VALUES (?, ?) RETURNING id")
            .bind(title)
            .bind(author_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(id)
    }

    pub async fn update_book(conn: &mut SqliteConnection, id: i64, title: &str, author_id: i64) -> AppResult<()> {
        let result = sqlx::query("UPDATE books SET title = ?, author_id = ? WHERE id = ?")
            .bind(title)
            .bind(author_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    pub async fn get_author(&self, id: i64) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    pub async fn create_author(&self, name: &str) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>("INSERT INTO authors (name) VALUES (?) RETURNING *")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(author)
    }

    /// Deleting an author removes their books
    pub async fn delete_author(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn books_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!("{} WHERE b.author_id = ? ORDER BY b.title, b.id", BOOK_SELECT))
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    // =========================================================================
    // LIBRARIES
    // =========================================================================

    pub async fn list_libraries(&self) -> AppResult<Vec<Library>> {
        let libraries = sqlx::query_as::<_, Library>("SELECT * FROM libraries ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(libraries)
    }

    pub async fn get_library(&self, id: i64) -> AppResult<Library> {
        sqlx::query_as::<_, Library>("SELECT * FROM libraries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library with id {} not found", id)))
    }

    pub async fn create_library(&self, name: &str) -> AppResult<Library> {
        let library = sqlx::query_as::<_, Library>("INSERT INTO libraries (name) VALUES (?) RETURNING *")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(library)
    }

    /// Deleting a library removes its librarian and its book links, not the books
    pub async fn delete_library(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM libraries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Library with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn library_books(&self, library_id: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "{} JOIN library_books lb ON lb.book_id = b.id WHERE lb.library_id = ? ORDER BY b.title, b.id",
            BOOK_SELECT
        ))
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Link a book to a library; linking twice is a no-op
    pub async fn link_book(&self, library_id: i64, book_id: i64) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO library_books (library_id, book_id) VALUES (?, ?)")
            .bind(library_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn unlink_book(&self, library_id: i64, book_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM library_books WHERE library_id = ? AND book_id = ?")
            .bind(library_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // LIBRARIANS
    // =========================================================================

    pub async fn librarian_for(&self, library_id: i64) -> AppResult<Option<Librarian>> {
        let librarian = sqlx::query_as::<_, Librarian>("SELECT * FROM librarians WHERE library_id = ?")
            .bind(library_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(librarian)
    }

    /// A library has at most one librarian; assigning again renames it
    pub async fn assign_librarian(&self, library_id: i64, name: &str) -> AppResult<Librarian> {
        let librarian = sqlx::query_as::<_, Librarian>(
            r#"
            INSERT INTO librarians (name, library_id) VALUES (?, ?)
            ON CONFLICT(library_id) DO UPDATE SET name = excluded.name
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(library_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(librarian)
    }
}
