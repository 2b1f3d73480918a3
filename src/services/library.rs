//! Library catalog service

use validator::Validate;

use crate::{
    error::AppResult,
    models::library::{
        AssignLibrarian, Author, Book, BookForm, CreateAuthor, CreateLibrary, Librarian, Library, LibraryDetail,
    },
    repository::{library::LibraryRepository, Repository},
};

#[derive(Clone)]
pub struct LibraryService {
    repository: Repository,
}

impl LibraryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.library.list_books().await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.library.get_book(id).await
    }

    /// Create a book, reusing or creating its author by name
    pub async fn add_book(&self, form: &BookForm) -> AppResult<Book> {
        form.validate()?;
        let title = form.title.as_str();
        let author = form.author.as_str();

        let mut tx = self.repository.pool.begin().await?;
        let author_id = LibraryRepository::find_or_create_author(&mut *tx, author).await?;
        let id = LibraryRepository::insert_book(&mut *tx, title, author_id).await?;
        tx.commit().await?;

        tracing::info!("Book created: id={} title={}", id, title);
        self.repository.library.get_book(id).await
    }

    pub async fn edit_book(&self, id: i64, form: &BookForm) -> AppResult<Book> {
        form.validate()?;
        self.repository.library.get_book(id).await?;

        let mut tx = self.repository.pool.begin().await?;
        let author_id = LibraryRepository::find_or_create_author(&mut *tx, &form.author).await?;
        LibraryRepository::update_book(&mut *tx, id, &form.title, author_id).await?;
        tx.commit().await?;

        tracing::info!("Book updated: id={}", id);
        self.repository.library.get_book(id).await
    }

    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.library.delete_book(id).await?;
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.library.list_authors().await
    }

    pub async fn create_author(&self, request: &CreateAuthor) -> AppResult<Author> {
        request.validate()?;
        let author = self.repository.library.create_author(&request.name).await?;
        tracing::info!("Author created: id={} name={}", author.id, author.name);
        Ok(author)
    }

    pub async fn author_books(&self, id: i64) -> AppResult<Vec<Book>> {
        self.repository.library.get_author(id).await?;
        self.repository.library.books_by_author(id).await
    }

    pub async fn delete_author(&self, id: i64) -> AppResult<()> {
        self.repository.library.delete_author(id).await?;
        tracing::info!("Author deleted with their books: id={}", id);
        Ok(())
    }

    // =========================================================================
    // LIBRARIES
    // =========================================================================

    pub async fn list_libraries(&self) -> AppResult<Vec<Library>> {
        self.repository.library.list_libraries().await
    }

    /// Library with its books and librarian
    pub async fn library_detail(&self, id: i64) -> AppResult<LibraryDetail> {
        let library = self.repository.library.get_library(id).await?;
        let books = self.repository.library.library_books(id).await?;
        let librarian = self.repository.library.librarian_for(id).await?;
        Ok(LibraryDetail { library, books, librarian })
    }

    pub async fn create_library(&self, request: &CreateLibrary) -> AppResult<Library> {
        request.validate()?;
        let library = self.repository.library.create_library(&request.name).await?;
        tracing::info!("Library created: id={} name={}", library.id, library.name);
        Ok(library)
    }

    pub async fn delete_library(&self, id: i64) -> AppResult<()> {
        self.repository.library.delete_library(id).await?;
        tracing::info!("Library deleted: id={}", id);
        Ok(())
    }

    pub async fn link_book(&self, library_id: i64, book_id: i64) -> AppResult<LibraryDetail> {
        self.repository.library.get_library(library_id).await?;
        self.repository.library.get_book(book_id).await?;
        self.repository.library.link_book(library_id, book_id).await?;
        self.library_detail(library_id).await
    }

    pub async fn unlink_book(&self, library_id: i64, book_id: i64) -> AppResult<LibraryDetail> {
        self.repository.library.get_library(library_id).await?;
        self.repository.library.unlink_book(library_id, book_id).await?;
        self.library_detail(library_id).await
    }

    pub async fn assign_librarian(&self, library_id: i64, request: &AssignLibrarian) -> AppResult<Librarian> {
        request.validate()?;
        self.repository.library.get_library(library_id).await?;
        let librarian = self
            .repository
            .library
            .assign_librarian(library_id, &request.name)
            .await?;
        tracing::info!("Librarian {} assigned to library {}", librarian.name, library_id);
        Ok(librarian)
    }
}
