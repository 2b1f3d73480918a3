//! Data models for Quill

pub mod account;
pub mod blog;
pub mod library;
pub mod pagination;
pub mod social;

// Re-export commonly used types
pub use account::{Account, AccountDetail, Actor, Role, UserProfile};
pub use blog::{BlogComment, BlogPost, PostDetail, Tag};
pub use library::{Author, Book, Librarian, Library, LibraryDetail};
pub use pagination::{PageRequest, Paginated};
pub use social::{Comment, Post};

/// Strip surrounding whitespace from submitted text so blank input fails
/// `length(min = 1)` validation
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// [`trimmed`] for optional fields; pair it with `#[serde(default)]`
pub(crate) fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <Option<String> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()))
}
