//! Social API models: posts and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::permissions::Owned;

/// Ordering fields accepted by the post list
pub const POST_ORDERING: [&str; 3] = ["created_at", "updated_at", "title"];
/// Ordering fields accepted by the comment list
pub const COMMENT_ORDERING: [&str; 1] = ["created_at"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Post {
    pub id: i64,
    /// Author account id
    #[serde(rename = "author")]
    pub author_id: i64,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Post {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: i64,
    /// Parent post id
    #[serde(rename = "post")]
    pub post_id: i64,
    /// Author account id
    #[serde(rename = "author")]
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

/// Create or fully replace a post. Any client-supplied author is ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePost {
    #[serde(default, deserialize_with = "crate::models::trimmed_opt")]
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 200, message = "Ensure this field has 1 to 200 characters.")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    #[serde(default, deserialize_with = "crate::models::trimmed_opt")]
    pub content: Option<String>,
}

/// Partial post update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PatchPost {
    #[serde(default, deserialize_with = "crate::models::trimmed_opt")]
    #[validate(length(min = 1, max = 200, message = "Ensure this field has 1 to 200 characters."))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::models::trimmed_opt")]
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub content: Option<String>,
}

/// Create or fully replace a comment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(required(message = "This field is required."))]
    pub post: Option<i64>,
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    #[serde(default, deserialize_with = "crate::models::trimmed_opt")]
    pub content: Option<String>,
}

/// Partial comment update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PatchComment {
    pub post: Option<i64>,
    #[serde(default, deserialize_with = "crate::models::trimmed_opt")]
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub content: Option<String>,
}

/// Post list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PostQuery {
    /// Whitespace-separated terms matched against title, content and author username
    pub search: Option<String>,
    /// Filter by author account id
    pub author: Option<i64>,
    /// Filter by exact creation timestamp (RFC 3339)
    pub created_at: Option<String>,
    /// Comma-separated fields among created_at, updated_at, title; prefix `-` for descending
    pub ordering: Option<String>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Records per page
    pub page_size: Option<i64>,
}

/// Comment list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CommentQuery {
    /// Whitespace-separated terms matched against content and author username
    pub search: Option<String>,
    /// Filter by parent post id
    pub post: Option<i64>,
    /// Filter by author account id
    pub author: Option<i64>,
    /// `created_at` or `-created_at`
    pub ordering: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Feed query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct FeedQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Split a search string into terms
pub fn search_terms(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split_whitespace()
        .map(|t| t.trim_matches(',').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
