//! Blog models: posts, tags and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::permissions::Owned;

/// Blog post joined with its author's username
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_username: String,
    pub published_date: DateTime<Utc>,
}

impl Owned for BlogPost {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BlogComment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for BlogComment {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

/// Post page with its tags and comments
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: BlogPost,
    pub tags: Vec<Tag>,
    pub comments: Vec<BlogComment>,
}

/// Post with tag names, for listings
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub post: BlogPost,
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 200, message = "Enter a title of at most 200 characters."))]
    pub title: String,
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, message = "This field is required."))]
    pub content: String,
    /// Comma- or space-separated tag names
    #[serde(default)]
    pub tags: String,
}

impl PostForm {
    pub fn tag_names(&self) -> Vec<String> {
        parse_tags(&self.tags)
    }
}

impl From<&PostDetail> for PostForm {
    fn from(detail: &PostDetail) -> Self {
        Self {
            title: detail.post.title.clone(),
            content: detail.post.content.clone(),
            tags: detail
                .tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, message = "This field is required."))]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Split tag input: commas win when present, otherwise whitespace.
/// Names are trimmed, empty ones dropped, duplicates removed in order.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let pieces: Vec<&str> = if raw.contains(',') {
        raw.split(',').collect()
    } else {
        raw.split_whitespace().collect()
    };

    let mut tags: Vec<String> = Vec::new();
    for piece in pieces {
        let name = piece.trim().trim_matches('"').trim();
        if !name.is_empty() && !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }
    tags
}
