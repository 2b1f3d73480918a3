//! Social API service: posts, comments and the feed

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult, FieldErrors},
    models::{
        account::Actor,
        pagination::{parse_ordering, OrderTerm, PageRequest, Paginated},
        social::{
            search_terms, Comment, CommentQuery, CreateComment, CreatePost, FeedQuery, PatchComment, PatchPost, Post,
            PostQuery, COMMENT_ORDERING, POST_ORDERING,
        },
    },
    repository::{
        social::{CommentFilter, PostFilter},
        Repository,
    },
};

#[derive(Clone)]
pub struct SocialService {
    repository: Repository,
    pagination: PaginationConfig,
}

impl SocialService {
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self { repository, pagination }
    }

    // =========================================================================
    // POSTS
    // =========================================================================

    pub async fn list_posts(&self, query: &PostQuery) -> AppResult<Paginated<Post>> {
        let filter = PostFilter {
            terms: search_terms(query.search.as_deref()),
            author: query.author,
            created_at: parse_timestamp("created_at", query.created_at.as_deref())?,
            ordering: parse_ordering(query.ordering.as_deref(), &POST_ORDERING, OrderTerm::desc("created_at")),
        };
        let page = PageRequest::new(query.page, query.page_size, &self.pagination);

        let (posts, total) = self.repository.social.list_posts(&filter, &page).await?;
        Ok(page.wrap(posts, total))
    }

    pub async fn get_post(&self, id: i64) -> AppResult<Post> {
        self.repository.social.get_post(id).await
    }

    /// The author is bound to the actor; any client-supplied author is ignored
    pub async fn create_post(&self, actor: &Actor, request: &CreatePost) -> AppResult<Post> {
        request.validate()?;
        let title = request.title.as_deref().unwrap_or_default();
        let content = request.content.as_deref().unwrap_or_default();

        let post = self.repository.social.insert_post(actor.id, title, content).await?;
        tracing::info!("Post created: id={} author={}", post.id, actor.username);
        Ok(post)
    }

    /// Full replacement: title and content are both required
    pub async fn replace_post(&self, id: i64, request: &CreatePost) -> AppResult<Post> {
        request.validate()?;
        self.repository
            .social
            .update_post(id, request.title.as_deref(), request.content.as_deref())
            .await
    }

    pub async fn patch_post(&self, id: i64, request: &PatchPost) -> AppResult<Post> {
        request.validate()?;
        self.repository
            .social
            .update_post(id, request.title.as_deref(), request.content.as_deref())
            .await
    }

    pub async fn delete_post(&self, id: i64) -> AppResult<()> {
        self.repository.social.delete_post(id).await?;
        tracing::info!("Post deleted: id={}", id);
        Ok(())
    }

    /// Posts by accounts the actor follows, newest first
    pub async fn feed(&self, actor: &Actor, query: &FeedQuery) -> AppResult<Paginated<Post>> {
        let page = PageRequest::new(query.page, query.page_size, &self.pagination);
        let (posts, total) = self.repository.social.feed(actor.id, &page).await?;
        Ok(page.wrap(posts, total))
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    pub async fn list_comments(&self, query: &CommentQuery) -> AppResult<Paginated<Comment>> {
        let filter = CommentFilter {
            terms: search_terms(query.search.as_deref()),
            post: query.post,
            author: query.author,
            ordering: parse_ordering(query.ordering.as_deref(), &COMMENT_ORDERING, OrderTerm::desc("created_at")),
        };
        let page = PageRequest::new(query.page, query.page_size, &self.pagination);

        let (comments, total) = self.repository.social.list_comments(&filter, &page).await?;
        Ok(page.wrap(comments, total))
    }

    pub async fn get_comment(&self, id: i64) -> AppResult<Comment> {
        self.repository.social.get_comment(id).await
    }

    pub async fn create_comment(&self, actor: &Actor, request: &CreateComment) -> AppResult<Comment> {
        request.validate()?;
        let post_id = request.post.unwrap_or_default();
        self.check_post_reference(post_id).await?;
        let content = request.content.as_deref().unwrap_or_default();

        let comment = self.repository.social.insert_comment(post_id, actor.id, content).await?;
        tracing::info!("Comment created: id={} post={} author={}", comment.id, post_id, actor.username);
        Ok(comment)
    }

    pub async fn replace_comment(&self, id: i64, request: &CreateComment) -> AppResult<Comment> {
        request.validate()?;
        if let Some(post_id) = request.post {
            self.check_post_reference(post_id).await?;
        }
        self.repository
            .social
            .update_comment(id, request.post, request.content.as_deref())
            .await
    }

    pub async fn patch_comment(&self, id: i64, request: &PatchComment) -> AppResult<Comment> {
        request.validate()?;
        if let Some(post_id) = request.post {
            self.check_post_reference(post_id).await?;
        }
        self.repository
            .social
            .update_comment(id, request.post, request.content.as_deref())
            .await
    }

    pub async fn delete_comment(&self, id: i64) -> AppResult<()> {
        self.repository.social.delete_comment(id).await?;
        tracing::info!("Comment deleted: id={}", id);
        Ok(())
    }

    /// A dangling post reference is a field error, not a 404
    async fn check_post_reference(&self, post_id: i64) -> AppResult<()> {
        if self.repository.social.post_exists(post_id).await? {
            return Ok(());
        }
        let mut errors = FieldErrors::new();
        errors.add("post", format!("Invalid pk \"{}\" - object does not exist.", post_id));
        Err(AppError::InvalidFields(errors))
    }
}

/// Optional RFC 3339 filter value; malformed input is a field error
fn parse_timestamp(field: &str, raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(value) => Ok(Some(value.with_timezone(&Utc))),
        Err(_) => {
            let mut errors = FieldErrors::new();
            errors.add(field, "Enter a valid date/time.");
            Err(AppError::InvalidFields(errors))
        }
    }
}
