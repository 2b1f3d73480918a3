//! Social API repository: posts, comments and the follow feed

use chrono::{DateTime, Utc};
use sqlx::{Pool, QueryBuilder, Row, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{like_pattern, order_by_clause, OrderTerm, PageRequest},
        social::{Comment, Post},
    },
};

const POST_FROM: &str = " FROM posts p JOIN accounts a ON a.id = p.author_id";
const POST_COLUMNS: &str =
    "SELECT p.id, p.author_id, a.username AS author_username, p.title, p.content, p.created_at, p.updated_at";

const COMMENT_FROM: &str = " FROM comments c JOIN accounts a ON a.id = c.author_id";
const COMMENT_COLUMNS: &str = "SELECT c.id, c.post_id, c.author_id, a.username AS author_username, c.content, c.created_at, c.updated_at";

/// Resolved post list filters
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub terms: Vec<String>,
    pub author: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub ordering: Vec<OrderTerm>,
}

/// Resolved comment list filters
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub terms: Vec<String>,
    pub post: Option<i64>,
    pub author: Option<i64>,
    pub ordering: Vec<OrderTerm>,
}

/// Every term must hit at least one of `columns`
fn push_search<'a>(builder: &mut QueryBuilder<'a, Sqlite>, terms: &[String], columns: &[&str]) {
    for term in terms {
        let pattern = like_pattern(term);
        builder.push(" AND (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder.push(*column);
            builder.push(" LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" ESCAPE '\\'");
        }
        builder.push(")");
    }
}

fn push_post_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &PostFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(author) = filter.author {
        builder.push(" AND p.author_id = ");
        builder.push_bind(author);
    }
    if let Some(created_at) = filter.created_at {
        builder.push(" AND p.created_at = ");
        builder.push_bind(created_at);
    }
    push_search(builder, &filter.terms, &["p.title", "p.content", "a.username"]);
}

fn push_comment_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &CommentFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(post) = filter.post {
        builder.push(" AND c.post_id = ");
        builder.push_bind(post);
    }
    if let Some(author) = filter.author {
        builder.push(" AND c.author_id = ");
        builder.push_bind(author);
    }
    push_search(builder, &filter.terms, &["c.content", "a.username"]);
}

fn push_window<'a>(builder: &mut QueryBuilder<'a, Sqlite>, page: &PageRequest) {
    builder.push(" LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());
}

#[derive(Clone)]
pub struct SocialRepository {
    pool: Pool<Sqlite>,
}

impl SocialRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // POSTS
    // =========================================================================

    /// One page of posts plus the total match count
    pub async fn list_posts(&self, filter: &PostFilter, page: &PageRequest) -> AppResult<(Vec<Post>, i64)> {
        let mut count_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!("SELECT COUNT(*){}", POST_FROM));
        push_post_filters(&mut count_builder, filter);
        let total: i64 = count_builder.build().fetch_one(&self.pool).await?.get(0);

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!("{}{}", POST_COLUMNS, POST_FROM));
        push_post_filters(&mut builder, filter);
        builder.push(" ");
        builder.push(order_by_clause(&filter.ordering, "p"));
        push_window(&mut builder, page);

        let posts = builder.build_query_as::<Post>().fetch_all(&self.pool).await?;
        Ok((posts, total))
    }

    pub async fn get_post(&self, id: i64) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(&format!("{}{} WHERE p.id = ?", POST_COLUMNS, POST_FROM))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))
    }

    pub async fn post_exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn insert_post(&self, author_id: i64, title: &str, content: &str) -> AppResult<Post> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (author_id, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(author_id)
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_post(id).await
    }

    /// Absent fields keep their value; `updated_at` always moves
    pub async fn update_post(&self, id: i64, title: Option<&str>, content: Option<&str>) -> AppResult<Post> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }

        self.get_post(id).await
    }

    /// Deleting a post removes its comments
    pub async fn delete_post(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }
        Ok(())
    }

    /// Posts by accounts `follower_id` follows, newest first
    pub async fn feed(&self, follower_id: i64, page: &PageRequest) -> AppResult<(Vec<Post>, i64)> {
        let followed = " WHERE p.author_id IN (SELECT followed_id FROM follows WHERE follower_id = ?)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*){}{}", POST_FROM, followed))
            .bind(follower_id)
            .fetch_one(&self.pool)
            .await?;

        let posts = sqlx::query_as::<_, Post>(&format!(
            "{}{}{} ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?",
            POST_COLUMNS, POST_FROM, followed
        ))
        .bind(follower_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((posts, total))
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    pub async fn list_comments(&self, filter: &CommentFilter, page: &PageRequest) -> AppResult<(Vec<Comment>, i64)> {
        let mut count_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!("SELECT COUNT(*){}", COMMENT_FROM));
        push_comment_filters(&mut count_builder, filter);
        let total: i64 = count_builder.build().fetch_one(&self.pool).await?.get(0);

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!("{}{}", COMMENT_COLUMNS, COMMENT_FROM));
        push_comment_filters(&mut builder, filter);
        builder.push(" ");
        builder.push(order_by_clause(&filter.ordering, "c"));
        push_window(&mut builder, page);

        let comments = builder.build_query_as::<Comment>().fetch_all(&self.pool).await?;
        Ok((comments, total))
    }

    pub async fn get_comment(&self, id: i64) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(&format!("{}{} WHERE c.id = ?", COMMENT_COLUMNS, COMMENT_FROM))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))
    }

    pub async fn insert_comment(&self, post_id: i64, author_id: i64, content: &str) -> AppResult<Comment> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (post_id, author_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_comment(id).await
    }

    pub async fn update_comment(&self, id: i64, post_id: Option<i64>, content: Option<&str>) -> AppResult<Comment> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET post_id = COALESCE(?, post_id),
                content = COALESCE(?, content),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(post_id)
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment with id {} not found", id)));
        }

        self.get_comment(id).await
    }

    pub async fn delete_comment(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment with id {} not found", id)));
        }
        Ok(())
    }
}
