//! Blog repository: posts, tags and comments

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Row, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        blog::{BlogComment, BlogPost, Tag},
        pagination::like_pattern,
    },
};

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.author_id, a.username AS author_username, p.published_date
    FROM blog_posts p
    JOIN accounts a ON a.id = p.author_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, a.username AS author_username, c.content, c.created_at, c.updated_at
    FROM blog_comments c
    JOIN accounts a ON a.id = c.author_id
"#;

/// Which posts a listing shows
#[derive(Debug, Clone)]
pub enum PostFilter {
    All,
    /// Case-insensitive substring over title, content and tag names
    Search(String),
    /// Tag name, case-insensitive exact match
    Tag(String),
}

#[derive(Clone)]
pub struct BlogRepository {
    pool: Pool<Sqlite>,
}

impl BlogRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // POSTS
    // =========================================================================

    /// Posts newest first; each post appears once
    pub async fn list(&self, filter: &PostFilter) -> AppResult<Vec<BlogPost>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(POST_SELECT);

        match filter {
            PostFilter::All => {}
            PostFilter::Search(term) => {
                let pattern = like_pattern(term);
                builder.push(" WHERE p.title LIKE ");
                builder.push_bind(pattern.clone());
                builder.push(" ESCAPE '\\' OR p.content LIKE ");
                builder.push_bind(pattern.clone());
                builder.push(
                    " ESCAPE '\\' OR EXISTS (SELECT 1 FROM blog_post_tags pt JOIN tags t ON t.id = pt.tag_id \
                     WHERE pt.post_id = p.id AND t.name LIKE ",
                );
                builder.push_bind(pattern);
                builder.push(" ESCAPE '\\')");
            }
            PostFilter::Tag(name) => {
                builder.push(
                    " WHERE EXISTS (SELECT 1 FROM blog_post_tags pt JOIN tags t ON t.id = pt.tag_id \
                     WHERE pt.post_id = p.id AND LOWER(t.name) = LOWER(",
                );
                builder.push_bind(name.clone());
                builder.push("))");
            }
        }

        builder.push(" ORDER BY p.published_date DESC, p.id DESC");

        let posts = builder.build_query_as::<BlogPost>().fetch_all(&self.pool).await?;
        Ok(posts)
    }

    pub async fn get(&self, id: i64) -> AppResult<BlogPost> {
        sqlx::query_as::<_, BlogPost>(&format!("{} WHERE p.id = ?", POST_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))
    }

    pub async fn insert(conn: &mut SqliteConnection, author_id: i64, title: &str, content: &str) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO blog_posts (title, content, author_id, published_date) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(title)
        .bind(content)
        .bind(author_id)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
        Ok(id)
    }

    pub async fn update(conn: &mut SqliteConnection, id: i64, title: &str, content: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE blog_posts SET title = ?, content = ? WHERE id = ?")
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }
        Ok(())
    }

    /// Deleting a post removes its comments and tag links
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }
        Ok(())
    }

    // =========================================================================
    // TAGS
    // =========================================================================

    pub async fn tags_for(&self, post_id: i64) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN blog_post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    /// Tag names keyed by post id
    pub async fn tags_for_posts(&self, post_ids: &[i64]) -> AppResult<HashMap<i64, Vec<String>>> {
        let mut by_post: HashMap<i64, Vec<String>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(by_post);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT pt.post_id, t.name FROM blog_post_tags pt JOIN tags t ON t.id = pt.tag_id WHERE pt.post_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in post_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY t.name");

        let rows = builder.build().fetch_all(&self.pool).await?;
        for row in rows {
            let post_id: i64 = row.get(0);
            let name: String = row.get(1);
            by_post.entry(post_id).or_default().push(name);
        }
        Ok(by_post)
    }

    /// Replace a post's tags, creating unknown tag names
    pub async fn set_tags(conn: &mut SqliteConnection, post_id: i64, names: &[String]) -> AppResult<()> {
        sqlx::query("DELETE FROM blog_post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *conn)
            .await?;

        for name in names {
            sqlx::query("INSERT OR IGNORE INTO tags (name) VALUES (?)")
                .bind(name)
                .execute(&mut *conn)
                .await?;
            let tag_id: i64 = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
                .bind(name)
                .fetch_one(&mut *conn)
                .await?;
            sqlx::query("INSERT OR IGNORE INTO blog_post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// Comments of a post, oldest first
    pub async fn comments_for(&self, post_id: i64) -> AppResult<Vec<BlogComment>> {
        let comments = sqlx::query_as::<_, BlogComment>(&format!(
            "{} WHERE c.post_id = ? ORDER BY c.created_at, c.id",
            COMMENT_SELECT
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    pub async fn get_comment(&self, id: i64) -> AppResult<BlogComment> {
        sqlx::query_as::<_, BlogComment>(&format!("{} WHERE c.id = ?", COMMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))
    }

    pub async fn insert_comment(&self, post_id: i64, author_id: i64, content: &str) -> AppResult<i64> {
        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO blog_comments (post_id, author_id, content, created_at, updated_at)
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
        Ok(id)
    }

    pub async fn update_comment(&self, id: i64, content: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE blog_comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete_comment(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM blog_comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment with id {} not found", id)));
        }
        Ok(())
    }
}
