//! Blog service: posts with tags, comments, search

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        account::Actor,
        blog::{BlogComment, BlogPost, CommentForm, PostDetail, PostForm, PostSummary},
    },
    repository::{
        blog::{BlogRepository, PostFilter},
        Repository,
    },
};

#[derive(Clone)]
pub struct BlogService {
    repository: Repository,
}

impl BlogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    pub async fn list(&self) -> AppResult<Vec<PostSummary>> {
        self.summaries(&PostFilter::All).await
    }

    /// Blank queries list every post
    pub async fn search(&self, query: &str) -> AppResult<Vec<PostSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list().await;
        }
        self.summaries(&PostFilter::Search(query.to_string())).await
    }

    pub async fn by_tag(&self, name: &str) -> AppResult<Vec<PostSummary>> {
        self.summaries(&PostFilter::Tag(name.trim().to_string())).await
    }

    async fn summaries(&self, filter: &PostFilter) -> AppResult<Vec<PostSummary>> {
        let posts = self.repository.blog.list(filter).await?;
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let mut tags = self.repository.blog.tags_for_posts(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| PostSummary {
                tags: tags.remove(&post.id).unwrap_or_default(),
                post,
            })
            .collect())
    }

    // =========================================================================
    // POSTS
    // =========================================================================

    pub async fn get(&self, id: i64) -> AppResult<BlogPost> {
        self.repository.blog.get(id).await
    }

    /// Post with its tags and comments
    pub async fn detail(&self, id: i64) -> AppResult<PostDetail> {
        let post = self.repository.blog.get(id).await?;
        let tags = self.repository.blog.tags_for(id).await?;
        let comments = self.repository.blog.comments_for(id).await?;
        Ok(PostDetail { post, tags, comments })
    }

    /// The author is always the acting account
    pub async fn create(&self, actor: &Actor, form: &PostForm) -> AppResult<BlogPost> {
        form.validate()?;

        let mut tx = self.repository.pool.begin().await?;
        let id = BlogRepository::insert(&mut *tx, actor.id, &form.title, &form.content).await?;
        BlogRepository::set_tags(&mut *tx, id, &form.tag_names()).await?;
        tx.commit().await?;

        tracing::info!("Blog post created: id={} author={}", id, actor.username);
        self.repository.blog.get(id).await
    }

    /// Replace title, content and tags
    pub async fn update(&self, id: i64, form: &PostForm) -> AppResult<BlogPost> {
        form.validate()?;

        let mut tx = self.repository.pool.begin().await?;
        BlogRepository::update(&mut *tx, id, &form.title, &form.content).await?;
        BlogRepository::set_tags(&mut *tx, id, &form.tag_names()).await?;
        tx.commit().await?;

        tracing::info!("Blog post updated: id={}", id);
        self.repository.blog.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.blog.delete(id).await?;
        tracing::info!("Blog post deleted: id={}", id);
        Ok(())
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    pub async fn get_comment(&self, id: i64) -> AppResult<BlogComment> {
        self.repository.blog.get_comment(id).await
    }

    pub async fn add_comment(&self, post_id: i64, actor: &Actor, form: &CommentForm) -> AppResult<BlogComment> {
        self.repository.blog.get(post_id).await?;
        form.validate()?;

        let id = self
            .repository
            .blog
            .insert_comment(post_id, actor.id, &form.content)
            .await?;
        tracing::info!("Comment {} added to blog post {} by {}", id, post_id, actor.username);
        self.repository.blog.get_comment(id).await
    }

    pub async fn update_comment(&self, id: i64, form: &CommentForm) -> AppResult<BlogComment> {
        form.validate()?;
        self.repository.blog.update_comment(id, &form.content).await?;
        self.repository.blog.get_comment(id).await
    }

    pub async fn delete_comment(&self, id: i64) -> AppResult<()> {
        self.repository.blog.delete_comment(id).await?;
        tracing::info!("Blog comment deleted: id={}", id);
        Ok(())
    }
}
