//! Post CRUD operations.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostPatch, PostStatus, User};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Create a draft owned by `owner`, or an anonymous one.
    pub async fn create(
        &self,
        owner: Option<&User>,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Post, DomainError> {
        let post = Post::new(owner.map(|u| u.id), title, content);
        let post = self.posts.insert(post).await?;

        tracing::debug!(post_id = %post.id, anonymous = owner.is_none(), "Post created");
        Ok(post)
    }

    /// List posts, newest update first.
    ///
    /// An unrecognised `status_filter` is ignored rather than rejected.
    pub async fn list(&self, status_filter: Option<&str>) -> Result<Vec<Post>, DomainError> {
        let status = status_filter.filter(|s| !s.is_empty()).and_then(|s| {
            s.parse::<PostStatus>()
                .inspect_err(|e| tracing::debug!(filter = s, "Ignoring status filter: {e}"))
                .ok()
        });

        Ok(self.posts.list(status).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, DomainError> {
        let mut post = self.get(id).await?;
        post.apply(patch);
        self.save(post).await
    }

    pub async fn publish(&self, id: Uuid) -> Result<Post, DomainError> {
        let mut post = self.get(id).await?;
        if post.is_published() {
            tracing::debug!(post_id = %id, "Post already published");
        }
        post.publish();
        self.save(post).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        match self.posts.delete(id).await {
            Ok(()) => {
                tracing::debug!(post_id = %id, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        let id = post.id;
        match self.posts.update(post).await {
            Ok(post) => Ok(post),
            // Deleted between the read and the write.
            Err(RepoError::NotFound) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::NotFound {
        entity_type: "Post",
        id,
    }
}
