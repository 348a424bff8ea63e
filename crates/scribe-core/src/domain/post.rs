use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to posts created without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Publication workflow state. The only transition is draft -> published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// Post entity - a blog post whose body is opaque editor state.
///
/// `content` is whatever the editor serialized; it is stored and returned
/// verbatim and never inspected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub content: Option<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update: `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Post {
    /// Create a new draft. A missing or empty title becomes [`DEFAULT_TITLE`].
    pub fn new(user_id: Option<Uuid>, title: Option<String>, content: Option<String>) -> Self {
        let now = Utc::now();
        let title = title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and refresh `updated_at`.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = Some(content);
        }
        self.touch();
    }

    /// Mark the post as published. Publishing twice is a no-op on status.
    pub fn publish(&mut self) {
        self.status = PostStatus::Published;
        self.touch();
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    // Clock skew must never put updated_at before created_at.
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}
