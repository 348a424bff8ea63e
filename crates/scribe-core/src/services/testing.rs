//! Hand-rolled port fakes for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::TimeDelta;
use futures::StreamExt;
use futures::stream;
use uuid::Uuid;

use crate::domain::{Post, PostStatus, User};
use crate::error::RepoError;
use crate::ports::{
    AiError, AuthError, BaseRepository, PasswordService, PostRepository, TextGenerator,
    TextStream, TokenClaims, TokenService, UserRepository,
};

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email".to_string()));
        }
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&user.id) {
            Some(row) => {
                *row = user.clone();
                Ok(user)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryPosts {
    rows: Mutex<HashMap<Uuid, Post>>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemoryPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.rows.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&post.id) {
            Some(row) => {
                *row = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for MemoryPosts {
    async fn list(&self, status: Option<PostStatus>) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(posts)
    }
}

/// Stores `current:<password>`; also accepts `legacy:<password>`.
pub struct FakePasswords;

impl PasswordService for FakePasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("current:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("current:")
            .or_else(|| hash.strip_prefix("legacy:"))
            .is_some_and(|stored| stored == password)
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        !hash.starts_with("current:")
    }
}

/// Tokens are `token:<subject>`; [`FakeTokens::EXPIRED`] is always expired.
pub struct FakeTokens;

impl FakeTokens {
    pub const EXPIRED: &'static str = "expired";
}

impl TokenService for FakeTokens {
    fn generate_token(&self, subject: &str) -> Result<String, AuthError> {
        Ok(format!("token:{subject}"))
    }

    fn generate_token_with_ttl(&self, subject: &str, _ttl: TimeDelta) -> Result<String, AuthError> {
        self.generate_token(subject)
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        if token == Self::EXPIRED {
            return Err(AuthError::TokenExpired);
        }
        let sub = token
            .strip_prefix("token:")
            .ok_or_else(|| AuthError::InvalidToken("malformed".to_string()))?;
        Ok(TokenClaims {
            sub: sub.to_string(),
            exp: 0,
            iat: 0,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        86400
    }
}

enum Script {
    Reply(String),
    Unavailable,
    Fail(u16, String),
}

/// Generator with a canned outcome that records the last prompt it saw.
pub struct ScriptedGenerator {
    script: Script,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedGenerator {
    fn new(script: Script) -> Self {
        Self {
            script,
            last_prompt: Mutex::new(None),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new(Script::Reply(text.to_string()))
    }

    pub fn unavailable() -> Self {
        Self::new(Script::Unavailable)
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self::new(Script::Fail(status, body.to_string()))
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    fn outcome(&self, prompt: &str) -> Result<String, AiError> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Unavailable => Err(AiError::ModelUnavailable),
            Script::Fail(status, body) => Err(AiError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.outcome(prompt)
    }

    async fn generate_stream(&self, prompt: &str) -> Result<TextStream, AiError> {
        self.outcome(prompt)?;
        let events = ["data: {\"n\":1}\n\n", "data: {\"n\":2}\n\n"].map(String::from);
        Ok(stream::iter(events).boxed())
    }
}
