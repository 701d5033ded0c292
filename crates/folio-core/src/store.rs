//! Collaborator seams: content table, media bucket, auth

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::content::{ContentItem, ContentPatch, NewContent};
use crate::error::Result;

/// Persistence for content items
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All items, newest first. Hidden items only when `include_hidden`.
    async fn list(&self, include_hidden: bool) -> Result<Vec<ContentItem>>;

    async fn get(&self, id: &str) -> Result<ContentItem>;

    /// Insert and return the stored record with id and timestamps assigned
    async fn insert(&self, content: &NewContent) -> Result<ContentItem>;

    /// Partial update; `ContentNotFound` when the id is unknown
    async fn update(&self, id: &str, patch: &ContentPatch) -> Result<ContentItem>;

    /// Permanent removal; `ContentNotFound` when the id is unknown
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Bucket for uploaded media
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: &[u8]) -> Result<()>;

    fn public_url(&self, path: &str) -> String;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Email/password accounts and bearer sessions
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// New non-admin account. Fails with "User already registered" on a taken email.
    async fn sign_up(&self, credentials: &Credentials) -> Result<User>;

    /// Fails with "Invalid login credentials" on unknown email or wrong password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session>;

    async fn user_for_token(&self, token: &str) -> Result<Option<User>>;

    async fn sign_out(&self, token: &str) -> Result<()>;
}
