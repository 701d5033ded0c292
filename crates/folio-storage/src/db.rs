//! Database operations

use async_trait::async_trait;
use folio_core::{ContentItem, ContentPatch, ContentStore, NewContent};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use tracing::debug;

use crate::models::{ContentRow, encode_tags, now_nanos};
use crate::{Result, StorageError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS portfolio_content (
        id TEXT PRIMARY KEY NOT NULL,
        type TEXT NOT NULL CHECK (type IN ('certificate', 'video', 'website')),
        title TEXT NOT NULL,
        description TEXT,
        media_url TEXT,
        external_link TEXT,
        tags TEXT,
        is_visible INTEGER NOT NULL DEFAULT 1,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_portfolio_content_created ON portfolio_content (created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash TEXT NOT NULL,
        is_admin INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        token_hash TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at INTEGER NOT NULL
    )
    "#,
];

const SELECT_CONTENT: &str = "SELECT id, type, title, description, media_url, external_link, tags, is_visible, created_at, updated_at FROM portfolio_content";

/// Main storage interface
#[derive(Clone)]
pub struct Storage {
    pub(crate) pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the database. `None` uses the platform data directory.
    pub async fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.migrate().await?;
        debug!("Opened database at {}", path.display());
        Ok(storage)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "folio", "folio")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("folio.db"))
    }

    async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn list_content(&self, include_hidden: bool) -> Result<Vec<ContentItem>> {
        let sql = if include_hidden {
            format!("{} ORDER BY created_at DESC, rowid DESC", SELECT_CONTENT)
        } else {
            format!(
                "{} WHERE is_visible = 1 ORDER BY created_at DESC, rowid DESC",
                SELECT_CONTENT
            )
        };

        let rows: Vec<ContentRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(ContentItem::try_from).collect()
    }

    pub async fn get_content(&self, id: &str) -> Result<ContentItem> {
        let row: Option<ContentRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_CONTENT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| StorageError::ContentNotFound(id.to_string()))?
            .try_into()
    }

    pub async fn insert_content(&self, content: &NewContent) -> Result<ContentItem> {
        content
            .validate()
            .map_err(|e| StorageError::Invalid(e.to_string()))?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = now_nanos();

        sqlx::query(
            r#"
            INSERT INTO portfolio_content
                (id, type, title, description, media_url, external_link, tags, is_visible, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(content.content_type.as_str())
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.media_url)
        .bind(&content.external_link)
        .bind(encode_tags(&content.tags)?)
        .bind(content.is_visible)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!("Inserted content {} ({})", id, content.content_type);
        self.get_content(&id).await
    }

    pub async fn update_content(&self, id: &str, patch: &ContentPatch) -> Result<ContentItem> {
        patch
            .validate()
            .map_err(|e| StorageError::Invalid(e.to_string()))?;

        let tags = match &patch.tags {
            Some(tags) => encode_tags(tags)?,
            None => None,
        };

        // Single statement: concurrent writers queue on the write lock, last one wins.
        // Each `CASE WHEN ?` flag separates "clear" from "keep"; updated_at strictly increases.
        let result = sqlx::query(
            r#"
            UPDATE portfolio_content
            SET title = COALESCE(?, title),
                description = CASE WHEN ? THEN ? ELSE description END,
                media_url = CASE WHEN ? THEN ? ELSE media_url END,
                external_link = CASE WHEN ? THEN ? ELSE external_link END,
                tags = CASE WHEN ? THEN ? ELSE tags END,
                is_visible = COALESCE(?, is_visible),
                updated_at = MAX(?, updated_at + 1)
            WHERE id = ?
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .bind(patch.media_url.is_some())
        .bind(patch.media_url.clone().flatten())
        .bind(patch.external_link.is_some())
        .bind(patch.external_link.clone().flatten())
        .bind(patch.tags.is_some())
        .bind(tags)
        .bind(patch.is_visible)
        .bind(now_nanos())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ContentNotFound(id.to_string()));
        }
        self.get_content(id).await
    }

    pub async fn delete_content(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM portfolio_content WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ContentNotFound(id.to_string()));
        }
        debug!("Deleted content {}", id);
        Ok(())
    }
}

#[async_trait]
impl ContentStore for Storage {
    async fn list(&self, include_hidden: bool) -> folio_core::Result<Vec<ContentItem>> {
        Ok(self.list_content(include_hidden).await?)
    }

    async fn get(&self, id: &str) -> folio_core::Result<ContentItem> {
        Ok(self.get_content(id).await?)
    }

    async fn insert(&self, content: &NewContent) -> folio_core::Result<ContentItem> {
        Ok(self.insert_content(content).await?)
    }

    async fn update(&self, id: &str, patch: &ContentPatch) -> folio_core::Result<ContentItem> {
        Ok(self.update_content(id, patch).await?)
    }

    async fn delete(&self, id: &str) -> folio_core::Result<()> {
        Ok(self.delete_content(id).await?)
    }
}
