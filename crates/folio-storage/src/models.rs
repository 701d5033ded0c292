use folio_core::{ContentItem, ContentType, User};
use time::OffsetDateTime;

use crate::{Result, StorageError};

/// Raw `portfolio_content` row
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ContentRow {
    pub id: String,
    #[sqlx(rename = "type")]
    pub content_type: String,
    pub title: String,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub external_link: Option<String>,
    pub tags: Option<String>,
    pub is_visible: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TryFrom<ContentRow> for ContentItem {
    type Error = StorageError;

    fn try_from(row: ContentRow) -> Result<Self> {
        let corrupt = |reason: String| StorageError::CorruptRecord {
            id: row.id.clone(),
            reason,
        };

        let content_type: ContentType = row
            .content_type
            .parse()
            .map_err(|e: folio_core::CoreError| corrupt(e.to_string()))?;
        let tags = match row.tags.as_deref() {
            Some(json) => Some(
                serde_json::from_str::<Vec<String>>(json).map_err(|e| corrupt(e.to_string()))?,
            ),
            None => None,
        };
        let created_at = from_nanos(row.created_at).map_err(|e| corrupt(e.to_string()))?;
        let updated_at = from_nanos(row.updated_at).map_err(|e| corrupt(e.to_string()))?;

        Ok(ContentItem {
            id: row.id,
            content_type,
            title: row.title,
            description: row.description,
            media_url: row.media_url,
            external_link: row.external_link,
            tags,
            is_visible: row.is_visible,
            created_at,
            updated_at,
        })
    }
}

/// Raw `users` row
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: i64,
}

impl UserRow {
    pub fn to_user(&self) -> Result<User> {
        Ok(User {
            id: self.id.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            created_at: from_nanos(self.created_at)?,
        })
    }
}

pub(crate) fn now_nanos() -> i64 {
    // i64 nanoseconds cover dates up to 2262
    OffsetDateTime::now_utc().unix_timestamp_nanos() as i64
}

pub(crate) fn from_nanos(nanos: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(nanos as i128)
        .map_err(|e| StorageError::Invalid(format!("timestamp out of range: {}", e)))
}

pub(crate) fn encode_tags(tags: &Option<Vec<String>>) -> Result<Option<String>> {
    Ok(match tags {
        Some(tags) => Some(serde_json::to_string(tags)?),
        None => None,
    })
}
