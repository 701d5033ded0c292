//! Email/password accounts and bearer sessions

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use folio_core::{AuthProvider, Credentials, Session, User};
use time::Duration;
use tracing::{debug, info};

use crate::Storage;
use crate::models::{UserRow, now_nanos};
use crate::{Result, StorageError};

/// Sessions older than this no longer resolve to a user
pub const SESSION_TTL: Duration = Duration::days(30);

const USER_COLUMNS: &str = "id, email, password_hash, is_admin, created_at";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Argon2id PHC string; the salt is embedded
async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| StorageError::Other(anyhow::anyhow!("password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| StorageError::Other(e.into()))?
}

async fn verify_password(row: &UserRow, password: String) -> Result<bool> {
    let id = row.id.clone();
    let stored = row.password_hash.clone();
    tokio::task::spawn_blocking(move || -> Result<bool> {
        let parsed = PasswordHash::new(&stored).map_err(|e| StorageError::CorruptRecord {
            id,
            reason: e.to_string(),
        })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| StorageError::Other(e.into()))?
}

fn session_cutoff() -> i64 {
    now_nanos() - SESSION_TTL.whole_nanoseconds() as i64
}

fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

fn new_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

impl Storage {
    async fn find_user(&self, email: &str) -> Result<Option<UserRow>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        Ok(sqlx::query_as(&sql)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn create_user(&self, credentials: &Credentials) -> Result<User> {
        let email = normalize_email(&credentials.email);
        if self.find_user(&email).await?.is_some() {
            return Err(StorageError::UserAlreadyRegistered);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let hash = hash_password(credentials.password.clone()).await?;

        let inserted = sqlx::query(
            "INSERT INTO users (id, email, password_hash, is_admin, created_at) VALUES (?, ?, ?, 0, ?)",
        )
        .bind(&id)
        .bind(&email)
        .bind(&hash)
        .bind(now_nanos())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(StorageError::UserAlreadyRegistered);
            }
            Err(e) => return Err(e.into()),
        }

        info!("Registered user {}", email);
        self.find_user(&email)
            .await?
            .ok_or(StorageError::UserNotFound(email))?
            .to_user()
    }

    pub async fn create_session(&self, credentials: &Credentials) -> Result<Session> {
        let row = self
            .find_user(&credentials.email)
            .await?
            .ok_or(StorageError::InvalidCredentials)?;

        if !verify_password(&row, credentials.password.clone()).await? {
            return Err(StorageError::InvalidCredentials);
        }

        let pruned = sqlx::query("DELETE FROM sessions WHERE created_at <= ?")
            .bind(session_cutoff())
            .execute(&self.pool)
            .await?;
        if pruned.rows_affected() > 0 {
            debug!("Pruned {} expired sessions", pruned.rows_affected());
        }

        let token = new_token();
        sqlx::query("INSERT INTO sessions (token_hash, user_id, created_at) VALUES (?, ?, ?)")
            .bind(hash_token(&token))
            .bind(&row.id)
            .bind(now_nanos())
            .execute(&self.pool)
            .await?;

        debug!("Opened session for {}", row.email);
        Ok(Session {
            token,
            user: row.to_user()?,
        })
    }

    pub async fn session_user(&self, token: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.email, u.password_hash, u.is_admin, u.created_at
            FROM sessions s JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = ? AND s.created_at > ?
            "#,
        )
        .bind(hash_token(token))
        .bind(session_cutoff())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.to_user()).transpose()
    }

    pub async fn delete_session(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Grant or revoke admin access. Managed out of band, never over the API.
    pub async fn set_admin(&self, email: &str, is_admin: bool) -> Result<User> {
        let email = normalize_email(email);
        let result = sqlx::query("UPDATE users SET is_admin = ? WHERE email = ?")
            .bind(is_admin)
            .bind(&email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::UserNotFound(email));
        }
        info!("Set admin={} for {}", is_admin, email);
        self.find_user(&email)
            .await?
            .ok_or(StorageError::UserNotFound(email))?
            .to_user()
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);
        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(UserRow::to_user).collect()
    }
}

#[async_trait]
impl AuthProvider for Storage {
    async fn sign_up(&self, credentials: &Credentials) -> folio_core::Result<User> {
        Ok(self.create_user(credentials).await?)
    }

    async fn sign_in(&self, credentials: &Credentials) -> folio_core::Result<Session> {
        Ok(self.create_session(credentials).await?)
    }

    async fn user_for_token(&self, token: &str) -> folio_core::Result<Option<User>> {
        Ok(self.session_user(token).await?)
    }

    async fn sign_out(&self, token: &str) -> folio_core::Result<()> {
        Ok(self.delete_session(token).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().join("auth.db"))).await.unwrap();
        (dir, storage)
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let (_dir, storage) = create_test_storage().await;

        let user = storage
            .sign_up(&credentials("Admin@Example.com", "hunter22"))
            .await
            .unwrap();
        assert_eq!(user.email, "admin@example.com");
        assert!(!user.is_admin);

        let session = storage
            .sign_in(&credentials("admin@example.com", "hunter22"))
            .await
            .unwrap();
        assert_eq!(session.user.id, user.id);

        let resolved = storage.user_for_token(&session.token).await.unwrap();
        assert_eq!(resolved, Some(user));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up() {
        let (_dir, storage) = create_test_storage().await;

        storage
            .sign_up(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();
        let err = storage
            .sign_up(&credentials("BOB@x.com", "other1"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("User already registered"));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let (_dir, storage) = create_test_storage().await;

        storage
            .sign_up(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();

        let err = storage
            .sign_in(&credentials("bob@x.com", "abc124"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid login credentials"));

        let err = storage
            .sign_in(&credentials("eve@x.com", "abc123"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_sign_out_drops_session() {
        let (_dir, storage) = create_test_storage().await;

        storage
            .sign_up(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();
        let session = storage
            .sign_in(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();

        storage.sign_out(&session.token).await.unwrap();
        assert_eq!(storage.user_for_token(&session.token).await.unwrap(), None);
        // Idempotent
        storage.sign_out(&session.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_password_stored_as_argon2() {
        let (_dir, storage) = create_test_storage().await;

        storage
            .sign_up(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();
        let row = storage.find_user("bob@x.com").await.unwrap().unwrap();
        assert!(row.password_hash.starts_with("$argon2id$"));
        assert!(!row.password_hash.contains("abc123"));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_pruned() {
        let (_dir, storage) = create_test_storage().await;

        storage
            .sign_up(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();
        let stale = storage
            .sign_in(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();

        let expired_at = now_nanos() - SESSION_TTL.whole_nanoseconds() as i64 - 1;
        sqlx::query("UPDATE sessions SET created_at = ? WHERE token_hash = ?")
            .bind(expired_at)
            .bind(hash_token(&stale.token))
            .execute(&storage.pool)
            .await
            .unwrap();
        assert_eq!(storage.user_for_token(&stale.token).await.unwrap(), None);

        // The next sign-in sweeps it
        let fresh = storage
            .sign_in(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();
        let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&storage.pool)
            .await
            .unwrap();
        assert_eq!(remaining, 1);
        assert!(storage.user_for_token(&fresh.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_set_admin() {
        let (_dir, storage) = create_test_storage().await;

        storage
            .sign_up(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();
        let session = storage
            .sign_in(&credentials("bob@x.com", "abc123"))
            .await
            .unwrap();

        let user = storage.set_admin("bob@x.com", true).await.unwrap();
        assert!(user.is_admin);
        let resolved = storage.session_user(&session.token).await.unwrap().unwrap();
        assert!(resolved.is_admin);

        assert!(matches!(
            storage.set_admin("nobody@x.com", true).await,
            Err(StorageError::UserNotFound(_))
        ));
        assert_eq!(storage.list_users().await.unwrap().len(), 1);
    }
}
