//! User operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;

impl Database {
    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Check if the email is already registered
        let existing = self.get_user_by_email(&user.email).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate(format!(
                "User '{}' already exists",
                user.email
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, hashed_password, is_active, is_admin, created_at, last_login)
            VALUES (?, ?, 1, ?, ?, NULL)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.is_admin)
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            email: user.email,
            hashed_password: user.hashed_password,
            is_active: true,
            is_admin: user.is_admin,
            created_at: now,
            last_login: None,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, hashed_password, is_active, is_admin, created_at, last_login
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| User::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, hashed_password, is_active, is_admin, created_at, last_login
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| User::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, hashed_password, is_active, is_admin, created_at, last_login
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Record a successful login
    pub async fn touch_last_login(&self, id: i64) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login = ?
            WHERE id = ?
            "#,
        )
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Activate or deactivate a user account
    pub async fn set_user_active(&self, id: i64, is_active: bool) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(is_active)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Grant or revoke the admin flag
    pub async fn set_user_admin(&self, id: i64, is_admin: bool) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_admin = ?
            WHERE id = ?
            "#,
        )
        .bind(is_admin)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            hashed_password: "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$K8rI5T7VdQ8xkO0GqK5K2w".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;

        let user = db.insert_user(new_user("a@x.com")).await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert!(user.is_active);
        assert!(!user.is_admin);
        assert!(user.last_login.is_none());

        let found = db.get_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let by_id = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        assert!(db.get_user_by_email("missing@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;

        db.insert_user(new_user("dup@x.com")).await.unwrap();
        let err = db.insert_user(new_user("dup@x.com")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_touch_last_login() {
        let db = test_db().await;

        let user = db.insert_user(new_user("login@x.com")).await.unwrap();
        assert!(db.touch_last_login(user.id).await.unwrap());

        let found = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(found.last_login.is_some());

        // Unknown id affects no rows
        assert!(!db.touch_last_login(9999).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_active_and_admin() {
        let db = test_db().await;

        let user = db.insert_user(new_user("flags@x.com")).await.unwrap();
        assert!(db.set_user_active(user.id, false).await.unwrap());
        assert!(db.set_user_admin(user.id, true).await.unwrap());

        let found = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert!(!found.is_active);
        assert!(found.is_admin);
    }

    #[tokio::test]
    async fn test_has_users() {
        let db = test_db().await;
        assert!(!db.has_users().await.unwrap());

        db.insert_user(new_user("one@x.com")).await.unwrap();
        assert!(db.has_users().await.unwrap());
    }
}
