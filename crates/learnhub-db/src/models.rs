//! Database models

use crate::utils::{parse_datetime_opt, parse_datetime_or_now};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User account model
///
/// `hashed_password` is an argon2 PHC string and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub is_admin: bool,
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            hashed_password: row.try_get("hashed_password")?,
            is_active: row.try_get("is_active")?,
            is_admin: row.try_get("is_admin")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            last_login: parse_datetime_opt(row.try_get::<Option<String>, _>("last_login")?),
        })
    }
}
