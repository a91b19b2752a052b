use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::datetime::now_local_string;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub created_at: String,
}

impl User {
    /// Inserts a user or refreshes an existing record with the latest
    /// Telegram profile data.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let now = now_local_string();

        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, username, first_name, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(telegram_id) DO UPDATE
            SET username = excluded.username, first_name = excluded.first_name
            "#,
        )
        .bind(telegram_id)
        .bind(username)
        .bind(first_name)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_telegram_id(pool, telegram_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_telegram_id(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT telegram_id, username, first_name, created_at FROM users WHERE telegram_id = ?",
        )
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
    }
}
