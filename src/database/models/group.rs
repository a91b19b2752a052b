use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::datetime::now_local_string;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub telegram_chat_id: i64,
    pub title: String,
    pub created_at: String,
}

impl Group {
    pub async fn find_by_chat_id(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT id, telegram_chat_id, title, created_at FROM groups WHERE telegram_chat_id = ?",
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT id, telegram_chat_id, title, created_at FROM groups WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
        title: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = now_local_string();

        sqlx::query("INSERT INTO groups (telegram_chat_id, title, created_at) VALUES (?, ?, ?)")
            .bind(chat_id)
            .bind(title)
            .bind(&now)
            .execute(pool)
            .await?;

        Self::find_by_chat_id(pool, chat_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}
