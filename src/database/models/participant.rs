use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::datetime::now_local_string;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub lottery_id: String,
    pub user_id: i64,
    pub joined_at: String,
    pub is_winner: bool,
    pub prize_id: Option<String>,
}

/// One eligible (non-winning) entry joined with the user's profile, the
/// unit the allocator works over.
#[derive(Debug, Clone, FromRow)]
pub struct EligibleParticipant {
    pub id: String,
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Participant {
    /// Enters a user into a lottery. The unique (lottery, user) constraint
    /// rejects a second entry by the same user.
    pub async fn join(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
        user_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let joined_at = now_local_string();

        sqlx::query(
            r#"
            INSERT INTO participants (id, lottery_id, user_id, joined_at, is_winner)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(&id)
        .bind(lottery_id)
        .bind(user_id)
        .bind(&joined_at)
        .execute(pool)
        .await?;

        Ok(Participant {
            id,
            lottery_id: lottery_id.to_string(),
            user_id,
            joined_at,
            is_winner: false,
            prize_id: None,
        })
    }

    pub async fn find_by_lottery(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            "SELECT id, lottery_id, user_id, joined_at, is_winner, prize_id \
             FROM participants WHERE lottery_id = ? ORDER BY joined_at",
        )
        .bind(lottery_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_winners(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE lottery_id = ? AND is_winner = 1",
        )
        .bind(lottery_id)
        .fetch_one(pool)
        .await
    }
}

impl EligibleParticipant {
    /// All entries still eligible for a draw attempt, in join order.
    pub async fn find_by_lottery(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, EligibleParticipant>(
            r#"
            SELECT p.id, p.user_id, u.username, u.first_name
            FROM participants p
            JOIN users u ON u.telegram_id = p.user_id
            WHERE p.lottery_id = ? AND p.is_winner = 0
            ORDER BY p.joined_at
            "#,
        )
        .bind(lottery_id)
        .fetch_all(pool)
        .await
    }

    /// Winner display name: @username when set, else first name, else the
    /// raw Telegram id.
    pub fn display_name(&self) -> String {
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            format!("@{username}")
        } else if let Some(first_name) = self.first_name.as_deref().filter(|n| !n.is_empty()) {
            first_name.to_string()
        } else {
            self.user_id.to_string()
        }
    }
}
