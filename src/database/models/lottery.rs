use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::datetime::now_local_string;

/// Lifecycle of a lottery. Transitions only move forward; a lottery is
/// drawable only while ACTIVE and is drawn at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum LotteryStatus {
    Draft,
    Active,
    Paused,
    Ended,
    Cancelled,
}

impl LotteryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotteryStatus::Draft => "DRAFT",
            LotteryStatus::Active => "ACTIVE",
            LotteryStatus::Paused => "PAUSED",
            LotteryStatus::Ended => "ENDED",
            LotteryStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for LotteryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lottery {
    pub id: String,
    pub group_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: LotteryStatus,
    pub signup_deadline: String,
    pub draw_time: String,
    pub auto_draw: bool,
    pub notify_winners_privately: bool,
    pub announce_results_in_group: bool,
    pub pin_results: bool,
    pub message_id: Option<i64>,
    pub result_message_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Field bundle for creating a lottery. The setup flow owns most of these;
/// new lotteries always start as drafts.
#[derive(Debug, Clone)]
pub struct NewLottery {
    pub group_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub signup_deadline: String,
    pub draw_time: String,
    pub auto_draw: bool,
    pub notify_winners_privately: bool,
    pub announce_results_in_group: bool,
    pub pin_results: bool,
}

const LOTTERY_COLUMNS: &str = "id, group_id, creator_id, title, description, status, \
     signup_deadline, draw_time, auto_draw, notify_winners_privately, \
     announce_results_in_group, pin_results, message_id, result_message_id, \
     created_at, updated_at";

impl Lottery {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        new: &NewLottery,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = now_local_string();

        sqlx::query(
            r#"
            INSERT INTO lotteries (
                id, group_id, creator_id, title, description, status,
                signup_deadline, draw_time, auto_draw, notify_winners_privately,
                announce_results_in_group, pin_results, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, 'DRAFT', ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(new.group_id)
        .bind(new.creator_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.signup_deadline)
        .bind(&new.draw_time)
        .bind(new.auto_draw)
        .bind(new.notify_winners_privately)
        .bind(new.announce_results_in_group)
        .bind(new.pin_results)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {LOTTERY_COLUMNS} FROM lotteries WHERE id = ?");
        sqlx::query_as::<_, Lottery>(&query)
            .bind(lottery_id)
            .fetch_optional(pool)
            .await
    }

    /// ACTIVE auto-draw lotteries whose draw time has passed, oldest first.
    pub async fn find_due_for_draw(
        pool: &sqlx::SqlitePool,
        now: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {LOTTERY_COLUMNS} FROM lotteries \
             WHERE status = 'ACTIVE' AND auto_draw = 1 AND draw_time <= ? \
             ORDER BY draw_time"
        );
        sqlx::query_as::<_, Lottery>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    pub async fn find_active_by_group(
        pool: &sqlx::SqlitePool,
        group_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {LOTTERY_COLUMNS} FROM lotteries \
             WHERE group_id = ? AND status = 'ACTIVE' \
             ORDER BY draw_time"
        );
        sqlx::query_as::<_, Lottery>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
        status: LotteryStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE lotteries SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now_local_string())
            .bind(lottery_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Records the id of the sent result announcement.
    pub async fn set_result_message_id(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
        message_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE lotteries SET result_message_id = ?, updated_at = ? WHERE id = ?")
            .bind(message_id)
            .bind(now_local_string())
            .bind(lottery_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
