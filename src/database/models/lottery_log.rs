use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Audit trail entry. The drawing engine writes one DRAW entry per completed
/// draw; the setup and join flows write the other actions.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LotteryLog {
    pub id: String,
    pub lottery_id: String,
    pub user_id: i64,
    pub action: String,
    pub details: Option<String>,
    pub created_at: String,
}

impl LotteryLog {
    pub async fn find_by_lottery(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, LotteryLog>(
            "SELECT id, lottery_id, user_id, action, details, created_at \
             FROM lottery_logs WHERE lottery_id = ? ORDER BY created_at DESC",
        )
        .bind(lottery_id)
        .fetch_all(pool)
        .await
    }
}
