use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One prize tier. `display_order` is both the display priority and the
/// allocation priority: lower orders are filled first.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Prize {
    pub id: String,
    pub lottery_id: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub display_order: i64,
}

impl Prize {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
        name: &str,
        description: &str,
        quantity: i64,
        display_order: i64,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO prizes (id, lottery_id, name, description, quantity, display_order)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(lottery_id)
        .bind(name)
        .bind(description)
        .bind(quantity)
        .bind(display_order)
        .execute(pool)
        .await?;

        Ok(Prize {
            id,
            lottery_id: lottery_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            quantity,
            display_order,
        })
    }

    pub async fn find_by_lottery(
        pool: &sqlx::SqlitePool,
        lottery_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Prize>(
            "SELECT id, lottery_id, name, description, quantity, display_order \
             FROM prizes WHERE lottery_id = ? ORDER BY display_order",
        )
        .bind(lottery_id)
        .fetch_all(pool)
        .await
    }
}
