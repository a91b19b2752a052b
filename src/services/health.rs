use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::database::connection::DatabaseManager;
use crate::utils::datetime::now_local_string;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub lotteries: LotteryGauges,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
}

/// Operational gauges: how many lotteries are running and how many the next
/// sweep will try to draw.
#[derive(Debug, Serialize, Deserialize)]
pub struct LotteryGauges {
    pub active: i64,
    pub due_for_draw: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        let state = AppState {
            db,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let gauges = match load_lottery_gauges(&state.db).await {
        Ok(gauges) => gauges,
        Err(_) => return Err(StatusCode::SERVICE_UNAVAILABLE),
    };

    let response_time_ms = start.elapsed().as_millis() as u64;
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds() as u64;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: "healthy".to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
        },
        lotteries: gauges,
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match test_database_connection(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn test_database_connection(db: &DatabaseManager) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(&db.pool).await?;
    Ok(())
}

async fn load_lottery_gauges(db: &DatabaseManager) -> Result<LotteryGauges, sqlx::Error> {
    let active = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM lotteries WHERE status = 'ACTIVE'",
    )
    .fetch_one(&db.pool)
    .await?;

    let due_for_draw = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM lotteries WHERE status = 'ACTIVE' AND auto_draw = 1 AND draw_time <= ?",
    )
    .bind(now_local_string())
    .fetch_one(&db.pool)
    .await?;

    Ok(LotteryGauges {
        active,
        due_for_draw,
    })
}
