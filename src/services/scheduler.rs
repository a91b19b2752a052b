//! Periodic auto-draw sweep.

use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::services::drawer::LotteryDrawer;
use crate::services::notifier::TelegramNotifier;

/// Wakes once a minute and draws every qualifying lottery. The drawer is
/// injected from main; the scheduler only owns the tick.
pub struct DrawScheduler {
    drawer: Arc<LotteryDrawer<TelegramNotifier>>,
    scheduler: JobScheduler,
}

impl DrawScheduler {
    pub async fn new(
        drawer: Arc<LotteryDrawer<TelegramNotifier>>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self { drawer, scheduler })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let drawer = self.drawer.clone();

        // Fires at second 0 of every minute, the drawing sweep interval
        let draw_job = Job::new_async("0 * * * * *", move |_uuid, _l| {
            let drawer = drawer.clone();
            Box::pin(async move {
                match drawer.draw_due_lotteries().await {
                    Ok(0) => {}
                    Ok(count) => info!("Auto-draw sweep completed: {} lottery(ies) drawn", count),
                    Err(e) => error!("Auto-draw sweep failed: {}", e),
                }
            })
        })?;

        self.scheduler.add(draw_job).await?;
        self.scheduler.start().await?;

        info!("Draw scheduler started - checking for due lotteries every minute");
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    // Manual trigger for testing
    pub async fn check_now(&self) -> Result<usize, sqlx::Error> {
        self.drawer.draw_due_lotteries().await
    }
}
