//! # Lottery Bot Main Entry Point
//!
//! Initializes logging, loads configuration, sets up the database, wires the
//! drawing engine into the scheduler and the bot handlers, and runs the
//! Telegram dispatcher alongside the health server.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod database;
mod services;
mod utils;

use crate::bot::handlers::BotHandler;
use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::services::drawer::LotteryDrawer;
use crate::services::health::HealthService;
use crate::services::notifier::TelegramNotifier;
use crate::services::scheduler::DrawScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lottery_draw_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Lottery Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}",
        config.database_url, config.http_port
    );

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot and drawing engine; the drawer is constructed once here
    // and injected into both the scheduler and the command handlers
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let notifier = TelegramNotifier::new(bot.clone());
    let drawer = Arc::new(LotteryDrawer::new(db_arc.clone(), notifier));
    let handler = BotHandler::new(db_arc.as_ref().clone(), drawer.clone());
    info!("Telegram bot initialized successfully");

    // Initialize and start the auto-draw scheduler
    info!("Initializing draw scheduler...");
    let mut draw_scheduler = match DrawScheduler::new(drawer.clone()).await {
        Ok(scheduler) => {
            info!("Draw scheduler initialized successfully");
            scheduler
        }
        Err(e) => {
            tracing::error!("Failed to create draw scheduler: {}", e);
            return Err(anyhow::anyhow!("Failed to create draw scheduler: {}", e));
        }
    };

    if let Err(e) = draw_scheduler.start().await {
        tracing::error!("Failed to start draw scheduler: {}", e);
    } else {
        info!("Draw scheduler started successfully");
    }

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    // Run both the bot and health server concurrently
    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    // Stop the draw scheduler on shutdown
    if let Err(e) = draw_scheduler.stop().await {
        tracing::warn!("Error stopping draw scheduler: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
