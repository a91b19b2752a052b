pub mod message;

use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::database::connection::DatabaseManager;
use crate::services::drawer::LotteryDrawer;
use crate::services::notifier::TelegramNotifier;

/// Update routing. The drawer is injected here (and into the scheduler)
/// from main, never reached through globals.
pub struct BotHandler {
    pub db: DatabaseManager,
    pub drawer: Arc<LotteryDrawer<TelegramNotifier>>,
}

impl BotHandler {
    pub fn new(db: DatabaseManager, drawer: Arc<LotteryDrawer<TelegramNotifier>>) -> Self {
        Self { db, drawer }
    }

    pub fn schema(&self) -> UpdateHandler<teloxide::RequestError> {
        use teloxide::dispatching::UpdateFilterExt;

        let db = self.db.clone();
        let drawer = self.drawer.clone();

        Update::filter_message()
            .filter_command::<crate::bot::commands::Command>()
            .endpoint(move |bot, msg, cmd| {
                let db = db.clone();
                let drawer = drawer.clone();
                async move { message::command_handler(bot, msg, cmd, db, drawer).await }
            })
    }
}
