//! Outbound messaging boundary of the drawing engine.

use teloxide::prelude::*;
use teloxide::types::MessageId;

/// Outbound side effects of a draw. Implemented by the Telegram-backed
/// notifier in production and by scripted fakes in tests, so the pipeline's
/// failure policy can be exercised without a live bot.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Sends a message to a group chat and returns the sent message id.
    async fn send_group_message(&self, chat_id: i64, text: &str) -> anyhow::Result<i64>;

    /// Pins a previously sent message in a group chat.
    async fn pin_group_message(&self, chat_id: i64, message_id: i64) -> anyhow::Result<()>;

    /// Sends a direct message to a single user.
    async fn send_private_message(&self, user_id: i64, text: &str) -> anyhow::Result<()>;
}

/// Production notifier backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl Notifier for TelegramNotifier {
    async fn send_group_message(&self, chat_id: i64, text: &str) -> anyhow::Result<i64> {
        let message = self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(i64::from(message.id.0))
    }

    async fn pin_group_message(&self, chat_id: i64, message_id: i64) -> anyhow::Result<()> {
        self.bot
            .pin_chat_message(ChatId(chat_id), MessageId(message_id as i32))
            .await?;
        Ok(())
    }

    async fn send_private_message(&self, user_id: i64, text: &str) -> anyhow::Result<()> {
        self.bot.send_message(ChatId(user_id), text).await?;
        Ok(())
    }
}
