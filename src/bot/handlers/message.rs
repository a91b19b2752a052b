use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::database::connection::DatabaseManager;
use crate::services::drawer::LotteryDrawer;
use crate::services::notifier::TelegramNotifier;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    db: DatabaseManager,
    drawer: Arc<LotteryDrawer<TelegramNotifier>>,
) -> ResponseResult<()> {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                "🎁 Welcome to Lottery Bot!\n\nUse /lotteries to see this group's active lotteries.\nUse /help to see all commands.",
            )
            .await?;
        }
        Command::Lotteries => {
            crate::bot::commands::list::handle_lotteries(bot, msg, &db).await?;
        }
        Command::Draw { args } => {
            crate::bot::commands::draw::handle_draw(bot, msg, args, &drawer).await?;
        }
    }
    Ok(())
}
