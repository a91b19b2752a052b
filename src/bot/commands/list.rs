use teloxide::prelude::*;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Group, Lottery};
use crate::utils::datetime::{format_display, parse_timestamp};

/// Lists the group's ACTIVE lotteries with their draw times.
pub async fn handle_lotteries(
    bot: Bot,
    msg: Message,
    db: &DatabaseManager,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    let group = match Group::find_by_chat_id(&db.pool, chat_id.0).await {
        Ok(group) => group,
        Err(e) => {
            tracing::error!("Failed to look up group {}: {}", chat_id, e);
            bot.send_message(chat_id, "❌ Something went wrong, please try again later.")
                .await?;
            return Ok(());
        }
    };

    let Some(group) = group else {
        bot.send_message(chat_id, "No lotteries have been set up in this group yet.")
            .await?;
        return Ok(());
    };

    let lotteries = match Lottery::find_active_by_group(&db.pool, group.id).await {
        Ok(lotteries) => lotteries,
        Err(e) => {
            tracing::error!("Failed to list lotteries for group {}: {}", group.id, e);
            bot.send_message(chat_id, "❌ Something went wrong, please try again later.")
                .await?;
            return Ok(());
        }
    };

    if lotteries.is_empty() {
        bot.send_message(chat_id, "There are no active lotteries in this group right now.")
            .await?;
        return Ok(());
    }

    let mut text = String::from("🎁 Active lotteries:\n");
    for lottery in &lotteries {
        let draw_time = parse_timestamp(&lottery.draw_time)
            .map(|dt| format_display(&dt))
            .unwrap_or_else(|_| lottery.draw_time.clone());
        let mode = if lottery.auto_draw {
            "auto-draws"
        } else {
            "manual draw after"
        };
        text.push_str(&format!(
            "\n• {} — {} {}\n  id: {}\n",
            lottery.title, mode, draw_time, lottery.id
        ));
    }

    bot.send_message(chat_id, text).await?;
    Ok(())
}
