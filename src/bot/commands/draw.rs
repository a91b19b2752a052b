use std::sync::Arc;
use teloxide::prelude::*;

use crate::services::drawer::LotteryDrawer;
use crate::services::notifier::TelegramNotifier;
use crate::utils::validation::{parse_winner_ids, validate_lottery_id};

const USAGE: &str = "Usage: /draw <lottery_id> [user_id ...]\n\nWith user ids, the listed participants are guaranteed winners and any remaining prize slots are drawn randomly.";

/// Manual draw, admin-only. `/draw <lottery_id>` draws randomly;
/// `/draw <lottery_id> <user_id> ...` guarantees the listed participants.
pub async fn handle_draw(
    bot: Bot,
    msg: Message,
    args: String,
    drawer: &Arc<LotteryDrawer<TelegramNotifier>>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let username = msg.from().and_then(|u| u.username.as_deref()).unwrap_or("unknown");

    if !is_group_admin(&bot, &msg).await? {
        bot.send_message(chat_id, "❌ Only group administrators can draw a lottery.")
            .await?;
        return Ok(());
    }

    let args = args.trim();
    let mut parts = args.splitn(2, char::is_whitespace);
    let lottery_id = parts.next().unwrap_or("");
    let id_args = parts.next().unwrap_or("");

    if let Err(e) = validate_lottery_id(lottery_id) {
        bot.send_message(chat_id, format!("❌ {e}\n\n{USAGE}")).await?;
        return Ok(());
    }

    let specified = match parse_winner_ids(id_args) {
        Ok(ids) => ids,
        Err(e) => {
            bot.send_message(chat_id, format!("❌ {e}\n\n{USAGE}")).await?;
            return Ok(());
        }
    };

    tracing::info!(
        "Manual draw of lottery {} requested by {} ({}) in chat {} with {} specified winner(s)",
        lottery_id,
        username,
        user_id,
        chat_id,
        specified.len()
    );

    match drawer.draw(lottery_id, &specified).await {
        Ok(report) => {
            let mut reply = if report.winner_count == 0 {
                "✅ Lottery drawn: nobody had entered, so it ended without winners.".to_string()
            } else {
                format!(
                    "✅ Lottery drawn: {} winner(s) out of {} participant(s).",
                    report.winner_count, report.participant_count
                )
            };
            if report.invalid_specified > 0 {
                reply.push_str(&format!(
                    "\n⚠️ {} specified id(s) were not participants and were skipped.",
                    report.invalid_specified
                ));
            }
            if report.truncated_specified > 0 {
                reply.push_str(&format!(
                    "\n⚠️ {} specified winner(s) exceeded the prize slots and were dropped.",
                    report.truncated_specified
                ));
            }
            bot.send_message(chat_id, reply).await?;
        }
        Err(e) => {
            tracing::warn!("Manual draw of lottery {} failed: {}", lottery_id, e);
            bot.send_message(chat_id, format!("❌ Draw failed: {e}")).await?;
        }
    }

    Ok(())
}

async fn is_group_admin(bot: &Bot, msg: &Message) -> ResponseResult<bool> {
    // Direct chats have no admin hierarchy; allow manual draws there
    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        return Ok(true);
    }

    let Some(from) = msg.from() else {
        return Ok(false);
    };

    let admins = bot.get_chat_administrators(msg.chat.id).await?;
    Ok(admins.iter().any(|member| member.user.id == from.id))
}
