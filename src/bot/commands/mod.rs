pub mod draw;
pub mod list;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Lottery Bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "List this group's active lotteries")]
    Lotteries,
    #[command(description = "Draw a lottery now: /draw <lottery_id> [user_id ...]")]
    Draw { args: String },
}
