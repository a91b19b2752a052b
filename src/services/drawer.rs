//! The lottery drawing engine.
//!
//! One draw attempt runs snapshot -> allocation -> commit -> notify,
//! strictly in that order. The commit claims the lottery with a conditional
//! ACTIVE -> ENDED update inside a single transaction, so concurrent manual
//! and automatic draws of the same lottery cannot both land. Notifications
//! run after the commit and are best-effort: once the transaction has
//! committed, the draw is successful regardless of what the Telegram API
//! does.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::database::connection::DatabaseManager;
use crate::database::models::{
    EligibleParticipant, Group, Lottery, LotteryStatus, Prize,
};
use crate::services::allocation::{allocate, WinnerAssignment};
use crate::services::notifier::Notifier;
use crate::utils::datetime::now_local_string;

/// How long a single outbound notification call may take before it is
/// treated as failed, so one hung send cannot stall a whole sweep.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(15);

/// Caller-visible reasons a draw attempt can fail. None of these leave the
/// lottery mutated.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("lottery not found")]
    NotFound,
    #[error("lottery is not active (status {0})")]
    NotActive(LotteryStatus),
    #[error("lottery has no prizes configured")]
    NoPrizes,
    #[error("allocation produced no winners")]
    NoWinners,
    #[error("lottery was already claimed by another draw")]
    AlreadyClaimed,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Summary of a committed draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawReport {
    pub winner_count: usize,
    pub participant_count: usize,
    /// Specified winner ids dropped because they were not eligible entries.
    pub invalid_specified: usize,
    /// Specified entries dropped from the tail for exceeding prize slots.
    pub truncated_specified: usize,
}

/// The consistent read one draw attempt works from. Entries joining after
/// this point do not affect the attempt.
struct Snapshot {
    lottery: Lottery,
    group: Group,
    participants: Vec<EligibleParticipant>,
    prizes: Vec<Prize>,
}

/// Drawing engine service. Constructed once in main and shared by the
/// scheduler sweep and the manual /draw command.
pub struct LotteryDrawer<N> {
    db: Arc<DatabaseManager>,
    notifier: N,
}

impl<N: Notifier> LotteryDrawer<N> {
    pub fn new(db: Arc<DatabaseManager>, notifier: N) -> Self {
        Self { db, notifier }
    }

    /// Draws every ACTIVE auto-draw lottery whose draw time has passed,
    /// sequentially. One lottery's failure is logged and does not block the
    /// others; a failed lottery stays ACTIVE and is retried next sweep.
    /// Returns how many lotteries were drawn.
    pub async fn draw_due_lotteries(&self) -> Result<usize, sqlx::Error> {
        let now = now_local_string();
        let due = Lottery::find_due_for_draw(&self.db.pool, &now).await?;

        if due.is_empty() {
            return Ok(0);
        }

        info!("Found {} lottery(ies) due for drawing", due.len());

        let mut drawn = 0;
        for lottery in due {
            match self.draw(&lottery.id, &[]).await {
                Ok(report) => {
                    drawn += 1;
                    info!(
                        "Auto-drew lottery {} ('{}'): {} winner(s)",
                        lottery.id, lottery.title, report.winner_count
                    );
                }
                Err(e) => {
                    error!(
                        "Auto-draw failed for lottery {} ('{}'): {}",
                        lottery.id, lottery.title, e
                    );
                }
            }
        }

        Ok(drawn)
    }

    /// Runs one draw attempt for a lottery.
    ///
    /// An empty `specified` slice means a fully random draw; a non-empty one
    /// is the manual specified-winners mode, where the listed participants
    /// are guaranteed prizes in input order and any remaining slots are
    /// filled randomly.
    pub async fn draw(
        &self,
        lottery_id: &str,
        specified: &[i64],
    ) -> Result<DrawReport, DrawError> {
        let snapshot = self.load_snapshot(lottery_id).await?;

        if snapshot.lottery.status != LotteryStatus::Active {
            return Err(DrawError::NotActive(snapshot.lottery.status));
        }

        if snapshot.participants.is_empty() {
            return self.finish_without_participants(&snapshot).await;
        }

        if snapshot.prizes.is_empty() {
            return Err(DrawError::NoPrizes);
        }

        let participant_count = snapshot.participants.len();
        let mut rng = StdRng::from_entropy();
        let outcome = allocate(
            snapshot.prizes.clone(),
            &snapshot.participants,
            specified,
            &mut rng,
        );

        for user_id in &outcome.invalid_specified {
            warn!(
                "Specified winner {} is not an eligible participant of lottery {}; dropped",
                user_id, lottery_id
            );
        }
        if outcome.truncated_specified > 0 {
            warn!(
                "{} specified winner(s) exceeded the prize slots of lottery {}; dropped from the tail",
                outcome.truncated_specified, lottery_id
            );
        }

        if outcome.winners.is_empty() {
            return Err(DrawError::NoWinners);
        }

        self.commit_winners(&snapshot.lottery, &outcome.winners).await?;

        self.notify_winners(&snapshot, &outcome.winners, participant_count)
            .await;

        info!(
            "Lottery {} drawn: {} winner(s) out of {} participant(s)",
            lottery_id,
            outcome.winners.len(),
            participant_count
        );

        Ok(DrawReport {
            winner_count: outcome.winners.len(),
            participant_count,
            invalid_specified: outcome.invalid_specified.len(),
            truncated_specified: outcome.truncated_specified,
        })
    }

    async fn load_snapshot(&self, lottery_id: &str) -> Result<Snapshot, DrawError> {
        let lottery = Lottery::find_by_id(&self.db.pool, lottery_id)
            .await?
            .ok_or(DrawError::NotFound)?;
        let group = Group::find_by_id(&self.db.pool, lottery.group_id)
            .await?
            .ok_or(DrawError::NotFound)?;
        let participants = EligibleParticipant::find_by_lottery(&self.db.pool, lottery_id).await?;
        let prizes = Prize::find_by_lottery(&self.db.pool, lottery_id).await?;

        Ok(Snapshot {
            lottery,
            group,
            participants,
            prizes,
        })
    }

    /// A due lottery with nobody in it still ends, with a distinct
    /// announcement. This is a successful empty draw, not a failure.
    async fn finish_without_participants(
        &self,
        snapshot: &Snapshot,
    ) -> Result<DrawReport, DrawError> {
        let lottery = &snapshot.lottery;

        let mut tx = self.db.pool.begin().await?;
        claim_lottery(&mut tx, &lottery.id).await?;
        insert_draw_log(
            &mut tx,
            &lottery.id,
            lottery.creator_id,
            "Drawn with no participants; lottery ended",
        )
        .await?;
        tx.commit().await?;

        if lottery.announce_results_in_group {
            let text = build_empty_result_text(lottery);
            self.announce_in_group(lottery, &snapshot.group, &text).await;
        }

        info!("Lottery {} ended without participants", lottery.id);

        Ok(DrawReport {
            winner_count: 0,
            participant_count: 0,
            invalid_specified: 0,
            truncated_specified: 0,
        })
    }

    /// The whole commit is one transaction: the conditional status claim,
    /// every winner row, and the audit entry either all land or none do.
    async fn commit_winners(
        &self,
        lottery: &Lottery,
        winners: &[WinnerAssignment],
    ) -> Result<(), DrawError> {
        let mut tx = self.db.pool.begin().await?;

        claim_lottery(&mut tx, &lottery.id).await?;

        for winner in winners {
            sqlx::query("UPDATE participants SET is_winner = 1, prize_id = ? WHERE id = ?")
                .bind(&winner.prize_id)
                .bind(&winner.participant_id)
                .execute(&mut tx)
                .await?;
        }

        insert_draw_log(
            &mut tx,
            &lottery.id,
            lottery.creator_id,
            &format!("Draw completed: {} winner(s)", winners.len()),
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Post-commit side effects. Failures here are logged and swallowed;
    /// the draw already succeeded.
    async fn notify_winners(
        &self,
        snapshot: &Snapshot,
        winners: &[WinnerAssignment],
        participant_count: usize,
    ) {
        let lottery = &snapshot.lottery;

        if lottery.announce_results_in_group {
            let text = build_result_text(lottery, &snapshot.prizes, winners, participant_count);
            self.announce_in_group(lottery, &snapshot.group, &text).await;
        }

        if lottery.notify_winners_privately {
            for winner in winners {
                let text = build_private_text(lottery, &snapshot.group, winner);
                match timeout(
                    NOTIFY_TIMEOUT,
                    self.notifier.send_private_message(winner.user_id, &text),
                )
                .await
                {
                    Ok(Ok(())) => info!(
                        "Notified winner {} ({}) privately",
                        winner.display_name, winner.user_id
                    ),
                    Ok(Err(e)) => error!(
                        "Failed to notify winner {} ({}) privately: {}",
                        winner.display_name, winner.user_id, e
                    ),
                    Err(_) => error!(
                        "Timed out notifying winner {} ({}) privately",
                        winner.display_name, winner.user_id
                    ),
                }
            }
        }
    }

    /// Sends the group announcement, optionally pins it, and records the
    /// result message id. Each step fails independently.
    async fn announce_in_group(&self, lottery: &Lottery, group: &Group, text: &str) {
        let chat_id = group.telegram_chat_id;

        let message_id = match timeout(
            NOTIFY_TIMEOUT,
            self.notifier.send_group_message(chat_id, text),
        )
        .await
        {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                error!(
                    "Failed to announce lottery {} in group {}: {}",
                    lottery.id, chat_id, e
                );
                return;
            }
            Err(_) => {
                error!(
                    "Timed out announcing lottery {} in group {}",
                    lottery.id, chat_id
                );
                return;
            }
        };

        if lottery.pin_results {
            match timeout(
                NOTIFY_TIMEOUT,
                self.notifier.pin_group_message(chat_id, message_id),
            )
            .await
            {
                Ok(Ok(())) => info!("Pinned result message {} in group {}", message_id, chat_id),
                Ok(Err(e)) => error!(
                    "Failed to pin result message in group {}: {}",
                    chat_id, e
                ),
                Err(_) => error!("Timed out pinning result message in group {}", chat_id),
            }
        }

        if let Err(e) =
            Lottery::set_result_message_id(&self.db.pool, &lottery.id, message_id).await
        {
            error!(
                "Failed to record result message id for lottery {}: {}",
                lottery.id, e
            );
        }
    }
}

/// First write of every commit: claims the lottery by flipping ACTIVE to
/// ENDED conditionally. Zero rows affected means another draw got there
/// first and this attempt aborts without writing anything else.
async fn claim_lottery(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    lottery_id: &str,
) -> Result<(), DrawError> {
    let result = sqlx::query(
        "UPDATE lotteries SET status = 'ENDED', updated_at = ? WHERE id = ? AND status = 'ACTIVE'",
    )
    .bind(now_local_string())
    .bind(lottery_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DrawError::AlreadyClaimed);
    }

    Ok(())
}

async fn insert_draw_log(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    lottery_id: &str,
    user_id: i64,
    details: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO lottery_logs (id, lottery_id, user_id, action, details, created_at) \
         VALUES (?, ?, ?, 'DRAW', ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(lottery_id)
    .bind(user_id)
    .bind(details)
    .bind(now_local_string())
    .execute(&mut *tx)
    .await?;

    Ok(())
}

/// Group announcement with winners grouped by prize tier.
fn build_result_text(
    lottery: &Lottery,
    prizes: &[Prize],
    winners: &[WinnerAssignment],
    participant_count: usize,
) -> String {
    let mut text = format!("🎁 Lottery Results 🎁\n\nTitle: {}\n", lottery.title);
    if let Some(description) = &lottery.description {
        text.push_str(&format!("Description: {description}\n"));
    }
    text.push_str(&format!(
        "\n👥 {participant_count} participant(s) entered\n🏆 Congratulations to the winners:\n"
    ));

    for prize in prizes {
        let prize_winners: Vec<&WinnerAssignment> =
            winners.iter().filter(|w| w.prize_id == prize.id).collect();
        if prize_winners.is_empty() {
            continue;
        }
        text.push_str(&format!("\n{} ({}):\n", prize.name, prize.description));
        for winner in prize_winners {
            text.push_str(&format!("- {}\n", winner.display_name));
        }
    }

    text
}

fn build_empty_result_text(lottery: &Lottery) -> String {
    let mut text = format!("🎁 Lottery Ended\n\nTitle: {}\n", lottery.title);
    if let Some(description) = &lottery.description {
        text.push_str(&format!("Description: {description}\n"));
    }
    text.push_str("\n❗ Nobody entered this lottery, so it ended without winners.");
    text
}

fn build_private_text(lottery: &Lottery, group: &Group, winner: &WinnerAssignment) -> String {
    let mut text = format!(
        "🎉 Congratulations! You won {} ({}) in \"{}\"!\n",
        winner.prize_name, winner.prize_description, lottery.title
    );
    if let Some(description) = &lottery.description {
        text.push_str(&format!("\nLottery details: {description}\n"));
    }
    text.push_str(&format!(
        "\nGroup: {}\nPlease contact the group administrators to claim your prize.",
        group.title
    ));
    text
}
