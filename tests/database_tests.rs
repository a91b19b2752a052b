use anyhow::Result;
use lottery_draw_bot::database::connection::DatabaseManager;
use lottery_draw_bot::database::models::*;
use lottery_draw_bot::utils::datetime::{format_timestamp, now_local};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn new_lottery(group_id: i64, creator_id: i64, draw_offset_minutes: i64) -> NewLottery {
    let now = now_local();
    NewLottery {
        group_id,
        creator_id,
        title: "Test Lottery".to_string(),
        description: None,
        signup_deadline: format_timestamp(&(now + chrono::Duration::minutes(draw_offset_minutes - 10))),
        draw_time: format_timestamp(&(now + chrono::Duration::minutes(draw_offset_minutes))),
        auto_draw: true,
        notify_winners_privately: true,
        announce_results_in_group: true,
        pin_results: false,
    }
}

#[tokio::test]
async fn test_group_creation_and_retrieval() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let chat_id = -100123i64;

    let group = Group::create(&db.pool, chat_id, "Rustaceans").await?;
    assert_eq!(group.telegram_chat_id, chat_id);
    assert_eq!(group.title, "Rustaceans");

    let found = Group::find_by_chat_id(&db.pool, chat_id).await?;
    assert!(found.is_some());
    let found = found.unwrap();
    assert_eq!(found.id, group.id);

    let by_id = Group::find_by_id(&db.pool, group.id).await?;
    assert!(by_id.is_some());

    Ok(())
}

#[tokio::test]
async fn test_group_not_found() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let result = Group::find_by_chat_id(&db.pool, 99999).await?;
    assert!(result.is_none());

    Ok(())
}

#[tokio::test]
async fn test_user_upsert_refreshes_profile() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let user = User::upsert(&db.pool, 42, Some("old_name"), Some("Alice")).await?;
    assert_eq!(user.username.as_deref(), Some("old_name"));

    // A second upsert keeps the row but refreshes the profile fields
    let updated = User::upsert(&db.pool, 42, Some("new_name"), Some("Alice")).await?;
    assert_eq!(updated.telegram_id, 42);
    assert_eq!(updated.username.as_deref(), Some("new_name"));
    assert_eq!(updated.created_at, user.created_at);

    Ok(())
}

#[tokio::test]
async fn test_lottery_creation_and_status_updates() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let group = Group::create(&db.pool, -100200, "Test Group").await?;
    User::upsert(&db.pool, 7, Some("creator"), None).await?;

    let lottery = Lottery::create(&db.pool, &new_lottery(group.id, 7, 60)).await?;
    assert_eq!(lottery.status, LotteryStatus::Draft);
    assert!(!lottery.id.is_empty());
    assert_eq!(lottery.result_message_id, None);

    Lottery::update_status(&db.pool, &lottery.id, LotteryStatus::Active).await?;
    let active = Lottery::find_by_id(&db.pool, &lottery.id).await?.unwrap();
    assert_eq!(active.status, LotteryStatus::Active);

    Lottery::set_result_message_id(&db.pool, &lottery.id, 777).await?;
    let with_result = Lottery::find_by_id(&db.pool, &lottery.id).await?.unwrap();
    assert_eq!(with_result.result_message_id, Some(777));

    Ok(())
}

#[tokio::test]
async fn test_lottery_not_found() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let result = Lottery::find_by_id(&db.pool, "non-existent-uuid").await?;
    assert!(result.is_none());

    Ok(())
}

#[tokio::test]
async fn test_find_due_for_draw_filters_correctly() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let group = Group::create(&db.pool, -100300, "Test Group").await?;
    User::upsert(&db.pool, 7, Some("creator"), None).await?;

    // Past draw time, ACTIVE, auto: due
    let due = Lottery::create(&db.pool, &new_lottery(group.id, 7, -5)).await?;
    Lottery::update_status(&db.pool, &due.id, LotteryStatus::Active).await?;

    // Future draw time: not due
    let future = Lottery::create(&db.pool, &new_lottery(group.id, 7, 60)).await?;
    Lottery::update_status(&db.pool, &future.id, LotteryStatus::Active).await?;

    // Past draw time but not auto-draw: not due
    let mut manual = new_lottery(group.id, 7, -5);
    manual.auto_draw = false;
    let manual = Lottery::create(&db.pool, &manual).await?;
    Lottery::update_status(&db.pool, &manual.id, LotteryStatus::Active).await?;

    // Past draw time but already ended: not due
    let ended = Lottery::create(&db.pool, &new_lottery(group.id, 7, -5)).await?;
    Lottery::update_status(&db.pool, &ended.id, LotteryStatus::Ended).await?;

    let now = format_timestamp(&now_local());
    let found = Lottery::find_due_for_draw(&db.pool, &now).await?;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, due.id);

    Ok(())
}

#[tokio::test]
async fn test_find_active_by_group() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let group = Group::create(&db.pool, -100400, "Test Group").await?;
    User::upsert(&db.pool, 7, Some("creator"), None).await?;

    let draft = Lottery::create(&db.pool, &new_lottery(group.id, 7, 60)).await?;
    let active = Lottery::create(&db.pool, &new_lottery(group.id, 7, 30)).await?;
    Lottery::update_status(&db.pool, &active.id, LotteryStatus::Active).await?;

    let found = Lottery::find_active_by_group(&db.pool, group.id).await?;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, active.id);
    assert_ne!(found[0].id, draft.id);

    Ok(())
}

#[tokio::test]
async fn test_prizes_are_ordered_by_display_order() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let group = Group::create(&db.pool, -100500, "Test Group").await?;
    User::upsert(&db.pool, 7, Some("creator"), None).await?;
    let lottery = Lottery::create(&db.pool, &new_lottery(group.id, 7, 60)).await?;

    // Insert out of order on purpose
    Prize::create(&db.pool, &lottery.id, "Third", "Sticker", 10, 2).await?;
    Prize::create(&db.pool, &lottery.id, "First", "Trophy", 1, 0).await?;
    Prize::create(&db.pool, &lottery.id, "Second", "Mug", 3, 1).await?;

    let prizes = Prize::find_by_lottery(&db.pool, &lottery.id).await?;

    assert_eq!(prizes.len(), 3);
    assert_eq!(prizes[0].name, "First");
    assert_eq!(prizes[1].name, "Second");
    assert_eq!(prizes[2].name, "Third");

    Ok(())
}

#[tokio::test]
async fn test_participant_joins_once() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let group = Group::create(&db.pool, -100600, "Test Group").await?;
    User::upsert(&db.pool, 7, Some("creator"), None).await?;
    User::upsert(&db.pool, 8, Some("player"), None).await?;
    let lottery = Lottery::create(&db.pool, &new_lottery(group.id, 7, 60)).await?;

    let entry = Participant::join(&db.pool, &lottery.id, 8).await?;
    assert!(!entry.is_winner);
    assert!(entry.prize_id.is_none());

    // Second entry by the same user violates unique(lottery, user)
    let duplicate = Participant::join(&db.pool, &lottery.id, 8).await;
    assert!(duplicate.is_err());

    Ok(())
}

#[tokio::test]
async fn test_eligible_participants_exclude_winners() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let group = Group::create(&db.pool, -100700, "Test Group").await?;
    User::upsert(&db.pool, 7, Some("creator"), None).await?;
    let lottery = Lottery::create(&db.pool, &new_lottery(group.id, 7, 60)).await?;

    User::upsert(&db.pool, 8, Some("alice"), Some("Alice")).await?;
    User::upsert(&db.pool, 9, None, Some("Bob")).await?;
    let alice_entry = Participant::join(&db.pool, &lottery.id, 8).await?;
    Participant::join(&db.pool, &lottery.id, 9).await?;

    let eligible = EligibleParticipant::find_by_lottery(&db.pool, &lottery.id).await?;
    assert_eq!(eligible.len(), 2);

    // Mark Alice as a winner; she is no longer eligible for another draw
    sqlx::query("UPDATE participants SET is_winner = 1 WHERE id = ?")
        .bind(&alice_entry.id)
        .execute(&db.pool)
        .await?;

    let eligible = EligibleParticipant::find_by_lottery(&db.pool, &lottery.id).await?;
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].user_id, 9);

    assert_eq!(Participant::count_winners(&db.pool, &lottery.id).await?, 1);

    Ok(())
}

#[test]
fn test_display_name_fallbacks() {
    let with_username = EligibleParticipant {
        id: "a".to_string(),
        user_id: 1,
        username: Some("alice".to_string()),
        first_name: Some("Alice".to_string()),
    };
    assert_eq!(with_username.display_name(), "@alice");

    let first_name_only = EligibleParticipant {
        id: "b".to_string(),
        user_id: 2,
        username: None,
        first_name: Some("Bob".to_string()),
    };
    assert_eq!(first_name_only.display_name(), "Bob");

    let bare = EligibleParticipant {
        id: "c".to_string(),
        user_id: 3,
        username: None,
        first_name: None,
    };
    assert_eq!(bare.display_name(), "3");
}

#[tokio::test]
async fn test_lottery_logs_start_empty() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let group = Group::create(&db.pool, -100800, "Test Group").await?;
    User::upsert(&db.pool, 7, Some("creator"), None).await?;
    let lottery = Lottery::create(&db.pool, &new_lottery(group.id, 7, 60)).await?;

    let logs = LotteryLog::find_by_lottery(&db.pool, &lottery.id).await?;
    assert!(logs.is_empty());

    Ok(())
}
