#![allow(clippy::unwrap_used)]

use lottery_draw_bot::utils::validation::{parse_winner_ids, validate_lottery_id};

#[test]
fn test_valid_lottery_id() {
    assert!(validate_lottery_id("0a1b2c3d-4e5f-6789-abcd-ef0123456789").is_ok());
    assert!(validate_lottery_id("  0a1b2c3d-4e5f-6789-abcd-ef0123456789  ").is_ok());
}

#[test]
fn test_empty_lottery_id_rejected() {
    let err = validate_lottery_id("").unwrap_err();
    assert!(err.to_string().contains("cannot be empty"));
    assert!(validate_lottery_id("   ").is_err());
}

#[test]
fn test_overlong_lottery_id_rejected() {
    let id = "a".repeat(65);
    assert!(validate_lottery_id(&id).is_err());
}

#[test]
fn test_lottery_id_with_bad_characters_rejected() {
    assert!(validate_lottery_id("abc def").is_err());
    assert!(validate_lottery_id("abc;DROP TABLE lotteries").is_err());
    assert!(validate_lottery_id("abc_def").is_err());
}

#[test]
fn test_parse_winner_ids_empty_means_random() {
    assert_eq!(parse_winner_ids("").unwrap(), Vec::<i64>::new());
    assert_eq!(parse_winner_ids("   ").unwrap(), Vec::<i64>::new());
}

#[test]
fn test_parse_winner_ids_splits_on_whitespace() {
    assert_eq!(parse_winner_ids("123 456").unwrap(), vec![123, 456]);
    assert_eq!(parse_winner_ids("  123\t456  789 ").unwrap(), vec![123, 456, 789]);
}

#[test]
fn test_parse_winner_ids_rejects_non_numeric() {
    let err = parse_winner_ids("123 abc").unwrap_err();
    assert!(err.to_string().contains("abc"));
}

#[test]
fn test_parse_winner_ids_rejects_non_positive() {
    assert!(parse_winner_ids("-5").is_err());
    assert!(parse_winner_ids("0").is_err());
}
