use anyhow::{anyhow, Result};

/// Lottery ids are UUID strings generated by the bot.
pub fn validate_lottery_id(id: &str) -> Result<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(anyhow!("Lottery id cannot be empty"));
    }

    if id.len() > 64 {
        return Err(anyhow!("Lottery id is too long"));
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(anyhow!("Lottery id may only contain letters, digits and dashes"));
    }

    Ok(())
}

/// Parses the optional whitespace-separated winner ids of a manual draw.
/// An empty input is valid and means a fully random draw.
pub fn parse_winner_ids(input: &str) -> Result<Vec<i64>> {
    let mut ids = Vec::new();

    for token in input.split_whitespace() {
        let id: i64 = token
            .parse()
            .map_err(|_| anyhow!("'{}' is not a valid Telegram user id", token))?;

        if id <= 0 {
            return Err(anyhow!("'{}' is not a valid Telegram user id", token));
        }

        ids.push(id);
    }

    Ok(ids)
}
