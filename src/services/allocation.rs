//! Winner allocation for a single draw attempt.
//!
//! Pure functions over an in-memory snapshot: nothing here touches the
//! database or the network, so the allocation rules are directly testable
//! with a seeded RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::database::models::{EligibleParticipant, Prize};

/// One participant-to-prize assignment produced by the allocator.
#[derive(Debug, Clone)]
pub struct WinnerAssignment {
    pub participant_id: String,
    pub user_id: i64,
    pub display_name: String,
    pub prize_id: String,
    pub prize_name: String,
    pub prize_description: String,
}

/// Allocation result plus the sanitization counters for specified winners.
#[derive(Debug)]
pub struct AllocationOutcome {
    pub winners: Vec<WinnerAssignment>,
    /// Specified ids that were not eligible participants, plus duplicates.
    pub invalid_specified: Vec<i64>,
    /// Specified entries dropped from the tail because they exceeded the
    /// total prize slots.
    pub truncated_specified: usize,
}

/// Reduces prize quantities tier by tier so the cumulative capacity never
/// exceeds the participant count. Earlier tiers keep their full quantity;
/// later tiers absorb the shortfall, down to zero.
pub fn cap_prize_quantities(prizes: &mut [Prize], participant_count: usize) {
    let mut remaining = participant_count as i64;
    for prize in prizes.iter_mut() {
        if remaining <= 0 {
            prize.quantity = 0;
        } else {
            prize.quantity = prize.quantity.min(remaining);
            remaining -= prize.quantity;
        }
    }
}

/// Allocates winners for one draw attempt.
///
/// `specified` is the admin-curated guaranteed-winner list; pass an empty
/// slice for a fully random draw. Specified ids that are not eligible
/// participants (or appear twice) are dropped, and entries beyond the total
/// slot count are cut from the tail in input order; neither is a failure.
/// Prizes must be sorted ascending by display order.
pub fn allocate<R: Rng>(
    mut prizes: Vec<Prize>,
    participants: &[EligibleParticipant],
    specified: &[i64],
    rng: &mut R,
) -> AllocationOutcome {
    cap_prize_quantities(&mut prizes, participants.len());

    let mut invalid_specified = Vec::new();
    let mut seen = HashSet::new();
    let mut valid_specified = Vec::new();
    for &user_id in specified {
        let eligible = participants.iter().any(|p| p.user_id == user_id);
        if eligible && seen.insert(user_id) {
            valid_specified.push(user_id);
        } else {
            invalid_specified.push(user_id);
        }
    }

    let total_slots: i64 = prizes.iter().map(|p| p.quantity).sum();
    let mut truncated_specified = 0;
    if valid_specified.len() as i64 > total_slots {
        truncated_specified = valid_specified.len() - total_slots as usize;
        valid_specified.truncate(total_slots as usize);
    }

    let mut slots_left: Vec<i64> = prizes.iter().map(|p| p.quantity).collect();
    let mut winners = Vec::new();

    // Specified winners consume slots first, walking tiers in ascending order.
    let mut tier = 0;
    for &user_id in &valid_specified {
        while tier < prizes.len() && slots_left[tier] == 0 {
            tier += 1;
        }
        let Some(prize) = prizes.get(tier) else { break };
        let Some(participant) = participants.iter().find(|p| p.user_id == user_id) else {
            continue;
        };
        winners.push(make_assignment(participant, prize));
        slots_left[tier] -= 1;
    }

    // Remaining slots are filled by uniform random draw over everyone who
    // was not already guaranteed a win.
    let mut pool: Vec<&EligibleParticipant> = participants
        .iter()
        .filter(|p| !valid_specified.contains(&p.user_id))
        .collect();
    pool.shuffle(rng);
    let mut pool = pool.into_iter();

    for (idx, prize) in prizes.iter().enumerate() {
        for _ in 0..slots_left[idx] {
            let Some(participant) = pool.next() else {
                return AllocationOutcome {
                    winners,
                    invalid_specified,
                    truncated_specified,
                };
            };
            winners.push(make_assignment(participant, prize));
        }
    }

    AllocationOutcome {
        winners,
        invalid_specified,
        truncated_specified,
    }
}

fn make_assignment(participant: &EligibleParticipant, prize: &Prize) -> WinnerAssignment {
    WinnerAssignment {
        participant_id: participant.id.clone(),
        user_id: participant.user_id,
        display_name: participant.display_name(),
        prize_id: prize.id.clone(),
        prize_name: prize.name.clone(),
        prize_description: prize.description.clone(),
    }
}
