//! Payout calendar engine.
//!
//! Pure functions over registry snapshots: birthday-to-year projection,
//! turn ordering, pool arithmetic and the auto-completion threshold. All
//! persistence happens in the repository; this module never touches the
//! database.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::PayoutPolicy;
use crate::errors::AppError;
use crate::models::Participant;

/// A turn planned for a year, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnDraft {
    pub participant_id: i64,
    pub participant_name: String,
    pub pay_date: NaiveDate,
}

/// Plan the ordered payout turns for `year` from a registry snapshot.
///
/// Participants without a birthdate are silently excluded; their presence
/// still counts toward the pool size (see [`total_payout`]). Fails only
/// when nobody qualifies.
pub fn plan_year(year: i32, participants: &[Participant]) -> Result<Vec<TurnDraft>, AppError> {
    let mut qualifying: Vec<(&Participant, NaiveDate)> = participants
        .iter()
        .filter_map(|p| p.birthdate.map(|birthdate| (p, birthdate)))
        .collect();

    if qualifying.is_empty() {
        return Err(AppError::Domain(
            "No participant has a valid birthdate".to_string(),
        ));
    }

    // Stable sort: shared birthdays keep registry order
    qualifying.sort_by_key(|(_, birthdate)| (birthdate.month(), birthdate.day()));

    Ok(qualifying
        .into_iter()
        .map(|(participant, birthdate)| TurnDraft {
            participant_id: participant.id,
            participant_name: participant.name.clone(),
            pay_date: project_birthday(birthdate, year),
        })
        .collect())
}

/// Project a birthday onto a target year, keeping month and day.
///
/// Feb 29 birthdays fall on Feb 28 when the target year is not a leap year.
pub fn project_birthday(birthdate: NaiveDate, year: i32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, birthdate.month(), birthdate.day()) {
        Some(date) => date,
        None => NaiveDate::from_ymd_opt(year, 2, 28).expect("Feb 28 exists in every year"),
    }
}

/// Number of contributors to one turn's pool.
pub fn pool_size(roster_size: usize, policy: &PayoutPolicy) -> u64 {
    if policy.pool_includes_beneficiary {
        roster_size as u64
    } else {
        roster_size.saturating_sub(1) as u64
    }
}

/// Amount the turn's beneficiary receives, shared by every turn of a
/// generated year. `roster_size` is the full registry size at generation
/// time, including participants without a birthdate.
pub fn total_payout(
    contribution: Decimal,
    roster_size: usize,
    policy: &PayoutPolicy,
) -> Decimal {
    contribution * Decimal::from(pool_size(roster_size, policy))
}

/// Number of confirmed per-member payments at which a turn auto-completes.
pub fn auto_complete_threshold(roster_size: usize, policy: &PayoutPolicy) -> usize {
    if policy.threshold_includes_beneficiary {
        roster_size
    } else {
        roster_size.saturating_sub(1)
    }
}
