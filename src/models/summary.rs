//! Read-side summary projections over a year's calendar.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PayoutTurn, TurnStatus};

/// Per-participant rollup within one year, grouped by snapshot name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub participant_name: String,
    pub turn_count: usize,
    pub completed_count: usize,
    pub pending_count: usize,
    pub total_entitled: Decimal,
}

/// Aggregate view of one tanda year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i32,
    pub turn_count: usize,
    pub completed_count: usize,
    pub pending_count: usize,
    pub total_pool: Decimal,
    pub participants: Vec<ParticipantSummary>,
}

impl YearSummary {
    /// Fold a year's turns (already sorted by pay date) into the summary.
    /// Participants appear in first-turn order.
    pub fn from_turns(year: i32, turns: &[PayoutTurn]) -> Self {
        let mut participants: Vec<ParticipantSummary> = Vec::new();
        let mut completed_count = 0;
        let mut total_pool = Decimal::ZERO;

        for turn in turns {
            let completed = turn.status == TurnStatus::Completed;
            if completed {
                completed_count += 1;
            }
            total_pool += turn.total_payout;

            let index = match participants
                .iter()
                .position(|p| p.participant_name == turn.participant_name)
            {
                Some(index) => index,
                None => {
                    participants.push(ParticipantSummary {
                        participant_name: turn.participant_name.clone(),
                        turn_count: 0,
                        completed_count: 0,
                        pending_count: 0,
                        total_entitled: Decimal::ZERO,
                    });
                    participants.len() - 1
                }
            };

            let entry = &mut participants[index];
            entry.turn_count += 1;
            if completed {
                entry.completed_count += 1;
            } else {
                entry.pending_count += 1;
            }
            entry.total_entitled += turn.total_payout;
        }

        Self {
            year,
            turn_count: turns.len(),
            completed_count,
            pending_count: turns.len() - completed_count,
            total_pool,
            participants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn turn(id: i64, name: &str, status: TurnStatus, total: Decimal) -> PayoutTurn {
        PayoutTurn {
            id,
            year: 2025,
            participant_id: id,
            participant_name: name.to_string(),
            pay_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            contribution_per_person: dec!(50),
            total_payout: total,
            status,
            actual_pay_date: None,
            payment_detail: Vec::new(),
            notes: None,
        }
    }

    #[test]
    fn test_empty_year() {
        let summary = YearSummary::from_turns(2025, &[]);
        assert_eq!(summary.turn_count, 0);
        assert_eq!(summary.total_pool, Decimal::ZERO);
        assert!(summary.participants.is_empty());
    }

    #[test]
    fn test_counts_and_pool() {
        let turns = vec![
            turn(1, "Luis", TurnStatus::Completed, dec!(100)),
            turn(2, "Ana", TurnStatus::Pending, dec!(100)),
            turn(3, "Marta", TurnStatus::Pending, dec!(100)),
        ];

        let summary = YearSummary::from_turns(2025, &turns);
        assert_eq!(summary.turn_count, 3);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.pending_count, 2);
        assert_eq!(summary.total_pool, dec!(300));
        assert_eq!(summary.participants.len(), 3);
        assert_eq!(summary.participants[0].participant_name, "Luis");
        assert_eq!(summary.participants[0].completed_count, 1);
        assert_eq!(summary.participants[0].total_entitled, dec!(100));
    }

    #[test]
    fn test_groups_repeated_names() {
        // Two turns under the same snapshot name roll up together
        let turns = vec![
            turn(1, "Ana", TurnStatus::Completed, dec!(100)),
            turn(2, "Ana", TurnStatus::Pending, dec!(100)),
        ];

        let summary = YearSummary::from_turns(2025, &turns);
        assert_eq!(summary.participants.len(), 1);
        assert_eq!(summary.participants[0].turn_count, 2);
        assert_eq!(summary.participants[0].total_entitled, dec!(200));
    }
}
