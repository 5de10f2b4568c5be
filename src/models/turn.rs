//! Payout turn model matching the `calendario` table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status of a payout turn. Wire and store values keep the original
/// Spanish table vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnStatus {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Completado")]
    Completed,
}

impl TurnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnStatus::Pending => "Pendiente",
            TurnStatus::Completed => "Completado",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pendiente" => Some(TurnStatus::Pending),
            "Completado" => Some(TurnStatus::Completed),
            _ => None,
        }
    }
}

/// One beneficiary's payout event within a year's cycle.
///
/// `participant_name` is a snapshot taken at generation time; deleting the
/// participant later leaves the turn untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutTurn {
    pub id: i64,
    pub year: i32,
    pub participant_id: i64,
    pub participant_name: String,
    pub pay_date: NaiveDate,
    pub contribution_per_person: Decimal,
    pub total_payout: Decimal,
    pub status: TurnStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_pay_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_detail: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Serialize a payment-detail id set for the `pagos_detalle` column.
pub fn join_payment_detail(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the comma-joined `pagos_detalle` column; malformed entries are
/// dropped.
pub fn parse_payment_detail(s: &str) -> Vec<i64> {
    s.split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

/// Request body for generating (or regenerating) a year's calendar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCalendarRequest {
    pub year: i32,
    pub contribution_per_person: Decimal,
}

/// Request body for editing a turn. Omitted fields keep current values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTurnRequest {
    #[serde(default)]
    pub status: Option<TurnStatus>,
    #[serde(default)]
    pub actual_pay_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for confirming (or retracting) one member's contribution
/// to a turn.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub participant_id: i64,
    pub paid: bool,
}
