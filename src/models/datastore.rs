//! Datastore snapshot model served to read-only dashboard clients.

use serde::{Deserialize, Serialize};

use super::{Participant, PayoutTurn};

/// The root datastore containing all application data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    pub participants: Vec<Participant>,
    pub calendar: Vec<PayoutTurn>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
