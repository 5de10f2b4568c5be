//! Participant model matching the `participantes` table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A friend taking part in the tanda.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Participant {
    /// Build a WhatsApp deep-link carrying a reminder message. `{name}` in
    /// the template is replaced with the participant's name. Returns `None`
    /// when the participant has no usable phone number.
    pub fn reminder_link(&self, template: &str) -> Option<String> {
        let digits: String = self
            .phone
            .as_deref()?
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return None;
        }

        let message = template.replace("{name}", &self.name);
        Some(format!(
            "https://wa.me/{}?text={}",
            digits,
            encode_component(&message)
        ))
    }
}

/// Percent-encode a URL query component (RFC 3986 unreserved set kept).
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Validated participant fields, ready for persistence. Built by the API
/// layer after name/birthdate validation.
#[derive(Debug, Clone)]
pub struct ParticipantDraft {
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// Request body for registering a new participant. The birthdate is free
/// text under the flexible day-first grammar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParticipantRequest {
    pub name: String,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for updating an existing participant. Omitted fields keep
/// their current values; an empty-string birthdate clears it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParticipantRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validated update, as applied by the repository. `birthdate` uses a
/// double Option: outer `None` keeps the stored date, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ParticipantUpdate {
    pub name: Option<String>,
    pub birthdate: Option<Option<NaiveDate>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// Reminder deep-link for one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderLink {
    pub participant_id: i64,
    pub url: String,
}
