//! Delivery rows and request-note derivation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Delivery {
    pub id: Uuid,
    pub address_id: Uuid,
    pub label: Option<String>,
    pub recipient: String,
    pub contact_primary: String,
    pub contact_secondary: Option<String>,
    pub request_note: String,
    pub created_at: DateTime<Utc>,
}

/// Delivery request presets offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    LeaveAtDoor,
    SecurityOffice,
    CallBeforeDelivery,
    CustomInput,
}

impl RequestType {
    pub fn description(self) -> &'static str {
        match self {
            Self::LeaveAtDoor => "Leave the package at the door",
            Self::SecurityOffice => "Leave the package at the security office",
            Self::CallBeforeDelivery => "Call before delivering",
            Self::CustomInput => "Direct input",
        }
    }
}

/// Note attached to a delivery: the preset's fixed description, or the
/// caller's own text when the preset is `CustomInput`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestNote {
    Fixed(&'static str),
    Custom(String),
}

impl RequestNote {
    pub fn derive(request_type: RequestType, custom: Option<&str>) -> Self {
        match request_type {
            RequestType::CustomInput => Self::Custom(custom.unwrap_or_default().to_string()),
            other => Self::Fixed(other.description()),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Fixed(text) => text.to_string(),
            Self::Custom(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_note_ignores_custom_text() {
        let note = RequestNote::derive(RequestType::LeaveAtDoor, Some("ring twice"));
        assert_eq!(note, RequestNote::Fixed("Leave the package at the door"));
    }

    #[test]
    fn test_custom_note_uses_caller_text() {
        let note = RequestNote::derive(RequestType::CustomInput, Some("ring twice"));
        assert_eq!(note.into_text(), "ring twice");
    }

    #[test]
    fn test_custom_note_without_text_is_empty() {
        let note = RequestNote::derive(RequestType::CustomInput, None);
        assert_eq!(note.into_text(), "");
    }
}
