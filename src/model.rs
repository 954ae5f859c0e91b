//! Wire types exchanged with the anti-spam API
//!
//! Field names follow the server's JSON (`snake_case`), so these types
//! serialize without renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored email as returned by the `/emails/*` endpoints.
///
/// Emails are created and classified server-side. The client only
/// reads them and asks the server to reclassify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: i64,
    pub subject: String,
    pub content: String,
    pub sender_email: String,
    pub recipient_email: String,
    pub is_spam: bool,
    /// Classifier confidence in `0.0..=1.0`.
    pub spam_confidence: f64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Email {
    /// Spam confidence as a whole percentage, for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn confidence_percent(&self) -> u8 {
        // Clamped to 0..=100 first, so the cast is exact.
        (self.spam_confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// The three server-side collections, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mailboxes {
    pub sent: Vec<Email>,
    pub received: Vec<Email>,
    pub spam: Vec<Email>,
}

/// Credential returned by `/login` and `/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body for `/login` and `/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body for `/send-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCreate {
    pub recipient_email: String,
    pub subject: String,
    pub content: String,
}

/// Body for `/check-email`: classify a message without storing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamCheckRequest {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

/// Verdict returned by `/check-email`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamCheck {
    pub is_spam: bool,
    pub confidence: f64,
    pub message: String,
}

/// Response of `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

/// Lenient `created_at` handling.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC,
/// which is what the backend emits) or a bare `YYYY-MM-DD`.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parse a timestamp in any of the accepted shapes.
    #[must_use]
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = raw.parse::<NaiveDateTime>() {
            return Some(naive.and_utc());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}
