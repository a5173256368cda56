// ABOUTME: Session record model persisted by the session registry
// Keeps the on-disk JSON shape compatible with the web client's localStorage payload

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub label: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "lastUsed")]
    pub last_used: i64,
}

/// Loosely-typed form of a persisted record. Every field except `id` is
/// optional so a partially corrupt entry degrades instead of failing decode.
#[derive(Debug, Clone, Default)]
pub struct RawSessionRecord {
    pub id: Option<String>,
    pub label: Option<String>,
    pub created_at: Option<i64>,
    pub last_used: Option<i64>,
}

impl RawSessionRecord {
    /// Field-by-field extraction: a wrong-typed field reads as absent rather
    /// than poisoning the whole record.
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self {
            id: value
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            label: value
                .get("label")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            created_at: value.get("createdAt").and_then(serde_json::Value::as_i64),
            last_used: value.get("lastUsed").and_then(serde_json::Value::as_i64),
        }
    }
}

impl SessionRecord {
    /// Build a fresh record for an id with defaulted metadata.
    pub fn with_defaults(id: impl Into<String>, now: i64) -> Self {
        let id = id.into();
        let label = Self::default_label(&id);
        Self {
            id,
            label,
            created_at: now,
            last_used: now,
        }
    }

    /// Decode-with-defaults: a missing id drops the record, everything else
    /// falls back (timestamps to `now`, label derived from the id).
    pub fn normalize(raw: RawSessionRecord, now: i64) -> Option<Self> {
        let id = raw.id.filter(|id| !id.is_empty())?;
        let created_at = raw.created_at.unwrap_or(now);
        let last_used = raw.last_used.unwrap_or(created_at);
        let label = raw
            .label
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| Self::default_label(&id));
        Some(Self {
            id,
            label,
            created_at,
            last_used,
        })
    }

    pub fn default_label(id: &str) -> String {
        let short: String = id.chars().take(8).collect();
        format!("Session {short}")
    }

    pub fn short_id(&self) -> String {
        self.id.chars().take(8).collect()
    }

    pub fn mark_used(&mut self, now: i64) {
        self.last_used = now;
    }

    /// Compact "how long ago" label for the sidebar.
    pub fn last_used_label(&self, now: i64) -> String {
        let elapsed_secs = (now - self.last_used).max(0) / 1000;
        match elapsed_secs {
            0..=59 => "just now".to_string(),
            60..=3599 => format!("{}m ago", elapsed_secs / 60),
            3600..=86_399 => format!("{}h ago", elapsed_secs / 3600),
            _ => format!("{}d ago", elapsed_secs / 86_400),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_fills_missing_fields() {
        let raw = RawSessionRecord {
            id: Some("abcdef1234".to_string()),
            ..Default::default()
        };
        let record = SessionRecord::normalize(raw, 1_000).expect("record");
        assert_eq!(record.label, "Session abcdef12");
        assert_eq!(record.created_at, 1_000);
        assert_eq!(record.last_used, 1_000);
    }

    #[test]
    fn normalize_defaults_last_used_to_created_at() {
        let raw = RawSessionRecord {
            id: Some("s1".to_string()),
            created_at: Some(500),
            ..Default::default()
        };
        let record = SessionRecord::normalize(raw, 9_999).expect("record");
        assert_eq!(record.created_at, 500);
        assert_eq!(record.last_used, 500);
    }

    #[test]
    fn normalize_drops_record_without_id() {
        assert!(SessionRecord::normalize(RawSessionRecord::default(), 0).is_none());
        let empty_id = RawSessionRecord {
            id: Some(String::new()),
            ..Default::default()
        };
        assert!(SessionRecord::normalize(empty_id, 0).is_none());
    }

    #[test]
    fn normalize_keeps_explicit_fields() {
        let raw = RawSessionRecord {
            id: Some("s1".to_string()),
            label: Some("Earnings digging".to_string()),
            created_at: Some(10),
            last_used: Some(20),
        };
        let record = SessionRecord::normalize(raw, 0).expect("record");
        assert_eq!(record.label, "Earnings digging");
        assert_eq!(record.last_used, 20);
    }

    #[test]
    fn from_value_treats_wrong_types_as_absent() {
        let value = serde_json::json!({
            "id": "s1",
            "createdAt": "yesterday",
            "lastUsed": 42
        });
        let raw = RawSessionRecord::from_value(&value);
        assert_eq!(raw.id.as_deref(), Some("s1"));
        assert_eq!(raw.created_at, None);
        assert_eq!(raw.last_used, Some(42));
    }

    #[test]
    fn last_used_label_buckets() {
        let record = SessionRecord::with_defaults("s1", 0);
        assert_eq!(record.last_used_label(30_000), "just now");
        assert_eq!(record.last_used_label(5 * 60_000), "5m ago");
        assert_eq!(record.last_used_label(3 * 3_600_000), "3h ago");
        assert_eq!(record.last_used_label(2 * 86_400_000), "2d ago");
    }
}
