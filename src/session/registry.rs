// ABOUTME: Session registry - ordered, deduplicated bookkeeping of chat sessions
// Tracks which session is active and migrates the legacy single-session key

use chrono::Utc;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::store::KvStore;
use crate::models::{RawSessionRecord, SessionRecord};

/// JSON array of session records.
pub const LIST_KEY: &str = "market_agent_sessions";
/// Plain id string of the session the composer targets.
pub const ACTIVE_KEY: &str = "market_agent_active_session";
/// Single-session id predating multi-session support. Read-only: consulted
/// when no active id exists and merged into loads, never written.
pub const LEGACY_KEY: &str = "market_agent_session";

/// Durable bookkeeping of known sessions and which one is active. Every
/// operation is synchronous and infallible: corrupt or missing state reads as
/// a brand-new registry rather than an error.
pub struct SessionRegistry<S: KvStore> {
    store: S,
}

impl<S: KvStore> SessionRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All known sessions, most recently used first. Ties keep storage order.
    pub fn list(&self) -> Vec<SessionRecord> {
        Self::sorted(self.load())
    }

    /// What is stored under the active key, without side effects.
    pub fn peek_active(&self) -> Option<String> {
        self.store.get(ACTIVE_KEY).filter(|id| !id.is_empty())
    }

    /// The active session id, resolving it if none is stored yet: a persisted
    /// active id wins, then a legacy id is promoted once into the active key,
    /// then a fresh id is generated and persisted. Ensures a record exists for
    /// whatever id it returns, so this may write storage on a first call.
    pub fn active_id(&self) -> String {
        if let Some(stored) = self.peek_active() {
            self.save(&self.ensure(&stored));
            return stored;
        }
        if let Some(legacy) = self.store.get(LEGACY_KEY).filter(|id| !id.is_empty()) {
            tracing::info!("Promoting legacy session id {} to active", legacy);
            self.store.set(ACTIVE_KEY, &legacy);
            self.save(&self.ensure(&legacy));
            return legacy;
        }
        let next = new_session_id();
        self.store.set(ACTIVE_KEY, &next);
        self.save(&self.ensure(&next));
        next
    }

    /// Make `id` the active session, creating its record if new and bumping
    /// its recency. Returns the re-sorted list.
    pub fn set_active(&self, id: &str) -> Vec<SessionRecord> {
        self.store.set(ACTIVE_KEY, id);
        let mut sessions = self.ensure(id);
        let now = Self::now();
        for record in &mut sessions {
            if record.id == id {
                record.mark_used(now);
            }
        }
        self.save(&sessions);
        Self::sorted(sessions)
    }

    /// Generate a fresh session and make it active.
    pub fn create_new(&self) -> (String, Vec<SessionRecord>) {
        let id = new_session_id();
        let sessions = self.set_active(&id);
        (id, sessions)
    }

    /// Bump `id`'s recency without changing the active session. Creates a
    /// default record when `id` is unknown.
    pub fn touch(&self, id: &str) -> Vec<SessionRecord> {
        let mut sessions = self.ensure(id);
        let now = Self::now();
        for record in &mut sessions {
            if record.id == id {
                record.mark_used(now);
            }
        }
        self.save(&sessions);
        Self::sorted(sessions)
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn load(&self) -> Vec<SessionRecord> {
        let now = Self::now();
        let mut sessions: Vec<SessionRecord> = Vec::new();
        if let Some(raw) = self.store.get(LIST_KEY) {
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(serde_json::Value::Array(items)) => {
                    sessions = items
                        .iter()
                        .map(RawSessionRecord::from_value)
                        .filter_map(|item| SessionRecord::normalize(item, now))
                        .collect();
                }
                Ok(_) => {
                    tracing::warn!("Session list payload is not an array, starting empty");
                }
                Err(e) => {
                    tracing::warn!("Discarding corrupt session list: {}", e);
                }
            }
        }
        // A legacy id missing from the list is appended so it is not silently
        // lost, even when it is not the active session.
        if let Some(legacy) = self.store.get(LEGACY_KEY).filter(|id| !id.is_empty()) {
            if !sessions.iter().any(|record| record.id == legacy) {
                sessions.push(SessionRecord::with_defaults(legacy, now));
            }
        }
        sessions
    }

    fn save(&self, sessions: &[SessionRecord]) {
        match serde_json::to_string(sessions) {
            Ok(json) => self.store.set(LIST_KEY, &json),
            Err(e) => tracing::warn!("Failed to encode session list: {}", e),
        }
    }

    fn ensure(&self, id: &str) -> Vec<SessionRecord> {
        let mut sessions = self.load();
        if !sessions.iter().any(|record| record.id == id) {
            sessions.push(SessionRecord::with_defaults(id, Self::now()));
        }
        sessions
    }

    fn sorted(mut sessions: Vec<SessionRecord>) -> Vec<SessionRecord> {
        // sort_by is stable, equal recency keeps storage order
        sessions.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        sessions
    }
}

/// New opaque session id: a v4 UUID from OS randomness, or a timestamp plus
/// random suffix composite when the OS source is unavailable.
pub fn new_session_id() -> String {
    let mut bytes = [0u8; 16];
    if getrandom::getrandom(&mut bytes).is_ok() {
        return uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string();
    }
    fallback_session_id()
}

fn fallback_session_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::from(d.subsec_nanos()))
        .unwrap_or(0);
    // No OS entropy in this branch, time-seeded is the best available
    let mut rng = SmallRng::seed_from_u64(millis ^ nanos.rotate_left(17));
    let suffix = to_base36(rng.gen::<u64>());
    format!("session-{}-{:0>8}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{MemoryStore, NoopStore};
    use pretty_assertions::assert_eq;

    fn registry() -> SessionRegistry<MemoryStore> {
        SessionRegistry::new(MemoryStore::new())
    }

    #[test]
    fn list_on_empty_storage_is_empty() {
        assert!(registry().list().is_empty());
    }

    #[test]
    fn list_survives_corrupt_payload() {
        let registry = registry();
        registry.store.set(LIST_KEY, "{not json");
        assert!(registry.list().is_empty());

        registry.store.set(LIST_KEY, "\"a string\"");
        assert!(registry.list().is_empty());
    }

    #[test]
    fn list_drops_records_without_id_and_keeps_the_rest() {
        let registry = registry();
        registry.store.set(
            LIST_KEY,
            r#"[{"label":"orphan"},{"id":"s1","lastUsed":5},17]"#,
        );
        let sessions = registry.list();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "s1");
    }

    #[test]
    fn list_sorts_by_recency_with_stable_ties() {
        let registry = registry();
        registry.store.set(
            LIST_KEY,
            r#"[
                {"id":"old","createdAt":1,"lastUsed":1},
                {"id":"tie-a","createdAt":2,"lastUsed":5},
                {"id":"tie-b","createdAt":3,"lastUsed":5},
                {"id":"new","createdAt":4,"lastUsed":9}
            ]"#,
        );
        let ids: Vec<_> = registry.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "tie-a", "tie-b", "old"]);
    }

    #[test]
    fn legacy_id_is_merged_into_loads() {
        let registry = registry();
        registry.store.set(LIST_KEY, r#"[{"id":"s1","lastUsed":99}]"#);
        registry.store.set(LEGACY_KEY, "old-session");

        let sessions = registry.list();
        assert!(sessions.iter().any(|r| r.id == "old-session"));
        // Legacy key itself is left untouched.
        assert_eq!(registry.store.get(LEGACY_KEY), Some("old-session".to_string()));
    }

    #[test]
    fn active_id_promotes_legacy_once() {
        let registry = registry();
        registry.store.set(LEGACY_KEY, "old-session");

        assert_eq!(registry.active_id(), "old-session");
        assert_eq!(registry.peek_active(), Some("old-session".to_string()));
        assert!(registry.list().iter().any(|r| r.id == "old-session"));

        // Once an active id exists the legacy key is ignored.
        registry.set_active("fresh");
        registry.store.set(LIST_KEY, "[]");
        assert_eq!(registry.active_id(), "fresh");
        assert_eq!(registry.store.get(LEGACY_KEY), Some("old-session".to_string()));
    }

    #[test]
    fn active_id_generates_and_persists_when_storage_is_empty() {
        let registry = registry();
        let first = registry.active_id();
        assert!(!first.is_empty());
        assert_eq!(registry.peek_active(), Some(first.clone()));
        assert_eq!(registry.active_id(), first);
        assert!(registry.list().iter().any(|r| r.id == first));
    }

    #[test]
    fn peek_active_never_writes() {
        let registry = registry();
        assert_eq!(registry.peek_active(), None);
        assert_eq!(registry.store.get(ACTIVE_KEY), None);
        assert_eq!(registry.store.get(LIST_KEY), None);
    }

    #[test]
    fn without_storage_every_call_is_a_fresh_identity() {
        let registry = SessionRegistry::new(NoopStore);
        let a = registry.active_id();
        let b = registry.active_id();
        assert_ne!(a, b);
        assert!(registry.list().is_empty());

        // Mutations still return the in-memory result, nothing sticks.
        let touched = registry.touch("s1");
        assert_eq!(touched.len(), 1);
        assert!(registry.list().is_empty());
    }

    #[test]
    fn touch_creates_a_default_record_without_changing_active() {
        let registry = registry();
        registry.set_active("s1");

        let sessions = registry.touch("s2");
        let record = sessions
            .iter()
            .find(|r| r.id == "s2")
            .expect("touched record exists");
        assert_eq!(record.label, "Session s2");
        assert_eq!(record.created_at, record.last_used);
        assert_eq!(registry.peek_active(), Some("s1".to_string()));
    }

    #[test]
    fn create_new_returns_an_unused_id() {
        let registry = registry();
        registry.set_active("s1");
        let before: Vec<_> = registry.list().into_iter().map(|r| r.id).collect();

        let (id, sessions) = registry.create_new();
        assert!(!before.contains(&id));
        assert_eq!(sessions[0].id, id);
        assert_eq!(registry.peek_active(), Some(id));
    }

    #[test]
    fn fallback_id_has_prefix_and_long_suffix() {
        let id = fallback_session_id();
        let mut parts = id.splitn(3, '-');
        assert_eq!(parts.next(), Some("session"));
        let stamp = parts.next().expect("timestamp part");
        let suffix = parts.next().expect("suffix part");
        assert!(!stamp.is_empty());
        assert!(suffix.len() >= 8);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36 + 1), "101");
    }
}
