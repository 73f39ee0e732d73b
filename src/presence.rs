// presence.rs
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct Entry {
    last_seen: Instant,
    /// Open push connections for this name. While positive the entry never
    /// expires; poll-mode users always sit at zero and live by the TTL.
    connections: usize,
}

impl Entry {
    fn is_active(&self, now: Instant, ttl: Duration) -> bool {
        self.connections > 0 || now.duration_since(self.last_seen) < ttl
    }
}

/// Tracks which usernames are currently online. Expiry is lazy: stale
/// entries are pruned whenever the active set is queried, so a snapshot
/// never contains a name older than the TTL.
pub struct PresenceTracker {
    ttl: Duration,
    entries: HashMap<String, Entry>,
}

impl PresenceTracker {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Heartbeat: upsert `last_seen` for `username`.
    pub fn touch(&mut self, username: &str, now: Instant) {
        self.entries
            .entry(username.to_string())
            .and_modify(|e| e.last_seen = now)
            .or_insert(Entry { last_seen: now, connections: 0 });
    }

    /// Explicit departure. Idempotent.
    pub fn remove(&mut self, username: &str) {
        self.entries.remove(username);
    }

    /// A push connection for `username` opened.
    pub fn connect(&mut self, username: &str, now: Instant) {
        let entry = self
            .entries
            .entry(username.to_string())
            .or_insert(Entry { last_seen: now, connections: 0 });
        entry.last_seen = now;
        entry.connections += 1;
    }

    /// A push connection for `username` closed (leave or abrupt drop). The
    /// entry is removed once its last connection is gone, so the name leaves
    /// the active set immediately rather than lingering a TTL.
    pub fn disconnect(&mut self, username: &str, now: Instant) {
        let drained = match self.entries.get_mut(username) {
            Some(entry) => {
                entry.connections = entry.connections.saturating_sub(1);
                entry.last_seen = now;
                entry.connections == 0
            }
            None => false,
        };
        if drained {
            self.remove(username);
        }
    }

    /// Active usernames, sorted for deterministic output. Prunes expired
    /// entries as a side effect.
    pub fn active_users(&mut self, now: Instant, exclude: Option<&str>) -> Vec<String> {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.is_active(now, ttl));
        let mut users: Vec<String> = self
            .entries
            .keys()
            .filter(|name| exclude != Some(name.as_str()))
            .cloned()
            .collect();
        users.sort();
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(10);

    #[test]
    fn touch_makes_a_user_active() {
        let mut tracker = PresenceTracker::new(TTL);
        let now = Instant::now();
        tracker.touch("Fox42", now);
        assert_eq!(tracker.active_users(now, None), vec!["Fox42"]);
    }

    #[test]
    fn unrefreshed_entries_expire_after_ttl() {
        let mut tracker = PresenceTracker::new(TTL);
        let now = Instant::now();
        tracker.touch("Fox42", now);
        assert_eq!(tracker.active_users(now + TTL - Duration::from_millis(1), None).len(), 1);
        assert!(tracker.active_users(now + TTL, None).is_empty());
    }

    #[test]
    fn touch_refreshes_the_deadline() {
        let mut tracker = PresenceTracker::new(TTL);
        let now = Instant::now();
        tracker.touch("Fox42", now);
        tracker.touch("Fox42", now + Duration::from_secs(8));
        assert_eq!(tracker.active_users(now + Duration::from_secs(15), None), vec!["Fox42"]);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut tracker = PresenceTracker::new(TTL);
        let now = Instant::now();
        tracker.touch("Fox42", now);
        tracker.remove("Fox42");
        tracker.remove("Fox42");
        assert!(tracker.active_users(now, None).is_empty());
    }

    #[test]
    fn open_connection_outlives_the_ttl() {
        let mut tracker = PresenceTracker::new(TTL);
        let now = Instant::now();
        tracker.connect("Cat9", now);
        assert_eq!(tracker.active_users(now + TTL * 100, None), vec!["Cat9"]);

        tracker.disconnect("Cat9", now + TTL * 100);
        assert!(tracker.active_users(now + TTL * 100, None).is_empty());
    }

    #[test]
    fn duplicate_connections_are_refcounted() {
        let mut tracker = PresenceTracker::new(TTL);
        let now = Instant::now();
        tracker.connect("Cat9", now);
        tracker.connect("Cat9", now);
        tracker.disconnect("Cat9", now);
        assert_eq!(tracker.active_users(now + TTL, None), vec!["Cat9"]);
        tracker.disconnect("Cat9", now);
        assert!(tracker.active_users(now, None).is_empty());
    }

    #[test]
    fn exclude_filters_only_the_caller() {
        let mut tracker = PresenceTracker::new(TTL);
        let now = Instant::now();
        tracker.touch("Bear7", now);
        tracker.touch("Fox42", now);
        assert_eq!(tracker.active_users(now, Some("Fox42")), vec!["Bear7"]);
        assert_eq!(tracker.active_users(now, None), vec!["Bear7", "Fox42"]);
    }
}
