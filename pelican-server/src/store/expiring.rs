//! Generic TTL-keyed store
//!
//! Every entry carries a last-touched timestamp; reads are lazy-expiry
//! (a stale entry behaves as absent and is removed on access), and a
//! [`sweep`](ExpiringStore::sweep) pass evicts everything past the TTL.
//!
//! The whole read-modify-write sequence happens under one lock; no await
//! points ever occur while the lock is held.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

struct Entry<V> {
    value: V,
    touched_at: DateTime<Utc>,
}

/// Keyed collection with a per-store TTL
///
/// Backs menus (restaurant id → menu snapshot) and couriers (courier id →
/// courier). Iteration order is irrelevant to correctness.
pub struct ExpiringStore<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> ExpiringStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Insert or replace, stamping current time (resets the TTL clock)
    pub fn put(&self, key: K, value: V) {
        self.put_at(key, value, Utc::now());
    }

    pub(crate) fn put_at(&self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.write().insert(
            key,
            Entry {
                value,
                touched_at: now,
            },
        );
    }

    /// Lazy-expiry read-through: returns the value only if present and not
    /// yet expired; a stale entry is removed and reported as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    pub(crate) fn get_at(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if now - entry.touched_at <= self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert-or-update in place, restamping the entry
    ///
    /// `default` seeds a missing entry before `update` runs on it.
    pub fn upsert<F>(&self, key: K, default: V, update: F)
    where
        F: FnOnce(&mut V),
    {
        let now = Utc::now();
        let mut entries = self.entries.write();
        let entry = entries.entry(key).or_insert(Entry {
            value: default,
            touched_at: now,
        });
        update(&mut entry.value);
        entry.touched_at = now;
    }

    /// Remove every entry whose age exceeds the TTL; returns the count removed
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now - entry.touched_at <= self.ttl);
        before - entries.len()
    }

    /// Snapshot of all live values (expired entries excluded, not removed)
    pub fn values(&self) -> Vec<V> {
        self.values_at(Utc::now())
    }

    pub(crate) fn values_at(&self, now: DateTime<Utc>) -> Vec<V> {
        self.entries
            .read()
            .values()
            .filter(|entry| now - entry.touched_at <= self.ttl)
            .map(|entry| entry.value.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ExpiringStore<String, u32> {
        ExpiringStore::new(Duration::hours(3))
    }

    #[test]
    fn put_then_get_round_trips() {
        let s = store();
        s.put("a".into(), 1);
        assert_eq!(s.get(&"a".into()), Some(1));
        assert_eq!(s.get(&"b".into()), None);
    }

    #[test]
    fn stale_read_removes_entry() {
        let s = store();
        let t0 = Utc::now();
        s.put_at("a".into(), 1, t0);

        // One minute inside the window
        assert_eq!(s.get_at(&"a".into(), t0 + Duration::minutes(179)), Some(1));
        // One minute past the window: absent, and proactively removed
        assert_eq!(s.get_at(&"a".into(), t0 + Duration::minutes(181)), None);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn boundary_is_exactly_ttl() {
        let s = store();
        let t0 = Utc::now();
        s.put_at("a".into(), 1, t0);
        // Exactly the TTL is still live; a second beyond is not
        assert_eq!(s.get_at(&"a".into(), t0 + Duration::hours(3)), Some(1));
        assert_eq!(
            s.get_at(&"a".into(), t0 + Duration::hours(3) + Duration::seconds(1)),
            None
        );
    }

    #[test]
    fn put_resets_ttl_clock() {
        let s = store();
        let t0 = Utc::now();
        s.put_at("a".into(), 1, t0);
        s.put_at("a".into(), 2, t0 + Duration::hours(2));
        // 4h after the first put, but only 2h after the replace
        assert_eq!(s.get_at(&"a".into(), t0 + Duration::hours(4)), Some(2));
    }

    #[test]
    fn sweep_evicts_only_stale_entries() {
        let s = store();
        let t0 = Utc::now();
        s.put_at("old".into(), 1, t0);
        s.put_at("fresh".into(), 2, t0 + Duration::hours(2));

        let removed = s.sweep(t0 + Duration::hours(4));
        assert_eq!(removed, 1);
        assert_eq!(s.get_at(&"fresh".into(), t0 + Duration::hours(4)), Some(2));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn upsert_touches_and_updates() {
        let s = store();
        s.upsert("a".into(), 0, |v| *v += 1);
        s.upsert("a".into(), 0, |v| *v += 1);
        assert_eq!(s.get(&"a".into()), Some(2));
    }
}
