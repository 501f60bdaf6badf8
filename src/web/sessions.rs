//! Per-visitor chat state keyed by session id.
//!
//! Each visitor's [`ChatLoop`] sits behind its own async mutex, held for the whole turn,
//! so a visitor has at most one completion in flight. The map lock is only held for
//! lookup, insertion and sweeping.

use crate::chat::{ChatLoop, SelectionPolicy};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

pub type SharedChat = Arc<tokio::sync::Mutex<ChatLoop>>;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

struct SessionEntry {
    chat: SharedChat,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    policy: SelectionPolicy,
    ttl: Duration,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SelectionPolicy::default(), DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(policy: SelectionPolicy, ttl: Duration) -> Self {
        Self {
            policy,
            ttl,
            sessions: Arc::default(),
        }
    }

    /// A fresh chat that is not stored, for visitors without a session yet.
    pub fn transient(&self) -> ChatLoop {
        ChatLoop::new(self.policy)
    }

    /// The visitor's chat if one is stored. Counts as activity.
    pub fn get(&self, id: Uuid) -> Option<SharedChat> {
        self.entries().get_mut(&id).map(|entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.chat)
        })
    }

    /// The visitor's chat, created on first use.
    pub fn get_or_create(&self, id: Uuid) -> SharedChat {
        let policy = self.policy;
        let mut entries = self.entries();
        let entry = entries.entry(id).or_insert_with(|| SessionEntry {
            chat: Arc::new(tokio::sync::Mutex::new(ChatLoop::new(policy))),
            last_seen: Instant::now(),
        });
        entry.last_seen = Instant::now();
        Arc::clone(&entry.chat)
    }

    /// End a visitor session. Returns whether it existed.
    pub fn remove(&self, id: Uuid) -> bool {
        self.entries().remove(&id).is_some()
    }

    /// Drop sessions idle for longer than the TTL. Returns how many were dropped.
    pub fn purge_idle(&self) -> usize {
        self.purge_idle_at(Instant::now())
    }

    /// Same as [`purge_idle`](Self::purge_idle) with an explicit clock reading.
    ///
    /// Sessions whose chat is held elsewhere (a turn in flight) are kept.
    pub fn purge_idle_at(&self, now: Instant) -> usize {
        let ttl = self.ttl;
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| {
            Arc::strong_count(&entry.chat) > 1 || now.saturating_duration_since(entry.last_seen) <= ttl
        });
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, remaining = entries.len(), "Idle sessions dropped");
        }
        purged
    }

    /// Spawn a task that purges idle sessions every `period`.
    pub fn spawn_sweeper(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                store.purge_idle();
            }
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_returns_same_chat() {
        let store = SessionStore::default();
        let id = Uuid::new_v4();

        let a = store.get_or_create(id);
        let b = store.get_or_create(id);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::default();

        let a = store.get_or_create(Uuid::new_v4());
        let b = store.get_or_create(Uuid::new_v4());

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_does_not_create() {
        let store = SessionStore::default();

        assert!(store.get(Uuid::new_v4()).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_new_sessions_use_store_policy() {
        let store = SessionStore::new(SelectionPolicy::ResetConversation, DEFAULT_SESSION_TTL);

        let chat = store.get_or_create(Uuid::new_v4());

        assert_eq!(chat.lock().await.policy(), SelectionPolicy::ResetConversation);
        assert_eq!(store.transient().policy(), SelectionPolicy::ResetConversation);
    }

    #[test]
    fn test_remove_ends_session() {
        let store = SessionStore::default();
        let id = Uuid::new_v4();
        let first = store.get_or_create(id);

        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.is_empty());

        let second = store.get_or_create(id);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_idle_sessions_are_purged() {
        let store = SessionStore::new(SelectionPolicy::default(), Duration::from_secs(60));
        let idle = Uuid::new_v4();
        drop(store.get_or_create(idle));

        assert_eq!(store.purge_idle_at(Instant::now()), 0);
        assert_eq!(store.len(), 1);

        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(store.purge_idle_at(later), 1);
        assert!(store.get(idle).is_none());
    }

    #[test]
    fn test_activity_refreshes_session() {
        let ttl = Duration::from_secs(60);
        let store = SessionStore::new(SelectionPolicy::default(), ttl);
        let id = Uuid::new_v4();
        let created = Instant::now();
        drop(store.get_or_create(id));

        std::thread::sleep(Duration::from_millis(50));
        drop(store.get(id));

        assert_eq!(store.purge_idle_at(created + ttl + Duration::from_millis(10)), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_session_in_use_is_not_purged() {
        let store = SessionStore::new(SelectionPolicy::default(), Duration::from_secs(60));
        let id = Uuid::new_v4();
        let held = store.get_or_create(id);

        let later = Instant::now() + Duration::from_secs(120);
        assert_eq!(store.purge_idle_at(later), 0);
        assert!(Arc::ptr_eq(&held, &store.get(id).unwrap()));
    }
}
