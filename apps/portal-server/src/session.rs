//! Per-session state.
//!
//! Every browser session gets its own [`SessionContext`], created on first
//! contact and kept in process memory until it idles out, is evicted to make
//! room, or the process restarts.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use entities::{Category, SessionUser};
use uuid::Uuid;

/// Cookie carrying the session ID.
pub const SESSION_COOKIE: &str = "portal_session";

/// Identifies a session. Inserted into request extensions by the session
/// middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Operation succeeded.
    Success,
    /// Non-fatal problem.
    Warning,
    /// Operation did not complete.
    Error,
}

/// A message shown once on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Creates a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Creates a warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// State of one browser session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Display identity.
    pub user: SessionUser,
    /// Category shown in the content area.
    pub active_category: &'static Category,
    /// Current title search.
    pub search_query: String,
    notices: Vec<Notice>,
}

impl SessionContext {
    /// Creates a context with the default category.
    pub fn new(user: SessionUser) -> Self {
        Self {
            user,
            active_category: Category::default_category(),
            search_query: String::new(),
            notices: Vec::new(),
        }
    }

    /// Queues a notice for the next render.
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drains queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

/// Sessions idle for longer than this are dropped.
pub const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Upper bound on live sessions; the least recently seen one is evicted.
pub const MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct SessionEntry {
    context: SessionContext,
    last_seen: Instant,
}

/// All live sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    default_user: SessionUser,
    ttl: Duration,
    capacity: usize,
    sessions: HashMap<SessionId, SessionEntry>,
}

impl SessionRegistry {
    /// Creates an empty registry with the default limits.
    pub fn new(default_user: SessionUser) -> Self {
        Self::with_limits(default_user, SESSION_TTL, MAX_SESSIONS)
    }

    /// Creates an empty registry with an idle timeout and a capacity.
    pub fn with_limits(default_user: SessionUser, ttl: Duration, capacity: usize) -> Self {
        Self {
            default_user,
            ttl,
            capacity: capacity.max(1),
            sessions: HashMap::new(),
        }
    }

    /// Makes sure a session exists and returns its ID.
    ///
    /// A known, unexpired session is touched and returned. Anything else
    /// (no ID, an ID this registry never issued, an expired session) gets a
    /// freshly minted ID. The flag is true when the caller has to send the
    /// ID back to the client.
    pub fn ensure(&mut self, requested: Option<SessionId>) -> (SessionId, bool) {
        let now = Instant::now();
        let ttl = self.ttl;

        if let Some(id) = requested {
            let live = self
                .sessions
                .get_mut(&id)
                .filter(|entry| !is_expired(entry, now, ttl));
            if let Some(entry) = live {
                entry.last_seen = now;
                return (id, false);
            }
        }

        self.evict(now);

        let id = SessionId(Uuid::new_v4());
        tracing::debug!(session_id = %id.0, "Session created");
        self.sessions.insert(
            id,
            SessionEntry {
                context: SessionContext::new(self.default_user.clone()),
                last_seen: now,
            },
        );
        (id, true)
    }

    /// Drops expired sessions, then the least recently seen ones until
    /// there is room for one more.
    fn evict(&mut self, now: Instant) {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !is_expired(entry, now, ttl));

        while self.sessions.len() >= self.capacity {
            let Some(oldest) = self
                .sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            self.sessions.remove(&oldest);
        }

        let evicted = before - self.sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.sessions.len(), "Sessions evicted");
        }
    }

    /// Gets a session.
    pub fn get(&self, id: SessionId) -> Option<&SessionContext> {
        self.sessions.get(&id).map(|entry| &entry.context)
    }

    /// Gets a session mutably.
    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut SessionContext> {
        self.sessions.get_mut(&id).map(|entry| &mut entry.context)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no session exists.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn is_expired(entry: &SessionEntry, now: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(entry.last_seen) >= ttl
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(SessionUser::new("Tester", "Head Office"))
    }

    #[test]
    fn test_new_session_defaults() {
        let mut registry = registry();
        let (id, minted) = registry.ensure(None);

        assert!(minted);
        let session = registry.get(id).unwrap();
        assert_eq!(session.active_category.id, "news");
        assert_eq!(session.user.name, "Tester");
        assert!(session.search_query.is_empty());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut registry = registry();
        let (id, _) = registry.ensure(None);
        registry.get_mut(id).unwrap().active_category = Category::find("qa").unwrap();

        let (same, minted) = registry.ensure(Some(id));

        assert_eq!(same, id);
        assert!(!minted);
        assert_eq!(registry.get(id).unwrap().active_category.id, "qa");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_id_gets_fresh_session() {
        let mut registry = registry();
        let forged = SessionId(Uuid::new_v4());

        let (id, minted) = registry.ensure(Some(forged));

        assert_ne!(id, forged);
        assert!(minted);
        assert!(registry.get(forged).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_size_is_bounded() {
        let mut registry = SessionRegistry::with_limits(
            SessionUser::new("Tester", "Head Office"),
            SESSION_TTL,
            3,
        );

        for _ in 0..1000 {
            registry.ensure(None);
            registry.ensure(Some(SessionId(Uuid::new_v4())));
        }

        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_least_recently_seen_is_evicted() {
        let mut registry = SessionRegistry::with_limits(
            SessionUser::new("Tester", "Head Office"),
            SESSION_TTL,
            2,
        );
        let (first, _) = registry.ensure(None);
        let (second, _) = registry.ensure(None);
        std::thread::sleep(Duration::from_millis(5));
        registry.ensure(Some(first));

        let (third, _) = registry.ensure(None);

        assert!(registry.get(first).is_some());
        assert!(registry.get(second).is_none());
        assert!(registry.get(third).is_some());
    }

    #[test]
    fn test_expired_session_is_replaced() {
        let mut registry = SessionRegistry::with_limits(
            SessionUser::new("Tester", "Head Office"),
            Duration::ZERO,
            10,
        );
        let (old, _) = registry.ensure(None);

        let (new, minted) = registry.ensure(Some(old));

        assert_ne!(new, old);
        assert!(minted);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut registry = registry();
        let (a, _) = registry.ensure(None);
        let (b, _) = registry.ensure(None);

        registry.get_mut(a).unwrap().active_category = Category::find("cases").unwrap();

        assert_eq!(registry.get(b).unwrap().active_category.id, "news");
    }

    #[test]
    fn test_notices_are_drained() {
        let mut context = SessionContext::new(SessionUser::new("Tester", "Head Office"));
        context.push_notice(Notice::success("Registered"));

        assert_eq!(context.take_notices(), vec![Notice::success("Registered")]);
        assert!(context.take_notices().is_empty());
    }
}
