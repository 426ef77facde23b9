//! Server-side session store.
//!
//! A session is an opaque token (UUID v4) carried in the
//! `localshare_session` cookie. The token maps to a pair of flags recording
//! whether the client passed the PIN check and the admin login. Everything
//! else lives on the server.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "localshare_session";

/// Session lifetime (7 days).
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Maximum number of live sessions held in memory.
pub const MAX_SESSIONS: usize = 10_000;

/// Interval between expired-session sweeps (1 hour).
pub const CLEANUP_INTERVAL_SECS: u64 = 60 * 60;

/// Session store errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The store lock was poisoned by a panicking writer.
    #[error("session store unavailable")]
    Unavailable,

    /// Too many live sessions to create another.
    #[error("session capacity of {0} reached")]
    CapacityReached(usize),
}

/// Authorization flags held by a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    /// The client submitted the correct PIN.
    pub pin_verified: bool,
    /// The client logged in with the admin credentials.
    pub admin_authenticated: bool,
}

/// A stored session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session token.
    pub token: String,
    /// Authorization flags.
    pub flags: SessionFlags,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session with empty flags.
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().to_string(),
            flags: SessionFlags::default(),
            created_at: now,
            expires_at: now + chrono::Duration::from_std(ttl).unwrap_or_default(),
        }
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// The session attached to one request.
///
/// Handlers mutate the flags and hand the context back to
/// [`SessionStore::save`]. A context with no session behind it gets one
/// created on save.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Option<Session>,
    flags: SessionFlags,
}

impl SessionContext {
    /// Context for a request that carried no valid session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    fn from_session(session: Session) -> Self {
        Self {
            flags: session.flags,
            session: Some(session),
        }
    }

    /// Current flags (all false for an anonymous request).
    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    /// Token of the backing session, if any.
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Whether a stored session backs this context.
    pub fn is_established(&self) -> bool {
        self.session.is_some()
    }

    pub fn mark_pin_verified(&mut self) {
        self.flags.pin_verified = true;
    }

    pub fn mark_admin_authenticated(&mut self) {
        self.flags.admin_authenticated = true;
    }

    pub fn clear_admin(&mut self) {
        self.flags.admin_authenticated = false;
    }
}

/// In-memory session store shared by all request handlers.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store with the default lifetime and capacity.
    pub fn new() -> Self {
        Self::with_limits(Duration::from_secs(SESSION_TTL_SECS), MAX_SESSIONS)
    }

    /// Create a store with a custom lifetime and capacity.
    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Session lifetime applied on every save.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Load the context for a request.
    ///
    /// A missing, unknown or expired token yields an anonymous context.
    pub fn load(&self, token: Option<&str>) -> Result<SessionContext, SessionError> {
        let Some(token) = token else {
            return Ok(SessionContext::anonymous());
        };

        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionError::Unavailable)?;

        match sessions.get(token) {
            Some(session) if !session.is_expired() => {
                Ok(SessionContext::from_session(session.clone()))
            }
            Some(_) => {
                debug!(token = %token, "Session expired");
                Ok(SessionContext::anonymous())
            }
            None => Ok(SessionContext::anonymous()),
        }
    }

    /// Persist the flags of a context.
    ///
    /// Creates a session when the context has none. Every save extends the
    /// expiry to one full lifetime from now. Returns the stored session so the
    /// caller can refresh the cookie.
    pub fn save(&self, context: &SessionContext) -> Result<Session, SessionError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::Unavailable)?;

        let existing = context
            .token()
            .and_then(|token| sessions.get(token))
            .filter(|session| !session.is_expired())
            .cloned();

        let mut session = match existing {
            Some(session) => session,
            None => {
                if sessions.len() >= self.capacity {
                    sessions.retain(|_, s| !s.is_expired());
                }
                if sessions.len() >= self.capacity {
                    return Err(SessionError::CapacityReached(self.capacity));
                }
                let session = Session::new(self.ttl);
                debug!(token = %session.token, "Session created");
                session
            }
        };

        session.flags = context.flags();
        session.expires_at = Utc::now() + chrono::Duration::from_std(self.ttl).unwrap_or_default();
        sessions.insert(session.token.clone(), session.clone());

        Ok(session)
    }

    /// Remove expired sessions. Returns how many were removed.
    pub fn cleanup(&self) -> Result<usize, SessionError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::Unavailable)?;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        Ok(before - sessions.len())
    }

    /// Number of stored sessions, expired ones included.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Start a background task that periodically removes expired sessions.
///
/// The task runs until the runtime shuts down.
pub fn start_session_cleanup_task(
    store: Arc<SessionStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.cleanup() {
                Ok(0) => {}
                Ok(removed) => info!(removed = removed, "Cleaned up expired sessions"),
                Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
            }
        }
    })
}
