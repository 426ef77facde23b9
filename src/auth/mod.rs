//! Authentication for LocalShare.
//!
//! This module provides constant-time credential checks, the server-side
//! session store and the access gates applied to file routes.

mod gate;
mod session;
mod verify;

pub use gate::{
    admin_gate, check_gates, pin_gate, AccessPolicy, Gate, GateError, READ_GATES, WRITE_GATES,
};
pub use session::{
    start_session_cleanup_task, Session, SessionContext, SessionError, SessionFlags, SessionStore,
    CLEANUP_INTERVAL_SECS, MAX_SESSIONS, SESSION_COOKIE, SESSION_TTL_SECS,
};
pub use verify::{verify_admin, verify_pin};
