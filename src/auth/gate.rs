//! Access gates for protected routes.
//!
//! A gate is a pure check over the server's access policy and the flags of
//! the current session. Route groups declare an ordered list of gates; the
//! first gate that fails decides the rejection.

use thiserror::Error;

use super::session::SessionFlags;

/// Which checks the server enforces, fixed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// A PIN is configured and must be verified before reading files.
    pub pin_protected: bool,
    /// Admin login is required before modifying files.
    pub admin_required: bool,
}

/// Rejection produced by a gate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    #[error("PIN verification required")]
    PinRequired,

    #[error("Admin authentication required")]
    AdminRequired,
}

/// A single access check.
pub type Gate = fn(&AccessPolicy, &SessionFlags) -> Result<(), GateError>;

/// Pass when no PIN is configured or the session verified it.
pub fn pin_gate(policy: &AccessPolicy, flags: &SessionFlags) -> Result<(), GateError> {
    if !policy.pin_protected || flags.pin_verified {
        Ok(())
    } else {
        Err(GateError::PinRequired)
    }
}

/// Pass when admin login is disabled or the session is authenticated.
pub fn admin_gate(policy: &AccessPolicy, flags: &SessionFlags) -> Result<(), GateError> {
    if !policy.admin_required || flags.admin_authenticated {
        Ok(())
    } else {
        Err(GateError::AdminRequired)
    }
}

/// Gates for listing and downloading.
pub const READ_GATES: &[Gate] = &[pin_gate];

/// Gates for uploading and deleting. The PIN check runs first.
pub const WRITE_GATES: &[Gate] = &[pin_gate, admin_gate];

/// Run gates in order, stopping at the first rejection.
pub fn check_gates(
    gates: &[Gate],
    policy: &AccessPolicy,
    flags: &SessionFlags,
) -> Result<(), GateError> {
    gates.iter().try_for_each(|gate| gate(policy, flags))
}
