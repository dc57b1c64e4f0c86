//! Auth collaborator contract and the auth gate.
//!
//! The gate suspends a checkout action while the user signs in. It is a
//! single-slot continuation modeled as a pending-action value rather than a
//! stored closure, so a stale callback can never survive an unrelated
//! re-opening: opening the gate again simply replaces the slot.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::checkout::PendingCheckout;

/// Session status reported by the auth service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Idle,
    Loading,
    Authenticated,
    Unauthenticated,
}

/// The signed-in user, when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

/// The external auth collaborator.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn status(&self) -> AuthStatus;
    async fn current_user(&self) -> Option<AuthUser>;
}

/// Single-slot continuation for a checkout action suspended on login.
#[derive(Debug, Default)]
pub struct AuthGate {
    pending: Mutex<Option<PendingCheckout>>,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the gate with an action to resume after authentication.
    /// Replaces any previously stored action.
    pub fn open(&self, action: PendingCheckout) {
        let mut slot = self.pending.lock();
        if slot.is_some() {
            debug!("auth gate re-opened; replacing pending action");
        }
        *slot = Some(action);
    }

    /// Closes the gate, discarding any pending action.
    pub fn close(&self) {
        *self.pending.lock() = None;
    }

    /// Consumes the pending action, if any. Called once authentication
    /// succeeds.
    pub fn take_pending(&self) -> Option<PendingCheckout> {
        self.pending.lock().take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}
