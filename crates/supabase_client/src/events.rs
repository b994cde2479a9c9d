//! Session-change notifications delivered to subscribers.

use task_core::Session;

/// Which transition produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Payload delivered on every session transition. `session` is absent after
/// a sign-out. Subscribers must tolerate re-delivery of the same identity.
#[derive(Debug, Clone)]
pub struct AuthStateChange {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}
