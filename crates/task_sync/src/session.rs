//! Session Manager - single source of truth for "who is signed in".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info, warn};
use supabase_client::{AuthStateChange, Result, SupabaseClientTrait};
use task_core::Identity;
use tokio::sync::RwLock;

use crate::store::SessionStore;

/// Tracks the signed-in identity, persists it through a [`SessionStore`] and
/// applies session-change notifications. All remote failures are logged and
/// returned to the caller; prior state is never touched on failure.
pub struct SessionManager {
    client: Arc<dyn SupabaseClientTrait>,
    store: Arc<dyn SessionStore>,
    identity: RwLock<Option<Identity>>,
    loading: AtomicBool,
}

impl SessionManager {
    pub fn new(client: Arc<dyn SupabaseClientTrait>, store: Arc<dyn SessionStore>) -> Self {
        SessionManager {
            client,
            store,
            identity: RwLock::new(None),
            loading: AtomicBool::new(true),
        }
    }

    /// Identity of the signed-in user, if any.
    pub async fn identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    /// True until [`SessionManager::restore_session`] has resolved one way
    /// or the other. Shells hold off rendering the authenticated branch
    /// while this is set.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Attempt to resume a previous session before the shell renders
    /// anything: the local store first, then the remote session check.
    pub async fn restore_session(&self) -> Option<Identity> {
        let restored = self.try_restore().await;
        self.loading.store(false, Ordering::SeqCst);
        restored
    }

    async fn try_restore(&self) -> Option<Identity> {
        match self.store.load() {
            Ok(Some(session)) if session.is_usable() => {
                match self.client.set_session(session).await {
                    Ok(identity) => {
                        info!("restored session for {}", identity.id);
                        *self.identity.write().await = Some(identity.clone());
                        return Some(identity);
                    }
                    Err(err) => warn!("failed to adopt persisted session: {err}"),
                }
            }
            Ok(Some(_)) => {
                info!("persisted session expired, discarding");
                if let Err(err) = self.store.clear() {
                    warn!("failed to clear session file: {err}");
                }
            }
            Ok(None) => {}
            Err(err) => warn!("failed to read persisted session: {err}"),
        }

        match self.client.get_session().await {
            Ok(Some(session)) => {
                let identity = session.user.clone();
                *self.identity.write().await = Some(identity.clone());
                Some(identity)
            }
            Ok(None) => None,
            Err(err) => {
                error!("session check failed: {err}");
                None
            }
        }
    }

    /// Register a new account. Local identity is untouched: the service may
    /// require confirmation before the account is usable.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        match self.client.sign_up(email, password).await {
            Ok(identity) => Ok(identity),
            Err(err) => {
                error!("sign-up failed: {err}");
                Err(err)
            }
        }
    }

    /// Exchange credentials for a session. The identity itself is applied by
    /// the session-change notification; the returned value lets one-shot
    /// callers render immediately.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        match self.client.sign_in_with_password(email, password).await {
            Ok(session) => Ok(session.user),
            Err(err) => {
                error!("sign-in failed: {err}");
                Err(err)
            }
        }
    }

    /// Request session termination. The cascade (cleared store, cleared
    /// identity, emptied task list) runs off the session-change
    /// notification.
    pub async fn sign_out(&self) -> Result<()> {
        match self.client.sign_out().await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("sign-out failed: {err}");
                Err(err)
            }
        }
    }

    /// Apply one session-change notification. Idempotent: re-delivery of the
    /// same identity re-persists the same session.
    pub async fn handle_auth_change(&self, change: &AuthStateChange) {
        match &change.session {
            Some(session) => {
                if let Err(err) = self.store.save(session) {
                    warn!("failed to persist session: {err}");
                }
                *self.identity.write().await = Some(session.user.clone());
            }
            None => {
                if let Err(err) = self.store.clear() {
                    warn!("failed to clear persisted session: {err}");
                }
                *self.identity.write().await = None;
            }
        }
    }
}
