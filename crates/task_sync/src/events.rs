//! Wires session-change notifications into the components that react to
//! them.

use std::sync::Arc;

use log::{debug, error};
use supabase_client::SupabaseClientTrait;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::session::SessionManager;
use crate::sync::TaskListSynchronizer;

/// Register the standing session-change subscription. Called once at shell
/// startup; the returned handle lives for the rest of the process.
///
/// Each notification sets the new identity as current, persists it (or
/// clears the store), and triggers a task fetch when an identity is present
/// or clears the list when absent. Re-delivery of the same identity only
/// causes a re-fetch.
pub fn spawn_session_listener(
    client: Arc<dyn SupabaseClientTrait>,
    session: Arc<SessionManager>,
    sync: Arc<TaskListSynchronizer>,
) -> JoinHandle<()> {
    let mut changes = client.on_auth_state_change();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    session.handle_auth_change(&change).await;
                    match change.session.as_ref().map(|s| s.user.id.clone()) {
                        Some(owner) => {
                            sync.set_active_owner(Some(owner.clone())).await;
                            if let Err(err) = sync.fetch_all(&owner).await {
                                error!("task fetch after session change failed: {err}");
                            }
                        }
                        None => sync.set_active_owner(None).await,
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!("session listener lagged, skipped {skipped} notifications");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
