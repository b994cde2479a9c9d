use async_trait::async_trait;
use task_core::{Identity, Session, Task};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::events::AuthStateChange;

/// Boundary to the remote backend-as-a-service.
///
/// The session manager and the task list synchronizer talk to the service
/// exclusively through this trait so tests can substitute a scripted
/// implementation for the real HTTP client.
#[async_trait]
pub trait SupabaseClientTrait: Send + Sync {
    /// Register a new account. The service may require email confirmation,
    /// so this never installs a session.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Exchange credentials for a session and install it as current.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Terminate the current session.
    async fn sign_out(&self) -> Result<()>;

    /// Validate the current in-process session against the service.
    async fn get_session(&self) -> Result<Option<Session>>;

    /// Install a previously persisted session without a network round trip.
    async fn set_session(&self, session: Session) -> Result<Identity>;

    /// All tasks owned by `user_id`, ordered descending by id.
    async fn fetch_tasks(&self, user_id: &str) -> Result<Vec<Task>>;

    /// Insert a task and return the stored representation.
    async fn insert_task(&self, title: &str, user_id: &str) -> Result<Vec<Task>>;

    /// Set the completed flag on a task row.
    async fn set_task_completed(&self, task_id: i64, completed: bool) -> Result<()>;

    /// Delete a task row. Fails with [`crate::SupabaseError::RowNotFound`]
    /// when the row is already gone.
    async fn delete_task(&self, task_id: i64) -> Result<()>;

    /// Subscribe to session transitions (sign-in, sign-out, refresh).
    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthStateChange>;
}
