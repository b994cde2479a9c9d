//! task_sync - the client-side session/data synchronization lifecycle
//!
//! Two components, identical in intent across both shells:
//! - `session` - SessionManager, the single source of truth for "who is
//!   signed in", plus the durable `store` it persists through
//! - `sync` - TaskListSynchronizer, which mirrors the server-confirmed task
//!   set for the active identity
//!
//! `events::spawn_session_listener` is the standing subscription that wires
//! session-change notifications from the client into both components.

pub mod events;
pub mod session;
pub mod store;
pub mod sync;

pub use events::spawn_session_listener;
pub use session::SessionManager;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use sync::TaskListSynchronizer;
