//! The task record mirrored from the remote `tasks` collection.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// One row of the remote `tasks` collection.
///
/// A fetched list arrives ordered descending by `id` (most recently created
/// first) and is never re-sorted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: i64,
    pub title: String,
    pub completed: bool,
    /// Identifier of the owning identity.
    pub user_id: String,
}

impl Task {
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        self.user_id == identity.id
    }
}
