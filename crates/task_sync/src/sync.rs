//! Task List Synchronizer - mirrors the server-confirmed task set.
//!
//! Mutations touch local state only after the remote call reports success,
//! using the server's returned representation where available.

use std::sync::Arc;

use log::{debug, error, info, warn};
use supabase_client::{Result, SupabaseClientTrait, SupabaseError};
use task_core::Task;
use tokio::sync::RwLock;

pub struct TaskListSynchronizer {
    client: Arc<dyn SupabaseClientTrait>,
    tasks: RwLock<Vec<Task>>,
    active_owner: RwLock<Option<String>>,
}

impl TaskListSynchronizer {
    pub fn new(client: Arc<dyn SupabaseClientTrait>) -> Self {
        TaskListSynchronizer {
            client,
            tasks: RwLock::new(Vec::new()),
            active_owner: RwLock::new(None),
        }
    }

    /// Current mirrored list, most recently created id first.
    pub async fn snapshot(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    pub async fn active_owner(&self) -> Option<String> {
        self.active_owner.read().await.clone()
    }

    /// Make `owner` the identity whose tasks this list mirrors. `None`
    /// empties the list immediately.
    pub async fn set_active_owner(&self, owner: Option<String>) {
        let cleared = owner.is_none();
        {
            let mut active = self.active_owner.write().await;
            *active = owner;
        }
        if cleared {
            self.tasks.write().await.clear();
        }
    }

    /// Replace the local list with the server's current set for `owner`.
    ///
    /// The request is tagged with the owner it was issued for; if the active
    /// identity moved on by the time the response arrives, the response is
    /// dropped so the most recent identity wins.
    pub async fn fetch_all(&self, owner: &str) -> Result<()> {
        let fetched = match self.client.fetch_tasks(owner).await {
            Ok(rows) => rows,
            Err(err) => {
                error!("failed to fetch tasks for {owner}: {err}");
                return Err(err);
            }
        };
        let accepted: Vec<Task> = fetched
            .into_iter()
            .filter(|task| {
                if task.user_id == owner {
                    true
                } else {
                    warn!("dropping task {} owned by another identity", task.id);
                    false
                }
            })
            .collect();

        let active = self.active_owner.read().await;
        if active.as_deref() != Some(owner) {
            debug!("discarding task fetch for superseded identity {owner}");
            return Ok(());
        }
        let mut tasks = self.tasks.write().await;
        info!("synchronized {} tasks for {owner}", accepted.len());
        *tasks = accepted;
        Ok(())
    }

    /// Insert a new task. Returns `false` without issuing a request when the
    /// trimmed title is empty or `owner` is not the active identity.
    /// Confirmed rows are appended in the server's response order.
    pub async fn add(&self, title: &str, owner: &str) -> Result<bool> {
        let title = title.trim();
        if title.is_empty() {
            debug!("ignoring task with empty title");
            return Ok(false);
        }
        {
            let active = self.active_owner.read().await;
            if active.as_deref() != Some(owner) {
                debug!("ignoring add without an active identity");
                return Ok(false);
            }
        }

        let inserted = match self.client.insert_task(title, owner).await {
            Ok(rows) => rows,
            Err(err) => {
                error!("failed to add task: {err}");
                return Err(err);
            }
        };

        let active = self.active_owner.read().await;
        if active.as_deref() != Some(owner) {
            debug!("insert confirmed after the identity changed, not mirrored");
            return Ok(true);
        }
        let mut tasks = self.tasks.write().await;
        tasks.extend(inserted.into_iter().filter(|task| task.user_id == owner));
        Ok(true)
    }

    /// Flip the completed flag on the task with `task_id`. Returns `false`
    /// when no such task is in the local list.
    pub async fn toggle_complete(&self, task_id: i64) -> Result<bool> {
        let current = {
            let tasks = self.tasks.read().await;
            match tasks.iter().find(|task| task.id == task_id) {
                Some(task) => task.completed,
                None => {
                    warn!("toggle requested for unknown task {task_id}");
                    return Ok(false);
                }
            }
        };

        if let Err(err) = self.client.set_task_completed(task_id, !current).await {
            error!("failed to update task {task_id}: {err}");
            return Err(err);
        }

        let mut tasks = self.tasks.write().await;
        if let Some(task) = tasks.iter_mut().find(|task| task.id == task_id) {
            task.completed = !current;
        }
        Ok(true)
    }

    /// Delete the task with `task_id`. The local entry goes away only once
    /// the server confirms the row existed; deleting an already-deleted id
    /// fails remotely and leaves local state unchanged.
    pub async fn remove(&self, task_id: i64) -> Result<()> {
        if let Err(err) = self.client.delete_task(task_id).await {
            match &err {
                SupabaseError::RowNotFound => warn!("delete for task {task_id} matched no rows"),
                _ => error!("failed to delete task {task_id}: {err}"),
            }
            return Err(err);
        }

        let mut tasks = self.tasks.write().await;
        if let Some(index) = tasks.iter().position(|task| task.id == task_id) {
            tasks.remove(index);
        }
        Ok(())
    }
}
