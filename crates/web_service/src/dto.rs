//! Request and response shapes for the JSON surface.

use serde::{Deserialize, Serialize};
use task_core::{Identity, Task};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityDTO {
    pub id: String,
    pub email: Option<String>,
}

impl From<Identity> for IdentityDTO {
    fn from(identity: Identity) -> Self {
        IdentityDTO {
            id: identity.id,
            email: identity.email,
        }
    }
}

/// Response: GET /v1/session
#[derive(Debug, Serialize)]
pub struct SessionDTO {
    pub identity: Option<IdentityDTO>,
    pub loading: bool,
}

#[derive(Debug, Serialize)]
pub struct TaskDTO {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub user_id: String,
}

impl From<Task> for TaskDTO {
    fn from(task: Task) -> Self {
        TaskDTO {
            id: task.id,
            title: task.title,
            completed: task.completed,
            user_id: task.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewTaskRequest {
    pub title: String,
}

/// Response: success message envelope
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}
