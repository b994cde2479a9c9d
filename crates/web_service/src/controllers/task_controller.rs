use actix_web::web::{Data, Json, Path};
use actix_web::{web, HttpResponse};

use crate::dto::{NewTaskRequest, SuccessResponse, TaskDTO};
use crate::error::{AppError, Result};
use crate::server::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .route("", web::get().to(list_tasks))
            .route("", web::post().to(add_task))
            .route("/refresh", web::post().to(refresh_tasks))
            .route("/{id}/toggle", web::post().to(toggle_task))
            .route("/{id}", web::delete().to(delete_task)),
    );
}

async fn current_tasks(state: &AppState) -> Vec<TaskDTO> {
    state
        .synchronizer
        .snapshot()
        .await
        .into_iter()
        .map(Into::into)
        .collect()
}

/// GET /v1/tasks
///
/// The mirrored list, most recently created first.
async fn list_tasks(state: Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(current_tasks(&state).await))
}

/// POST /v1/tasks/refresh
///
/// Force a fetch for the active identity.
async fn refresh_tasks(state: Data<AppState>) -> Result<HttpResponse> {
    let identity = state
        .session_manager
        .identity()
        .await
        .ok_or(AppError::NotSignedIn)?;
    state.synchronizer.fetch_all(&identity.id).await?;
    Ok(HttpResponse::Ok().json(current_tasks(&state).await))
}

/// POST /v1/tasks
async fn add_task(state: Data<AppState>, body: Json<NewTaskRequest>) -> Result<HttpResponse> {
    let identity = state
        .session_manager
        .identity()
        .await
        .ok_or(AppError::NotSignedIn)?;
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::EmptyTitle);
    }
    if !state.synchronizer.add(title, &identity.id).await? {
        return Err(AppError::NotSignedIn);
    }
    Ok(HttpResponse::Created().json(current_tasks(&state).await))
}

/// POST /v1/tasks/{id}/toggle
async fn toggle_task(state: Data<AppState>, path: Path<i64>) -> Result<HttpResponse> {
    let task_id = path.into_inner();
    state
        .session_manager
        .identity()
        .await
        .ok_or(AppError::NotSignedIn)?;
    if !state.synchronizer.toggle_complete(task_id).await? {
        return Err(AppError::TaskNotFound(task_id));
    }
    let toggled = state
        .synchronizer
        .snapshot()
        .await
        .into_iter()
        .find(|task| task.id == task_id)
        .map(TaskDTO::from);
    Ok(HttpResponse::Ok().json(toggled))
}

/// DELETE /v1/tasks/{id}
async fn delete_task(state: Data<AppState>, path: Path<i64>) -> Result<HttpResponse> {
    let task_id = path.into_inner();
    state
        .session_manager
        .identity()
        .await
        .ok_or(AppError::NotSignedIn)?;
    state.synchronizer.remove(task_id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse {
        message: format!("task {task_id} deleted"),
    }))
}
