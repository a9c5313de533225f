use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use services::services::task::TaskDto;

use crate::{AppState, error::ApiError};

pub async fn get_tasks(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<TaskDto>>, ApiError> {
    let tasks = state.tasks().list_tasks().await?;
    Ok(ResponseJson(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<TaskDto>, ApiError> {
    let task = state.tasks().get_task(id).await?;
    Ok(ResponseJson(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskDto>,
) -> Result<(StatusCode, ResponseJson<TaskDto>), ApiError> {
    let created = state.tasks().create_task(&payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(created)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TaskDto>,
) -> Result<ResponseJson<TaskDto>, ApiError> {
    let updated = state.tasks().update_task(id, &payload).await?;
    Ok(ResponseJson(updated))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<String, ApiError> {
    state.tasks().delete_task(id).await?;
    Ok("Task deleted successfully".to_string())
}

// An empty match set reports 404 here, unlike GET /tasks which returns
// an empty 200 array; the service itself treats both as valid results.
pub async fn get_tasks_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<ResponseJson<Vec<TaskDto>>, ApiError> {
    let tasks = state.tasks().list_tasks_by_status(&status).await?;
    if tasks.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No tasks found with status: {status}"
        )));
    }
    Ok(ResponseJson(tasks))
}

pub fn router() -> Router<AppState> {
    let inner = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .route("/status/{status}", get(get_tasks_by_status))
        .route(
            "/{id}",
            get(get_task).put(update_task).delete(delete_task),
        );

    Router::new().nest("/tasks", inner)
}
