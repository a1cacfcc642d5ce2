use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tasksync_core::api::Envelope;
use tasksync_core::task::{CreateTask, Task};
use tasksync_service::{ServiceError, TaskService};

use super::AppState;

type ApiError = (StatusCode, Json<Envelope<()>>);

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", put(toggle_task).delete(delete_task))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Task>>>, ApiError> {
    state
        .service
        .list_tasks()
        .await
        .map(|t| Json(Envelope::success(t)))
        .map_err(to_error)
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    let Json(input) = payload
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(Envelope::error(e.body_text()))))?;
    state
        .service
        .create_task(&input)
        .await
        .map(|t| Json(Envelope::success_with(t, "Task created successfully")))
        .map_err(to_error)
}

async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    state
        .service
        .toggle_task(&id)
        .await
        .map(|t| Json(Envelope::success_with(t, "Task updated successfully")))
        .map_err(to_error)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .delete_task(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(to_error)
}

fn to_error(e: ServiceError) -> ApiError {
    let status = match &e {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(Envelope::error(e.to_string())))
}
