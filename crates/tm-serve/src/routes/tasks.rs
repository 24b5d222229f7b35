use crate::routes::envelope::{to_data, Envelope};
use crate::routes::error::map_error;
use crate::routes::{resolve_user, UserScope};
use crate::{build_taskmate, AppState};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::str::FromStr;
use tm_core::error::TaskError;
use tm_core::types::{TaskId, UpdateTaskInput};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(state)
}

fn parse_task_id(raw: &str) -> Result<TaskId, tm_core::TaskmateError> {
    TaskId::from_str(raw).map_err(|err| {
        TaskError::InvalidInput {
            message: err.to_string(),
        }
        .into()
    })
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    params(UserScope),
    responses((status = 200, body = Envelope))
)]
pub(crate) async fn list_tasks(
    State(state): State<AppState>,
    Query(scope): Query<UserScope>,
) -> Response {
    let core = match build_taskmate(&state) {
        Ok(core) => core,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    let user_id = match resolve_user(&scope) {
        Ok(user_id) => user_id,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    match core.tasks().list(&user_id) {
        Ok(tasks) => Json(Envelope::success(
            to_data(&tasks),
            "Tasks retrieved successfully",
        ))
        .into_response(),
        Err(err) => map_error(&err, state.non_production()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID"), UserScope),
    responses((status = 200, body = Envelope), (status = 404, body = Envelope))
)]
pub(crate) async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(scope): Query<UserScope>,
) -> Response {
    let core = match build_taskmate(&state) {
        Ok(core) => core,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    let user_id = match resolve_user(&scope) {
        Ok(user_id) => user_id,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    let task_id = match parse_task_id(&id) {
        Ok(task_id) => task_id,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    match core.tasks().get(&user_id, &task_id) {
        Ok(task) => Json(Envelope::success(
            to_data(&task),
            "Task retrieved successfully",
        ))
        .into_response(),
        Err(err) => map_error(&err, state.non_production()).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID"), UserScope),
    request_body = UpdateTaskInput,
    responses((status = 200, body = Envelope), (status = 404, body = Envelope))
)]
pub(crate) async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(scope): Query<UserScope>,
    Json(input): Json<UpdateTaskInput>,
) -> Response {
    let core = match build_taskmate(&state) {
        Ok(core) => core,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    let user_id = match resolve_user(&scope) {
        Ok(user_id) => user_id,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    let task_id = match parse_task_id(&id) {
        Ok(task_id) => task_id,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    match core.tasks().update(&user_id, &task_id, input) {
        Ok(task) => Json(Envelope::success(
            to_data(&task),
            "Task updated successfully",
        ))
        .into_response(),
        Err(err) => map_error(&err, state.non_production()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID"), UserScope),
    responses((status = 200, body = Envelope), (status = 404, body = Envelope))
)]
pub(crate) async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(scope): Query<UserScope>,
) -> Response {
    let core = match build_taskmate(&state) {
        Ok(core) => core,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    let user_id = match resolve_user(&scope) {
        Ok(user_id) => user_id,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    let task_id = match parse_task_id(&id) {
        Ok(task_id) => task_id,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    match core.tasks().delete(&user_id, &task_id) {
        Ok(()) => Json(Envelope::success(None, "Task deleted successfully")).into_response(),
        Err(err) => map_error(&err, state.non_production()).into_response(),
    }
}
