use crate::routes::envelope::{to_data, Envelope};
use crate::routes::error::map_error;
use crate::routes::{resolve_user, UserScope};
use crate::{build_taskmate, AppState};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/conversations", get(list_conversations))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/conversations",
    params(UserScope),
    responses((status = 200, body = Envelope))
)]
pub(crate) async fn list_conversations(
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
    match core.conversations().history(&user_id) {
        Ok(turns) => Json(Envelope::success(
            to_data(&turns),
            "Conversations retrieved successfully",
        ))
        .into_response(),
        Err(err) => map_error(&err, state.non_production()).into_response(),
    }
}
