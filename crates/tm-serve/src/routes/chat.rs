use crate::routes::envelope::{ChatEnvelope, Envelope};
use crate::routes::error::map_error;
use crate::{build_taskmate, AppState};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use tm_core::types::{ChatInput, ChatOutcome, ResolveConflictInput};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(process_message))
        .route("/chat/resolve-conflict", post(resolve_conflict))
        .with_state(state)
}

fn chat_response(outcome: ChatOutcome) -> Response {
    let envelope = Envelope::success(outcome.payload.to_value(), outcome.message);
    Json(ChatEnvelope {
        suggestions: outcome.suggestions,
        action: outcome.action,
        envelope,
    })
    .into_response()
}

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatInput,
    responses(
        (status = 200, body = ChatEnvelope),
        (status = 400, body = Envelope),
        (status = 422, body = Envelope),
        (status = 503, body = Envelope)
    )
)]
pub(crate) async fn process_message(
    State(state): State<AppState>,
    Json(input): Json<ChatInput>,
) -> Response {
    let core = match build_taskmate(&state) {
        Ok(core) => core,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    match core.chat().process(input, Utc::now()).await {
        Ok(outcome) => chat_response(outcome),
        Err(err) => map_error(&err, state.non_production()).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/chat/resolve-conflict",
    request_body = ResolveConflictInput,
    responses((status = 200, body = ChatEnvelope), (status = 400, body = Envelope))
)]
pub(crate) async fn resolve_conflict(
    State(state): State<AppState>,
    Json(input): Json<ResolveConflictInput>,
) -> Response {
    let core = match build_taskmate(&state) {
        Ok(core) => core,
        Err(err) => return map_error(&err, state.non_production()).into_response(),
    };
    match core.chat().resolve_conflict(input) {
        Ok(outcome) => chat_response(outcome),
        Err(err) => map_error(&err, state.non_production()).into_response(),
    }
}
