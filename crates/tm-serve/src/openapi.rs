use crate::routes::envelope::{ChatEnvelope, Envelope};
use crate::routes::health::HealthResponse;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tm_ai::AiAction;
use tm_core::types::chat::{AlternativeSlot, ChatInput, ResolveConflictInput};
use tm_core::types::conversation::ConversationTurn;
use tm_core::types::enums::{Category, ChatIntent, Priority, RecurrenceKind, TaskStatus, TurnKind};
use tm_core::types::ids::{ConversationId, TaskId, UserId};
use tm_core::types::io::{CreateTaskInput, CreateTurnInput, UpdateTaskInput};
use tm_core::types::task::{Collaboration, Recurrence, Reminder, Task, TaskDraft};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskmate API",
        description = "Conversational task management: natural-language chat in, scheduled tasks out."
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::tasks::list_tasks,
        crate::routes::tasks::get_task,
        crate::routes::tasks::update_task,
        crate::routes::tasks::delete_task,
        crate::routes::chat::process_message,
        crate::routes::chat::resolve_conflict,
        crate::routes::conversations::list_conversations
    ),
    components(schemas(
        Envelope,
        ChatEnvelope,
        HealthResponse,
        Task,
        TaskDraft,
        Recurrence,
        Reminder,
        Collaboration,
        ConversationTurn,
        CreateTaskInput,
        UpdateTaskInput,
        CreateTurnInput,
        ChatInput,
        ResolveConflictInput,
        AlternativeSlot,
        TaskId,
        ConversationId,
        UserId,
        Category,
        Priority,
        TaskStatus,
        RecurrenceKind,
        TurnKind,
        ChatIntent,
        AiAction
    ))
)]
struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn ensure_initialized() {
    let _ = ApiDoc::openapi();
}

pub fn router() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn swagger_ui() -> impl IntoResponse {
    let html = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Taskmate API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
      window.ui = SwaggerUIBundle({ url: '/api/openapi.json', dom_id: '#swagger-ui' });
    </script>
  </body>
</html>
"#;
    (axum::http::StatusCode::OK, axum::response::Html(html))
}
