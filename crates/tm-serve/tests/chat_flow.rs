//! End-to-end request tests over the real router, a real on-disk store,
//! and a scripted generator in place of the remote completion endpoint.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tm_ai::{Generator, GeneratorError};
use tm_core::tasks::TaskRepository;
use tm_core::types::{CreateTaskInput, TaskDraft, UserId};
use tm_core::Store;
use tm_db::DbStore;
use tm_serve::AppState;
use tower::ServiceExt;

struct Scripted {
    reply: String,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Generator for Scripted {
    async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

fn test_state(reply: &str) -> (AppState, Arc<Scripted>) {
    let generator = Scripted::new(reply);
    let state = AppState {
        db_path: tm_db::schema::test_db_path().to_string_lossy().into_owned(),
        generator: generator.clone(),
        environment: "test".to_string(),
    };
    (state, generator)
}

fn seed_task(state: &AppState, user: &str, title: &str, start: &str, duration: u32) -> String {
    let store = DbStore::open(state.db_path.as_str()).unwrap();
    let task = store
        .tasks()
        .create(CreateTaskInput::from_draft(
            UserId::new(user.to_string()).unwrap(),
            TaskDraft {
                title: Some(title.to_string()),
                start_date: Some(start.parse().unwrap()),
                duration_minutes: Some(duration),
                ..TaskDraft::default()
            },
        ))
        .unwrap();
    task.id.as_str().to_string()
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (state, _) = test_state("{}");
    let (status, body) = send(tm_serve::app(state), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn empty_chat_message_is_rejected_before_any_work() {
    let (state, generator) = test_state("{}");

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "POST",
        "/api/chat",
        Some(json!({ "message": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Message is required");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

    // Nothing was persisted either.
    let (_, conversations) = send(
        tm_serve::app(state),
        "GET",
        "/api/conversations",
        None,
    )
    .await;
    assert_eq!(conversations["data"], json!([]));
}

#[tokio::test]
async fn chat_create_persists_task_and_transcript() {
    let (state, _) = test_state(
        r#"```json
{"action":"create_task","message":"Scheduled your dentist visit","suggestions":["Add a reminder"],
 "task_data":[{"title":"Dentist","startDate":"2026-08-07T09:00:00Z","duration":60}]}
```"#,
    );

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "POST",
        "/api/chat",
        Some(json!({ "message": "Dentist tomorrow at 9am for an hour" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["action"], "create_task");
    assert_eq!(body["data"]["title"], "Dentist");
    assert_eq!(body["suggestions"], json!(["Add a reminder"]));

    let (_, tasks) = send(tm_serve::app(state.clone()), "GET", "/api/tasks", None).await;
    assert_eq!(tasks["data"].as_array().unwrap().len(), 1);

    let (_, conversations) = send(
        tm_serve::app(state),
        "GET",
        "/api/conversations",
        None,
    )
    .await;
    let turns = conversations["data"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["type"], "user");
    assert_eq!(turns[1]["type"], "assistant");
}

#[tokio::test]
async fn conflicting_create_returns_alternatives_and_persists_nothing() {
    let (state, _) = test_state(
        r#"{"action":"create_task","message":"Scheduled it",
            "task_data":[{"title":"Standup","startDate":"2026-08-07T09:00:00Z","duration":60}]}"#,
    );
    seed_task(&state, "default", "Existing", "2026-08-07T09:00:00Z", 60);

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "POST",
        "/api/chat",
        Some(json!({ "message": "Create a task for tomorrow at 9am, 60 minutes" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "conflict_resolution");
    assert_eq!(body["data"]["hasConflicts"], true);
    assert_eq!(body["data"]["conflicts"][0]["title"], "Existing");
    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    let blocked: chrono::DateTime<chrono::Utc> = "2026-08-07T09:00:00Z".parse().unwrap();
    for alternative in body["data"]["alternatives"].as_array().unwrap() {
        let time: chrono::DateTime<chrono::Utc> =
            alternative["time"].as_str().unwrap().parse().unwrap();
        assert_ne!(time, blocked);
    }

    let (_, tasks) = send(tm_serve::app(state), "GET", "/api/tasks", None).await;
    assert_eq!(tasks["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn garbage_reply_maps_to_422_and_keeps_only_user_turn() {
    let (state, _) = test_state("The weather is nice today.");

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "POST",
        "/api/chat",
        Some(json!({ "message": "Plan something" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(!body["details"]["suggestions"].as_array().unwrap().is_empty());

    let (_, conversations) = send(
        tm_serve::app(state),
        "GET",
        "/api/conversations",
        None,
    )
    .await;
    let turns = conversations["data"].as_array().unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0]["type"], "user");
}

#[tokio::test]
async fn invalid_intent_is_rejected() {
    let (state, generator) = test_state("{}");
    let (status, body) = send(
        tm_serve::app(state),
        "POST",
        "/api/chat",
        Some(json!({ "message": "hello", "intent": "world_domination" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("invalid intent"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resolve_conflict_schedules_at_the_chosen_time() {
    let (state, _) = test_state("{}");
    seed_task(&state, "default", "Existing", "2026-08-07T09:00:00Z", 60);

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "POST",
        "/api/chat/resolve-conflict",
        Some(json!({
            "task": { "title": "Standup", "duration": 60 },
            "startDate": "2026-08-07T10:00:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "create_task");
    assert_eq!(body["message"], "Conflict resolved successfully");

    let (_, tasks) = send(tm_serve::app(state), "GET", "/api/tasks", None).await;
    assert_eq!(tasks["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn resolve_conflict_rejects_a_still_occupied_slot() {
    let (state, _) = test_state("{}");
    seed_task(&state, "default", "Existing", "2026-08-07T09:00:00Z", 60);

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "POST",
        "/api/chat/resolve-conflict",
        Some(json!({
            "task": { "title": "Standup", "duration": 30 },
            "startDate": "2026-08-07T09:15:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "conflict_resolution");

    let (_, tasks) = send(tm_serve::app(state), "GET", "/api/tasks", None).await;
    assert_eq!(tasks["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn task_crud_over_http() {
    let (state, _) = test_state("{}");
    let id = seed_task(&state, "default", "Dentist", "2026-08-07T09:00:00Z", 60);

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "GET",
        &format!("/api/tasks/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Dentist");

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({ "title": "Dentist (moved)", "priority": "High" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Dentist (moved)");
    assert_eq!(body["data"]["priority"], "High");

    let (status, _) = send(
        tm_serve::app(state.clone()),
        "DELETE",
        &format!("/api/tasks/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        tm_serve::app(state.clone()),
        "GET",
        &format!("/api/tasks/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    // Malformed id is a 400, not a 404.
    let (status, _) = send(
        tm_serve::app(state),
        "GET",
        "/api/tasks/not-a-task-id",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_namespaces_are_isolated() {
    let (state, _) = test_state("{}");
    seed_task(&state, "alice", "Private", "2026-08-07T09:00:00Z", 30);

    let (_, alice) = send(
        tm_serve::app(state.clone()),
        "GET",
        "/api/tasks?userId=alice",
        None,
    )
    .await;
    assert_eq!(alice["data"].as_array().unwrap().len(), 1);

    let (_, bob) = send(
        tm_serve::app(state),
        "GET",
        "/api/tasks?userId=bob",
        None,
    )
    .await;
    assert_eq!(bob["data"].as_array().unwrap().len(), 0);
}
