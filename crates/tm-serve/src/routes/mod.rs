pub mod chat;
pub mod conversations;
pub mod envelope;
pub mod error;
pub mod health;
pub mod tasks;

use crate::middleware::correlation::correlation_middleware;
use crate::{openapi, AppState};
use axum::middleware;
use axum::Router;
use serde::Deserialize;
use tm_core::error::TaskError;
use tm_core::types::UserId;
use tm_core::TaskmateError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::IntoParams;

/// `userId` query parameter shared by the task and conversation routes.
/// Absent means the anonymous `"default"` namespace.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserScope {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

pub fn resolve_user(scope: &UserScope) -> Result<UserId, TaskmateError> {
    match &scope.user_id {
        Some(raw) => UserId::new(raw.clone()).map_err(|err| {
            TaskError::InvalidInput {
                message: err.to_string(),
            }
            .into()
        }),
        None => Ok(UserId::default()),
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(tasks::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(conversations::router(state.clone()))
        .merge(openapi::router());

    Router::new()
        .merge(health::router(state))
        .nest("/api", api)
        .layer(middleware::from_fn(correlation_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
