pub mod middleware;
pub mod openapi;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tm_ai::Generator;
use tm_core::{Taskmate, TaskmateError};
use tm_db::DbStore;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub db_path: String,
    pub generator: Arc<dyn Generator>,
    pub environment: String,
}

impl AppState {
    pub fn non_production(&self) -> bool {
        self.environment != "production"
    }
}

/// One orchestrator per request, over a freshly opened store. No state is
/// shared between requests beyond the database file itself.
pub fn build_taskmate(state: &AppState) -> Result<Taskmate<DbStore>, TaskmateError> {
    let store = DbStore::open(state.db_path.as_str()).map_err(|err| TaskmateError::Internal {
        message: err.to_string(),
    })?;
    Ok(Taskmate::new(store, state.generator.clone()))
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "taskmate api listening");
    axum::serve(listener, app(state)).await
}
