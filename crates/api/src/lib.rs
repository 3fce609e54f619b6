#![forbid(unsafe_code)]

//! HTTP surface for the weekly goal tracker.

pub mod dto;
pub mod error;
mod goals;
mod progress;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use services::AppServices;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub services: AppServices,
}

/// Which origins may call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    Any,
    Exact(String),
}

impl CorsOrigin {
    /// `*` means any origin; anything else is taken as a single exact origin.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "*" => Self::Any,
            origin => Self::Exact(origin.trim_end_matches('/').to_string()),
        }
    }

    fn layer(&self) -> CorsLayer {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        match self {
            Self::Any => cors.allow_origin(Any),
            Self::Exact(origin) => match HeaderValue::from_str(origin) {
                Ok(value) => cors.allow_origin(value),
                Err(_) => {
                    tracing::warn!(%origin, "frontend origin is not a valid header value; CORS disabled");
                    cors
                }
            },
        }
    }
}

/// Build the application router: goal and progress routes under `/api`,
/// plus `/health` at the root.
pub fn router(services: AppServices, cors: &CorsOrigin) -> Router {
    let state = ServerState { services };

    let api = Router::new()
        .route("/goals", get(goals::list_goals).post(goals::create_goal))
        .route(
            "/goals/{id}",
            get(goals::get_goal)
                .put(goals::update_goal)
                .delete(goals::delete_goal),
        )
        .route("/goals/{id}/progress", axum::routing::put(progress::record_progress))
        .route("/goals/{id}/progress/current", get(progress::current_progress))
        .route("/goals/{id}/progress/history", get(progress::history))
        .route("/goals/{id}/progress/summary", get(progress::summary));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(cors.layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
