use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::data::export::export_file_name;
use crate::server::api::{self, ApiError};
use crate::server::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/players", get(list_players).put(replace_players))
        .route("/api/optimize", post(optimize))
        .route("/api/optimize/export", post(optimize_export))
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(api::health_payload())
}

async fn list_players(State(state): State<AppState>) -> Response {
    let players = state.players();
    Json(api::players_payload(&players)).into_response()
}

async fn replace_players(State(state): State<AppState>, body: String) -> Response {
    match api::parse_players_body(&body, &state.config) {
        Ok((players, payload)) => {
            info!(
                event = "pool_replaced",
                players = players.len(),
                diagnostics = payload.diagnostics.len()
            );
            state.replace_players(players);
            Json(payload).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn optimize(State(state): State<AppState>, body: String) -> Response {
    let players = state.players();
    let config = state.config.clone();
    let solver = state.solver.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        api::optimize_payload(&players, &config, solver.as_ref(), &body)
    })
    .await;
    match outcome {
        Ok(Ok(payload)) => Json(payload).into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(err) => ApiError::Internal(err.to_string()).into_response(),
    }
}

async fn optimize_export(State(state): State<AppState>, body: String) -> Response {
    let players = state.players();
    let config = state.config.clone();
    let solver = state.solver.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        api::export_payload(&players, &config, solver.as_ref(), &body)
    })
    .await;
    match outcome {
        Ok(Ok(csv)) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_file_name(chrono::Utc::now())
            );
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response()
        }
        Ok(Err(err)) => err.into_response(),
        Err(err) => ApiError::Internal(err.to_string()).into_response(),
    }
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(payload) => (StatusCode::BAD_REQUEST, Json(payload)).into_response(),
            ApiError::Parse(_) | ApiError::Import(_) => {
                warn!(event = "bad_request", error = %self);
                error_response(StatusCode::BAD_REQUEST, &self.to_string())
            }
            ApiError::Solver(_) | ApiError::Export(_) | ApiError::Internal(_) => {
                error!(event = "request_failed", error = %self);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &self.to_string())
            }
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "status": "error", "message": message })),
    )
        .into_response()
}
