//! REST endpoints for the placement service and the persisted placement.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::CareerRequest;
use super::local::placement_response;
use crate::store::Database;

/// Shared state for placement routes.
#[derive(Clone)]
pub struct PlacementRouteState {
    pub db: Arc<dyn Database>,
}

/// POST /createCareer
///
/// Scores the request and echoes it back as the career profile.
async fn create_career(Json(request): Json<CareerRequest>) -> impl IntoResponse {
    match placement_response(&request) {
        Ok(response) => {
            tracing::info!(
                rank = %request.current_rank,
                starting_tier = %response.starting_tier,
                "Placement computed"
            );
            Json(response).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/placement
///
/// Returns the last confirmed placement, or 404 if none was stored.
async fn get_placement(State(state): State<PlacementRouteState>) -> impl IntoResponse {
    match state.db.load_placement().await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No placement stored yet"})),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load placement");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// Build the placement REST routes.
pub fn placement_routes(state: PlacementRouteState) -> Router {
    Router::new()
        .route("/createCareer", post(create_career))
        .route("/health", get(health))
        .route("/api/placement", get(get_placement))
        .with_state(state)
}
