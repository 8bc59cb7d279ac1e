use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use tracing::{info, warn};
use waypoint_shared::TripMutation;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trips/{id}/mutations", post(apply_mutation))
        .route("/v1/cache", delete(clear_cache))
}

/// POST /v1/trips/{id}/mutations
/// Forwards the edit to the trip backend. The session cache is dropped
/// whether or not the backend accepted it.
async fn apply_mutation(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(mutation): Json<TripMutation>,
) -> Result<StatusCode, AppError> {
    if mutation.trip_id() != trip_id {
        return Err(AppError::ValidationError(format!(
            "Mutation targets trip {}, not {}",
            mutation.trip_id(),
            trip_id
        )));
    }

    let result = state.source.apply(&mutation).await;
    if let Err(err) = state.gateway.invalidate().await {
        warn!("Failed to invalidate trip cache: {}", err);
    }
    result?;

    info!("Applied mutation to trip {}", trip_id);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/cache
async fn clear_cache(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.gateway.invalidate().await?;
    Ok(StatusCode::NO_CONTENT)
}
