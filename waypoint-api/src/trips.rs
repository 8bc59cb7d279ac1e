use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use waypoint_view::{day_views, today_view, trip_cards, DayView, TodayView, TripCard};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub trips: Vec<TripCard>,
    pub today: TodayView,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub trip_id: String,
    pub title: String,
    pub days: Vec<DayView>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trips", get(list_trips))
        .route("/v1/today", get(get_today))
        .route("/v1/trips/{id}/timeline", get(get_timeline))
}

/// GET /v1/trips
/// Trip cards (ongoing, upcoming, past) plus today's snapshot
async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let entry = state.trips().await?;
    let now = state.clock.now();
    let lang = state.language(query.lang.as_deref());

    Ok(Json(DashboardResponse {
        trips: trip_cards(&entry.trips, now.date(), lang),
        today: today_view(&entry.today_trips, now, lang),
    }))
}

/// GET /v1/today
async fn get_today(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Json<TodayView>, AppError> {
    let entry = state.trips().await?;
    let lang = state.language(query.lang.as_deref());

    Ok(Json(today_view(&entry.today_trips, state.clock.now(), lang)))
}

/// GET /v1/trips/{id}/timeline
async fn get_timeline(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<TimelineResponse>, AppError> {
    let entry = state.trips().await?;
    let trip = entry
        .find_trip(&trip_id)
        .ok_or_else(|| AppError::NotFoundError(format!("Trip {} not found", trip_id)))?;

    Ok(Json(TimelineResponse {
        trip_id: trip.id.clone(),
        title: trip.title.resolve(state.language(query.lang.as_deref())).to_string(),
        days: day_views(trip),
    }))
}
