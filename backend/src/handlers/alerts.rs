//! HTTP handlers for disaster alert endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use shared::DisasterAlert;

use super::LocationQuery;
use crate::error::AppResult;
use crate::AppState;

/// Get active disaster alerts near a location
pub async fn get_active_alerts(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<DisasterAlert>>> {
    let coordinates = query.coordinates()?;
    let alerts = state.alerts.get_active_alerts(coordinates).await?;
    Ok(Json(alerts))
}
