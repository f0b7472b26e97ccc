//! Controller for the static region catalog

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::catalog;

/// Get the region/spot catalog backing the itinerary builder
pub(crate) async fn get_regions() -> impl IntoResponse {
	(StatusCode::OK, Json(catalog::REGIONS))
}
