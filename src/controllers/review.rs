//! Controllers for travel [`Review`]s

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::Error;
use crate::image::store_review_photo;
use crate::models::{Agency, Review};
use crate::schemas::pagination::PaginationOptions;
use crate::schemas::review::{
	CreateReviewRequest,
	ReviewFilter,
	ReviewResponse,
};
use crate::{Config, DbPool};

/// Create a new review with its uploaded photos.
///
/// Photos are processed and written to storage first, then the review and
/// photo rows are inserted in one transaction. The first photo becomes the
/// thumbnail.
#[instrument(skip(pool, config, data))]
pub(crate) async fn create_review(
	State(pool): State<DbPool>,
	State(config): State<Config>,
	mut data: Multipart,
) -> Result<impl IntoResponse, Error> {
	let (request, photo_bytes) = CreateReviewRequest::parse(&mut data).await?;
	let new_review = request.to_insertable()?;

	let conn = pool.get().await?;

	let review_agency = Agency::get_by_id(new_review.agency_id, &conn).await?;
	if !review_agency.state.is_verified() {
		return Err(Error::ValidationError(
			"reviews can only cover verified agencies".to_string(),
		));
	}

	let photo_urls = photo_bytes
		.iter()
		.map(|bytes| store_review_photo(bytes, &config))
		.collect::<Result<Vec<_>, _>>()?;

	let (review, photos) = new_review.insert(photo_urls, &conn).await?;
	let response: ReviewResponse = (review, photos).into();

	Ok((StatusCode::CREATED, Json(response)))
}

/// Get a paginated page of the review board, newest first.
#[instrument(skip(pool))]
pub(crate) async fn get_reviews(
	State(pool): State<DbPool>,
	Query(filter): Query<ReviewFilter>,
	Query(p_opts): Query<PaginationOptions>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let (total, reviews) = Review::get_all(
		filter.region,
		p_opts.limit(),
		p_opts.offset(),
		&conn,
	)
	.await?;

	let data: Vec<ReviewResponse> =
		reviews.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(p_opts.paginate(total, data))))
}

/// Get a single review with its ordered photos.
#[instrument(skip(pool))]
pub(crate) async fn get_review(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let review = Review::get_by_id(id, &conn).await?;
	let response: ReviewResponse = review.into();

	Ok((StatusCode::OK, Json(response)))
}

/// Get all reviews covering a single agency.
#[instrument(skip(pool))]
pub(crate) async fn get_agency_reviews(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	// Resolves to a not-found error for unknown agencies
	Agency::get_by_id(id, &conn).await?;

	let reviews = Review::for_agency(id, &conn).await?;
	let response: Vec<ReviewResponse> =
		reviews.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}
