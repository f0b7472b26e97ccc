//! Controllers for [`Agency`] directory pages and login

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::Error;
use crate::models::{AccountState, Agency};
use crate::schemas::agency::{AgencyResponse, LoginRequest};
use crate::{DbPool, LoginError};

/// Get the directory of verified agencies, ordered by company name.
#[instrument(skip(pool))]
pub(crate) async fn get_agencies(
	State(pool): State<DbPool>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let agencies = Agency::get_verified(&conn).await?;
	let response: Vec<AgencyResponse> =
		agencies.into_iter().map(Into::into).collect();

	Ok((StatusCode::OK, Json(response)))
}

/// Get the public profile of a verified agency.
#[instrument(skip(pool))]
pub(crate) async fn get_agency(
	State(pool): State<DbPool>,
	Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let agency = Agency::get_by_id(id, &conn).await?;

	// Unverified agencies are invisible to the directory
	if !agency.state.is_verified() {
		return Err(Error::NotFound(format!("no agency with id {id}")));
	}

	let response: AgencyResponse = agency.into();

	Ok((StatusCode::OK, Json(response)))
}

/// Check agency credentials and return the public profile on success.
#[instrument(skip_all)]
pub(crate) async fn login_agency(
	State(pool): State<DbPool>,
	Json(login_data): Json<LoginRequest>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let agency = Agency::get_by_username(login_data.username, &conn).await?;

	match agency.state {
		AccountState::Active | AccountState::Done => (),
		AccountState::Pending => {
			return Err(LoginError::PendingVerification.into());
		},
		AccountState::Disabled => return Err(LoginError::Disabled.into()),
	}

	agency.verify_password(&login_data.password)?;

	info!("logged in agency {}", agency.id);

	let response: AgencyResponse = agency.into();

	Ok((StatusCode::OK, Json(response)))
}
