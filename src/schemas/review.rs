use axum::body::Bytes;
use axum::extract::Multipart;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;
use validator_derive::Validate;

use crate::catalog;
use crate::error::Error;
use crate::models::{NewReview, Review, ReviewPhoto};
use crate::schemas::agency::AgencyResponse;

/// Upper bound on photos per review, the first one becomes the thumbnail
pub const MAX_PHOTOS: usize = 5;

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
	pub agency_id:   i32,
	#[validate(length(
		min = 1,
		max = 200,
		message = "title must be between 1 and 200 characters long",
		code = "title-length"
	))]
	pub title:       String,
	#[validate(range(
		min = 1,
		max = 30,
		message = "nights must be between 1 and 30",
		code = "nights-range"
	))]
	pub nights:      i32,
	#[validate(range(
		min = 1,
		message = "party size must be at least 1",
		code = "people-range"
	))]
	pub people:      i32,
	pub regions:     Vec<String>,
	pub description: Option<String>,
}

impl CreateReviewRequest {
	/// Parse a multipart review submission into its fields and photo bytes
	///
	/// Repeated `regions` parts accumulate into the tag list, repeated
	/// `photos` parts into the upload list.
	pub async fn parse(
		data: &mut Multipart,
	) -> Result<(Self, Vec<Bytes>), Error> {
		let mut agency_id = None;
		let mut title = None;
		let mut nights = None;
		let mut people = None;
		let mut regions = vec![];
		let mut description = None;
		let mut photos = vec![];

		while let Some(field) = data.next_field().await? {
			let name = field.name().unwrap_or_default().to_string();

			match name.as_str() {
				"agencyId" => {
					agency_id = Some(parse_number(&field.text().await?)?);
				},
				"title" => title = Some(field.text().await?),
				"nights" => {
					nights = Some(parse_number(&field.text().await?)?);
				},
				"people" => {
					people = Some(parse_number(&field.text().await?)?);
				},
				"regions" => regions.push(field.text().await?),
				"description" => {
					let text = field.text().await?;

					if !text.trim().is_empty() {
						description = Some(text);
					}
				},
				"photos" => photos.push(field.bytes().await?),
				_ => continue,
			}
		}

		if photos.is_empty() {
			return Err(Error::MissingRequestData(
				"attach at least one photo".to_string(),
			));
		}

		if photos.len() > MAX_PHOTOS {
			return Err(Error::ValidationError(format!(
				"at most {MAX_PHOTOS} photos are allowed"
			)));
		}

		let request = Self {
			agency_id: agency_id.ok_or_else(|| {
				Error::MissingRequestData("agencyId".to_string())
			})?,
			title: title.ok_or_else(|| {
				Error::MissingRequestData("title".to_string())
			})?,
			nights: nights.unwrap_or(1),
			people: people.unwrap_or(1),
			regions,
			description,
		};

		Ok((request, photos))
	}

	pub fn to_insertable(self) -> Result<NewReview, Error> {
		self.validate()?;

		if self.regions.is_empty() {
			return Err(Error::ValidationError(
				"select at least one region".to_string(),
			));
		}

		for region in &self.regions {
			if catalog::get(region).is_none() {
				return Err(Error::ValidationError(format!(
					"unknown region '{region}'"
				)));
			}
		}

		Ok(NewReview {
			agency_id:     self.agency_id,
			title:         self.title,
			nights:        self.nights,
			people:        self.people,
			regions:       self.regions,
			description:   self.description,
			thumbnail_url: None,
		})
	}
}

fn parse_number(text: &str) -> Result<i32, Error> {
	text.trim().parse::<i32>().map_err(|_| {
		Error::ValidationError(format!("'{text}' is not a number"))
	})
}

/// Filter parameters for the review board
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilter {
	pub region: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
	pub id:            i32,
	pub agency:        AgencyResponse,
	pub title:         String,
	pub nights:        i32,
	pub people:        i32,
	pub regions:       Vec<String>,
	pub description:   Option<String>,
	pub thumbnail_url: Option<String>,
	/// Photo URLs in display order
	pub photos:        Vec<String>,
	pub created_at:    NaiveDateTime,
}

impl From<(Review, Vec<ReviewPhoto>)> for ReviewResponse {
	fn from((value, photos): (Review, Vec<ReviewPhoto>)) -> Self {
		Self {
			id:            value.review.id,
			agency:        value.agency.into(),
			title:         value.review.title,
			nights:        value.review.nights,
			people:        value.review.people,
			regions:       value.review.regions,
			description:   value.review.description,
			thumbnail_url: value.review.thumbnail_url,
			photos:        photos.into_iter().map(|p| p.image_url).collect(),
			created_at:    value.review.created_at,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn valid_request() -> CreateReviewRequest {
		CreateReviewRequest {
			agency_id:   1,
			title:       "Five days across the southern Gobi".to_string(),
			nights:      4,
			people:      3,
			regions:     vec!["gobi".to_string()],
			description: Some("The dunes at sunset were unreal".to_string()),
		}
	}

	#[test]
	fn valid_request_converts() {
		let new_review = valid_request().to_insertable().unwrap();

		assert_eq!(new_review.agency_id, 1);
		// The thumbnail is only known once the photos are stored
		assert_eq!(new_review.thumbnail_url, None);
	}

	#[test]
	fn rejects_empty_region_list() {
		let mut request = valid_request();
		request.regions = vec![];

		assert!(matches!(
			request.to_insertable(),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn rejects_unknown_region_tag() {
		let mut request = valid_request();
		request.regions = vec!["sahara".to_string()];

		assert!(matches!(
			request.to_insertable(),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn rejects_out_of_range_nights() {
		let mut request = valid_request();
		request.nights = 0;

		assert!(matches!(
			request.to_insertable(),
			Err(Error::ValidationError(_))
		));
	}
}
