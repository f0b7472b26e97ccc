use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use validator_derive::Validate;

use crate::catalog;
use crate::error::Error;
use crate::models::{
	NewCompanionPost,
	NewSchedule,
	Post,
	PostStatus,
	PostUpdate,
	Schedule,
	TargetGender,
};

static USERNAME_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{3,20}$").unwrap());

/// Password shape check: at least one letter and one digit
fn password_shape(password: &str) -> Result<(), ValidationError> {
	let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
	let has_digit = password.chars().any(|c| c.is_ascii_digit());

	if has_letter && has_digit {
		Ok(())
	} else {
		let mut err = ValidationError::new("password-shape");
		err.message =
			Some("password must combine letters and digits".into());

		Err(err)
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
	#[validate(length(
		min = 1,
		max = 200,
		message = "title must be between 1 and 200 characters long",
		code = "title-length"
	))]
	pub title:         String,
	#[serde(default)]
	pub status:        PostStatus,
	pub description:   Option<String>,
	#[validate(url(
		message = "chat link must be a valid url",
		code = "chat-link"
	))]
	pub chat_link:     Option<String>,
	#[serde(default)]
	pub target_gender: TargetGender,
	#[serde(default)]
	pub target_ages:   Vec<String>,

	#[validate(nested)]
	pub schedule: ScheduleRequest,
	#[validate(nested)]
	pub author:   AuthorRequest,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
	pub start_date: NaiveDate,
	#[validate(range(
		min = 3,
		max = 12,
		message = "trips run from 3 to 12 nights",
		code = "nights-range"
	))]
	pub nights:     i32,
	#[validate(range(
		min = 1,
		message = "party size must be at least 1",
		code = "people-range"
	))]
	pub people:     i32,
	pub regions:    Vec<String>,
	pub spots:      Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
	#[validate(regex(
		path = *USERNAME_REGEX,
		message = "username must be 3 to 20 letters or digits",
		code = "username-regex"
	))]
	pub username: String,
	#[validate(length(
		min = 8,
		message = "password must be at least 8 characters long",
		code = "password-length"
	))]
	#[validate(custom(function = password_shape))]
	pub password: String,
	#[validate(length(
		min = 1,
		max = 32,
		message = "nickname must be between 1 and 32 characters long",
		code = "nickname-length"
	))]
	pub nickname: String,
}

impl CreatePostRequest {
	pub fn to_insertable(self) -> Result<NewCompanionPost, Error> {
		self.validate()?;

		catalog::validate_selection(
			&self.schedule.regions,
			&self.schedule.spots,
		)?;

		Ok(NewCompanionPost {
			schedule: NewSchedule {
				start_date: self.schedule.start_date,
				nights:     self.schedule.nights,
				people:     self.schedule.people,
				regions:    self.schedule.regions,
				spots:      self.schedule.spots,
			},

			author_username: self.author.username,
			author_password: self.author.password,
			author_nickname: self.author.nickname,

			title:         self.title,
			status:        self.status,
			description:   self.description,
			chat_link:     self.chat_link,
			target_gender: self.target_gender,
			target_ages:   self.target_ages,
		})
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
	pub password: String,

	#[validate(length(
		min = 1,
		max = 200,
		message = "title must be between 1 and 200 characters long",
		code = "title-length"
	))]
	pub title:          Option<String>,
	pub status:         Option<PostStatus>,
	pub description:    Option<String>,
	#[validate(url(
		message = "chat link must be a valid url",
		code = "chat-link"
	))]
	pub chat_link:      Option<String>,
	#[validate(range(
		min = 0,
		message = "confirmed member count cannot be negative",
		code = "current-people-range"
	))]
	pub current_people: Option<i32>,
}

impl UpdatePostRequest {
	/// Split this request into the author password and the changeset
	pub fn to_changeset(self) -> Result<(String, PostUpdate), Error> {
		self.validate()?;

		let update = PostUpdate {
			title:          self.title,
			status:         self.status,
			description:    self.description,
			chat_link:      self.chat_link,
			current_people: self.current_people,
		};

		if update.title.is_none()
			&& update.status.is_none()
			&& update.description.is_none()
			&& update.chat_link.is_none()
			&& update.current_people.is_none()
		{
			return Err(Error::MissingRequestData(
				"nothing to update".to_string(),
			));
		}

		Ok((self.password, update))
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeletePostRequest {
	pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
	pub id:             i32,
	pub title:          String,
	pub status:         PostStatus,
	pub description:    Option<String>,
	pub chat_link:      Option<String>,
	pub target_gender:  TargetGender,
	pub target_ages:    Vec<String>,
	pub current_people: i32,
	pub nickname:       String,
	pub schedule:       ScheduleResponse,
	pub created_at:     NaiveDateTime,
	pub updated_at:     NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
	pub start_date: NaiveDate,
	pub nights:     i32,
	pub people:     i32,
	pub regions:    Vec<String>,
	pub spots:      Vec<String>,
}

impl From<Schedule> for ScheduleResponse {
	fn from(value: Schedule) -> Self {
		Self {
			start_date: value.start_date,
			nights:     value.nights,
			people:     value.people,
			regions:    value.regions,
			spots:      value.spots,
		}
	}
}

impl From<Post> for PostResponse {
	fn from(value: Post) -> Self {
		Self {
			id:             value.post.id,
			title:          value.post.title,
			status:         value.post.status,
			description:    value.post.description,
			chat_link:      value.post.chat_link,
			target_gender:  value.post.target_gender,
			target_ages:    value.post.target_ages,
			current_people: value.post.current_people,
			nickname:       value.author.nickname,
			schedule:       value.schedule.into(),
			created_at:     value.post.created_at,
			updated_at:     value.post.updated_at,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn valid_request() -> CreatePostRequest {
		CreatePostRequest {
			title:         "Southern Gobi in June, 2 spots left".to_string(),
			status:        PostStatus::Open,
			description:   Some("Three of us so far, all first-timers"
				.to_string()),
			chat_link:     Some("https://open.kakao.com/o/abc123".to_string()),
			target_gender: TargetGender::Any,
			target_ages:   vec!["20s".to_string(), "30s".to_string()],
			schedule:      ScheduleRequest {
				start_date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
				nights:     5,
				people:     4,
				regions:    vec!["gobi".to_string()],
				spots:      vec![
					"Yolyn Am".to_string(),
					"Khongoryn Els".to_string(),
				],
			},
			author:        AuthorRequest {
				username: "winnie99".to_string(),
				password: "steppe1234".to_string(),
				nickname: "Winnie".to_string(),
			},
		}
	}

	#[test]
	fn valid_request_converts() {
		let new_post = valid_request().to_insertable().unwrap();

		assert_eq!(new_post.schedule.nights, 5);
		assert_eq!(new_post.author_username, "winnie99");
	}

	#[test]
	fn rejects_bad_username() {
		let mut request = valid_request();
		request.author.username = "a!".to_string();

		assert!(matches!(
			request.to_insertable(),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn rejects_password_without_digits() {
		let mut request = valid_request();
		request.author.password = "onlyletters".to_string();

		assert!(matches!(
			request.to_insertable(),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn rejects_out_of_range_nights() {
		let mut request = valid_request();
		request.schedule.nights = 13;

		assert!(matches!(
			request.to_insertable(),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn rejects_spot_from_unselected_region() {
		let mut request = valid_request();
		request.schedule.spots = vec!["Khuvsgul Lake".to_string()];

		assert!(matches!(
			request.to_insertable(),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn rejects_invalid_chat_link() {
		let mut request = valid_request();
		request.chat_link = Some("not a url".to_string());

		assert!(matches!(
			request.to_insertable(),
			Err(Error::ValidationError(_))
		));
	}

	#[test]
	fn empty_update_is_rejected() {
		let request = UpdatePostRequest {
			password:       "steppe1234".to_string(),
			title:          None,
			status:         None,
			description:    None,
			chat_link:      None,
			current_people: None,
		};

		assert!(matches!(
			request.to_changeset(),
			Err(Error::MissingRequestData(_))
		));
	}

	#[test]
	fn update_splits_password_from_changeset() {
		let request = UpdatePostRequest {
			password:       "steppe1234".to_string(),
			title:          None,
			status:         Some(PostStatus::FlightsBooked),
			description:    None,
			chat_link:      None,
			current_people: Some(3),
		};

		let (password, update) = request.to_changeset().unwrap();

		assert_eq!(password, "steppe1234");
		assert_eq!(update.status, Some(PostStatus::FlightsBooked));
		assert_eq!(update.current_people, Some(3));
	}
}
