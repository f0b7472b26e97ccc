use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Agency;

/// Public profile of a verified agency
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyResponse {
	pub id:           i32,
	pub company_name: String,
	pub intro:        Option<String>,
	pub chat_link:    Option<String>,
	pub logo_url:     Option<String>,
	pub created_at:   NaiveDateTime,
}

impl From<Agency> for AgencyResponse {
	fn from(value: Agency) -> Self {
		Self {
			id:           value.id,
			company_name: value.company_name,
			intro:        value.intro,
			chat_link:    value.chat_link,
			logo_url:     value.logo_url,
			created_at:   value.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginRequest {
	pub username: String,
	pub password: String,
}
