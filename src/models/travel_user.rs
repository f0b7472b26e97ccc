use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use crate::schema::travel_user;
use crate::{Error, LoginError};

/// Moderation state shared by travel user and agency accounts
#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, Eq, PartialEq, Serialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::AccountState"]
#[serde(rename_all = "camelCase")]
pub enum AccountState {
	Pending,
	#[default]
	Active,
	/// Verified account whose contract has run out, still shown publicly
	Done,
	Disabled,
}

impl AccountState {
	/// Check whether this account has passed moderation
	#[must_use]
	pub fn is_verified(self) -> bool {
		matches!(self, Self::Active | Self::Done)
	}
}

/// A community member authoring companion posts
///
/// Only the nickname is ever serialized, everything else stays server-side
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[diesel(table_name = travel_user)]
#[diesel(check_for_backend(Pg))]
pub struct TravelUser {
	#[serde(skip)]
	pub id:            i32,
	#[serde(skip)]
	pub username:      String,
	#[serde(skip)]
	pub password_hash: String,
	pub nickname:      String,
	#[serde(skip)]
	pub state:         AccountState,
	#[serde(skip)]
	pub created_at:    NaiveDateTime,
}

impl TravelUser {
	/// Hash a plaintext password for storage
	pub(crate) fn hash_password(password: &str) -> Result<String, Error> {
		let salt = SaltString::generate(&mut OsRng);
		let hash = Argon2::default()
			.hash_password(password.as_bytes(), &salt)?
			.to_string();

		Ok(hash)
	}

	/// Verify a submitted password against the stored hash
	pub fn verify_password(&self, password: &str) -> Result<(), Error> {
		let password_hash = PasswordHash::new(&self.password_hash)?;
		Argon2::default()
			.verify_password(password.as_bytes(), &password_hash)?;

		Ok(())
	}

	/// Look up a [`TravelUser`] by username or create one, within an already
	/// open transaction
	///
	/// An existing user must present the correct password and must not be
	/// disabled, otherwise nothing is written and the whole transaction rolls
	/// back.
	pub(crate) fn find_or_create_sync(
		query_username: &str,
		password: &str,
		query_nickname: &str,
		conn: &mut PgConnection,
	) -> Result<Self, Error> {
		let existing = travel_user::table
			.filter(travel_user::username.eq(query_username))
			.select(Self::as_select())
			.first(conn)
			.optional()?;

		if let Some(user) = existing {
			match user.state {
				AccountState::Active | AccountState::Done => (),
				AccountState::Pending => {
					return Err(LoginError::PendingVerification.into());
				},
				AccountState::Disabled => {
					return Err(LoginError::Disabled.into());
				},
			}

			user.verify_password(password)?;

			return Ok(user);
		}

		let password_hash = Self::hash_password(password)?;

		let user = diesel::insert_into(travel_user::table)
			.values((
				travel_user::username.eq(query_username),
				travel_user::password_hash.eq(password_hash),
				travel_user::nickname.eq(query_nickname),
			))
			.returning(Self::as_returning())
			.get_result(conn)?;

		info!("created travel user {} ({})", user.id, user.nickname);

		Ok(user)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn password_roundtrip() {
		let hash = TravelUser::hash_password("steppe1234").unwrap();

		let user = TravelUser {
			id:            1,
			username:      "winnie".to_string(),
			password_hash: hash,
			nickname:      "Winnie".to_string(),
			state:         AccountState::Active,
			created_at:    chrono::NaiveDateTime::default(),
		};

		assert!(user.verify_password("steppe1234").is_ok());

		let err = user.verify_password("wrong-password").unwrap_err();
		assert!(matches!(
			err,
			Error::LoginError(LoginError::InvalidPassword)
		));
	}

	#[test]
	fn verified_states() {
		assert!(AccountState::Active.is_verified());
		assert!(AccountState::Done.is_verified());
		assert!(!AccountState::Pending.is_verified());
		assert!(!AccountState::Disabled.is_verified());
	}
}
