use argon2::{Argon2, PasswordHash, PasswordVerifier};
use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::AccountState;
use crate::schema::agency;
use crate::{DbConn, Error, LoginError};

/// A travel agency listed in the directory
#[derive(
	Clone, Debug, Deserialize, Identifiable, Queryable, Selectable, Serialize,
)]
#[serde(rename_all = "camelCase")]
#[diesel(table_name = agency)]
#[diesel(check_for_backend(Pg))]
pub struct Agency {
	pub id:            i32,
	#[serde(skip)]
	pub username:      String,
	#[serde(skip)]
	pub password_hash: String,
	pub company_name:  String,
	pub intro:         Option<String>,
	pub chat_link:     Option<String>,
	pub logo_url:      Option<String>,
	#[serde(skip)]
	pub state:         AccountState,
	pub created_at:    NaiveDateTime,
}

impl Agency {
	/// Verify a submitted password against the stored hash
	pub fn verify_password(&self, password: &str) -> Result<(), Error> {
		let password_hash = PasswordHash::new(&self.password_hash)?;
		Argon2::default()
			.verify_password(password.as_bytes(), &password_hash)?;

		Ok(())
	}

	/// Get an [`Agency`] given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(a_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let agency = conn
			.interact(move |conn| {
				agency::table
					.find(a_id)
					.select(Self::as_select())
					.first(conn)
			})
			.await??;

		Ok(agency)
	}

	/// Get an [`Agency`] given its username
	#[instrument(skip(conn))]
	pub async fn get_by_username(
		query_username: String,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let username = query_username.clone();

		let agency = conn
			.interact(move |conn| {
				agency::table
					.filter(agency::username.eq(username))
					.select(Self::as_select())
					.first(conn)
					.optional()
			})
			.await??;

		agency.ok_or_else(|| {
			LoginError::UnknownUsername(query_username).into()
		})
	}

	/// Get all verified [`Agency`]s ordered by company name
	#[instrument(skip(conn))]
	pub async fn get_verified(conn: &DbConn) -> Result<Vec<Self>, Error> {
		let agencies = conn
			.interact(|conn| {
				agency::table
					.filter(agency::state.eq_any([
						AccountState::Active,
						AccountState::Done,
					]))
					.order(agency::company_name.asc())
					.select(Self::as_select())
					.load(conn)
			})
			.await??;

		Ok(agencies)
	}
}
