use std::path::PathBuf;

use deadpool_diesel::postgres::{Manager, Pool};
use url::Url;

#[derive(Clone, Debug)]
pub struct Config {
	pub production: bool,

	pub database_url: String,

	pub file_storage_path: PathBuf,
	pub static_url:        Url,
}

impl Config {
	fn get_env_var(var: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"))
	}

	/// Create a new [`Config`] from environment variables
	///
	/// # Panics
	/// Panics if an environment variable is missing or malformed
	#[must_use]
	pub fn from_env() -> Self {
		let production =
			std::env::var("PRODUCTION").is_ok_and(|v| v == "true");

		let database_url = Self::get_env_var("DATABASE_URL");

		let file_storage_path =
			PathBuf::from(Self::get_env_var("FILE_STORAGE_PATH"));
		let static_url = Url::parse(&Self::get_env_var("STATIC_URL"))
			.expect("STATIC_URL must be a valid url");

		Self { production, database_url, file_storage_path, static_url }
	}

	/// Create a database pool for the given config
	///
	/// # Panics
	/// Panics if creating the pool fails
	#[must_use]
	pub fn create_database_pool(&self) -> Pool {
		let manager = Manager::new(
			self.database_url.to_string(),
			deadpool_diesel::Runtime::Tokio1,
		);

		Pool::builder(manager).build().unwrap()
	}
}
