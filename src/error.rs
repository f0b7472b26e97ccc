//! Library-wide error types and [`From`] impls

use std::collections::HashMap;
use std::sync::LazyLock;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diesel::result::DatabaseErrorKind;
use thiserror::Error;

/// Top level application error, can be converted into a [`Response`]
#[derive(Debug, Error)]
pub enum Error {
	/// Duplicate resource created
	#[error("{0}")]
	Duplicate(String),
	/// Opaque internal server error
	#[error("internal server error")]
	InternalServerError,
	/// Decoding an image failed somehow
	#[error("{0}")]
	InvalidImage(String),
	/// Resource not found
	#[error("not found - {0}")]
	NotFound(String),
	/// Any error related to checking credentials
	#[error(transparent)]
	LoginError(#[from] LoginError),
	/// Some data in the request was missing
	#[error("{0}")]
	MissingRequestData(String),
	/// Any error related to parsing multipart data
	#[error(transparent)]
	MultipartError(#[from] MultipartError),
	/// Resource could not be validated
	#[error("{0}")]
	ValidationError(String),
}

impl Error {
	/// Return a unique identifying code for this error
	///
	/// When modifying this function the error code should only ever increase,
	/// an error code should never be reused once its assigned to avoid
	/// unexpectedly breaking the frontend
	fn code(&self) -> i32 {
		match self {
			Self::Duplicate(_) => 1,
			Self::InternalServerError => 2,
			Self::InvalidImage(_) => 3,
			Self::NotFound(_) => 4,
			Self::LoginError(e) => {
				match e {
					LoginError::UnknownUsername(_) => 5,
					LoginError::InvalidPassword => 6,
					LoginError::PendingVerification => 7,
					LoginError::Disabled => 8,
				}
			},
			Self::MultipartError(_) => 9,
			Self::ValidationError(_) => 10,
			Self::MissingRequestData(_) => 11,
		}
	}

	/// Return additional information about the error
	fn info(&self) -> Option<String> {
		match self {
			Self::Duplicate(m)
			| Self::InvalidImage(m)
			| Self::NotFound(m)
			| Self::LoginError(LoginError::UnknownUsername(m))
			| Self::MissingRequestData(m)
			| Self::ValidationError(m) => Some(m.to_owned()),
			_ => None,
		}
	}
}

/// Convert an error into a [`Response`]
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		error!("{self:?}");

		let message = self.to_string();

		let data = serde_json::json!({
			"message": message,
			"code": self.code(),
			"info": self.info(),
		});

		let status = match self {
			Self::Duplicate(_) => StatusCode::CONFLICT,
			Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
			Self::LoginError(_) => StatusCode::FORBIDDEN,
			Self::MultipartError(_) | Self::InvalidImage(_) => {
				StatusCode::BAD_REQUEST
			},
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::ValidationError(_) | Self::MissingRequestData(_) => {
				StatusCode::UNPROCESSABLE_ENTITY
			},
		};

		(status, axum::Json(data)).into_response()
	}
}

/// Any error related to checking credentials
#[derive(Debug, Error)]
pub enum LoginError {
	#[error("no account with username '{0}' was found")]
	UnknownUsername(String),
	#[error("invalid password")]
	InvalidPassword,
	#[error("account is still awaiting verification")]
	PendingVerification,
	#[error("account is disabled")]
	Disabled,
}

/// A list of possible internal errors
///
/// API end users should never see these details
#[derive(Debug, Error)]
pub enum InternalServerError {
	/// Unknown database constraint violation
	#[error("constraint error -- {0:?}")]
	ConstraintError(String),
	/// Error executing some database operation
	#[error("database error -- {0:?}")]
	DatabaseError(diesel::result::Error),
	/// Error interacting with a database connection
	#[error("database interaction error -- {0:?}")]
	DatabaseInteractionError(deadpool_diesel::InteractError),
	/// Error handling some form of I/O
	#[error("I/O error -- {0:?}")]
	IOError(std::io::Error),
	/// Error performing some image operation
	#[error("image error -- {0:?}")]
	ImageError(image::ImageError),
	/// Error hashing some value
	#[error("hash error -- {0:?}")]
	HashError(argon2::password_hash::Error),
	/// Error acquiring database pool connection
	#[error("database pool error -- {0:?}")]
	PoolError(deadpool_diesel::PoolError),
	/// Failed to parse a url
	#[error("could not parse url -- {0:?}")]
	UrlParseError(url::ParseError),
}

// Map internal server errors to application errors
impl From<InternalServerError> for Error {
	fn from(value: InternalServerError) -> Self {
		error!("internal server error -- {value}");

		Self::InternalServerError
	}
}

/// Map validation errors to application errors
impl From<validator::ValidationErrors> for Error {
	fn from(err: validator::ValidationErrors) -> Self {
		let errs = err.field_errors();
		let repr = errs
			.values()
			.map(|v| {
				v.iter()
					.map(ToString::to_string)
					.collect::<Vec<String>>()
					.join("\n")
			})
			.collect::<Vec<String>>()
			.join("\n");

		Self::ValidationError(repr)
	}
}

/// Map password hashing errors to application errors
impl From<argon2::password_hash::Error> for Error {
	fn from(err: argon2::password_hash::Error) -> Self {
		match err {
			argon2::password_hash::Error::Password => {
				LoginError::InvalidPassword.into()
			},
			_ => InternalServerError::HashError(err).into(),
		}
	}
}

/// Map database interaction errors to application errors
impl From<deadpool_diesel::InteractError> for Error {
	fn from(value: deadpool_diesel::InteractError) -> Self {
		InternalServerError::DatabaseInteractionError(value).into()
	}
}

/// Map of constraint names to column names.
static CONSTRAINT_TO_COLUMN: LazyLock<HashMap<&str, &str>> =
	LazyLock::new(|| {
		HashMap::from([
			("travel_user_username_key", "username"),
			("agency_username_key", "username"),
			("post_chat_link_key", "chat link"),
		])
	});

/// Map database result errors to application errors.
impl From<diesel::result::Error> for Error {
	fn from(err: diesel::result::Error) -> Self {
		match &err {
			// No rows returned by query that expected at least one
			diesel::result::Error::NotFound => {
				Self::NotFound("no context provided".to_string())
			},
			// Unique constraint violation
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::UniqueViolation,
				info,
			) => {
				let constraint_name = info.constraint_name().unwrap();

				match CONSTRAINT_TO_COLUMN.get(constraint_name) {
					Some(field) => {
						Self::Duplicate(format!("{field} is already in use"))
					},
					None => InternalServerError::DatabaseError(err).into(),
				}
			},
			// Foreign key constraint violation
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::ForeignKeyViolation,
				info,
			) => Self::ValidationError(info.message().to_string()),
			_ => InternalServerError::DatabaseError(err).into(),
		}
	}
}

impl From<deadpool_diesel::PoolError> for Error {
	fn from(value: deadpool_diesel::PoolError) -> Self {
		InternalServerError::PoolError(value).into()
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		InternalServerError::IOError(err).into()
	}
}

impl From<image::ImageError> for Error {
	fn from(value: image::ImageError) -> Self {
		match value {
			image::ImageError::Decoding(e) => Self::InvalidImage(e.to_string()),
			image::ImageError::IoError(e) => {
				InternalServerError::IOError(e).into()
			},
			e => InternalServerError::ImageError(e).into(),
		}
	}
}

impl From<fast_image_resize::ResizeError> for Error {
	fn from(value: fast_image_resize::ResizeError) -> Self {
		Self::InvalidImage(value.to_string())
	}
}

impl From<url::ParseError> for Error {
	fn from(err: url::ParseError) -> Self {
		InternalServerError::UrlParseError(err).into()
	}
}

#[cfg(test)]
mod tests {
	use validator::Validate;
	use validator_derive::Validate;

	use super::*;

	#[test]
	fn diesel_not_found_maps_to_not_found() {
		let err: Error = diesel::result::Error::NotFound.into();

		assert!(matches!(err, Error::NotFound(_)));
	}

	#[test]
	fn password_mismatch_maps_to_invalid_password() {
		let err: Error = argon2::password_hash::Error::Password.into();

		assert!(matches!(
			err,
			Error::LoginError(LoginError::InvalidPassword)
		));
	}

	#[test]
	fn validation_errors_collect_messages() {
		#[derive(Validate)]
		struct Data {
			#[validate(length(min = 4, message = "too short"))]
			field: String,
		}

		let data = Data { field: "abc".to_string() };
		let err: Error = data.validate().unwrap_err().into();

		let Error::ValidationError(repr) = err else {
			panic!("expected a validation error");
		};
		assert!(repr.contains("too short"));
	}
}
