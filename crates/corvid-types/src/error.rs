//! Error type shared by every Corvid crate

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub type CvResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	Unauthorized,

	/// Entity already exists (duplicate singleton creation, etc.)
	Conflict(String),
	/// Persistence collaborator failure
	DbError(String),
	ValidationError(String),
	ConfigError(String),
	/// Capability detection (version probe) failure
	CapabilityError(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Short machine-readable code used in HTTP error bodies
	pub fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-NOTFOUND",
			Error::Unauthorized => "E-AUTH",
			Error::Conflict(_) => "E-CONFLICT",
			Error::DbError(_) => "E-DB",
			Error::ValidationError(_) => "E-VALIDATION",
			Error::ConfigError(_) => "E-CONFIG",
			Error::CapabilityError(_) => "E-CAPABILITY",
			Error::Io(_) => "E-INTERNAL",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::Conflict(_) => StatusCode::CONFLICT,
			Error::CapabilityError(_) => StatusCode::SERVICE_UNAVAILABLE,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::DbError(msg) => write!(f, "persistence error: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::CapabilityError(msg) => write!(f, "capability detection failed: {}", msg),
			Error::Io(err) => write!(f, "I/O error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = self.status();
		// Internal details stay in the log, not in the response body
		let message = if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
			"internal server error".to_string()
		} else {
			self.to_string()
		};
		(status, Json(json!({ "error": { "code": self.code(), "message": message } })))
			.into_response()
	}
}


// vim: ts=4
