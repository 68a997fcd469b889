//! Axum extractor for the acting identity.
//!
//! Authentication happens in the host: its middleware inserts an [`Actor`]
//! into the request extensions, handlers pick it up with [`Auth`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::Error;
use crate::types::Actor;

#[derive(Clone, Debug)]
pub struct Auth(pub Actor);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(actor) = parts.extensions.get::<Actor>().cloned() {
			Ok(Auth(actor))
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// vim: ts=4
