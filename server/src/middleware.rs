//! Request middlewares

use axum::{
	body::Body,
	http::{Request, response::Response},
	middleware::Next,
};
use corvid_types::types::Actor;

/// Header carrying the acting identity, set by the fronting auth proxy
pub const ACTOR_HEADER: &str = "x-corvid-actor";

/// Turn the trusted actor header into an [`Actor`] request extension.
///
/// Requests without the header pass through unauthenticated, the handlers
/// reject them.
pub async fn actor_from_header(mut req: Request<Body>, next: Next) -> Response<Body> {
	let actor = req
		.headers()
		.get(ACTOR_HEADER)
		.and_then(|h| h.to_str().ok())
		.map(str::trim)
		.filter(|id| !id.is_empty())
		.map(Actor::new);

	if let Some(actor) = actor {
		req.extensions_mut().insert(actor);
	}
	next.run(req).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{Router, extract::Extension, http::StatusCode, middleware, routing::get};
	use tower::ServiceExt;

	fn app() -> Router {
		Router::new()
			.route("/", get(|actor: Option<Extension<Actor>>| async move {
				actor.map_or_else(String::new, |Extension(actor)| actor.id.to_string())
			}))
			.layer(middleware::from_fn(actor_from_header))
	}

	async fn call(header: Option<&str>) -> String {
		let mut req = Request::builder().uri("/");
		if let Some(value) = header {
			req = req.header(ACTOR_HEADER, value);
		}
		let res = app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
		String::from_utf8(bytes.to_vec()).unwrap()
	}

	#[tokio::test]
	async fn test_actor_header() {
		assert_eq!(call(Some("alice")).await, "alice");
		assert_eq!(call(Some("  ")).await, "");
		assert_eq!(call(None).await, "");
	}
}

// vim: ts=4
