//! Standalone settings server
//!
//! Wires the settings service with the in-memory adapters and serves its
//! HTTP API. Configuration comes from `CORVID_*` environment variables,
//! `CORVID_LISTEN` sets the bind address.

mod middleware;
mod probes;

use axum::Router;
use corvid_core::{BusConfig, ChangeBus, SettingsConfig, logging};
use corvid_persistence_adapter_memory::PersistenceAdapterMemory;
use corvid_presence_adapter_memory::PresenceAdapterMemory;
use corvid_settings::{SettingsAdapters, SettingsService, handler};
use corvid_types::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

fn build_service(vars: &HashMap<String, String>) -> CvResult<SettingsService> {
	let config = SettingsConfig::from_vars(vars.clone())?;
	let bus = ChangeBus::with_config(BusConfig { buffer_size: config.bus_buffer_size });

	let adapters = SettingsAdapters {
		persistence: Arc::new(PersistenceAdapterMemory::new()),
		presence: Arc::new(PresenceAdapterMemory::new()),
		bus: Arc::new(bus),
		search_engine: probes::search_engine(vars),
		dependencies: probes::dependencies(vars),
	};
	Ok(SettingsService::new(config, adapters))
}

fn router(service: Arc<SettingsService>) -> Router {
	handler::router(service)
		.layer(axum::middleware::from_fn(middleware::actor_from_header))
		.layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		error!("Cannot listen for shutdown signal: {}", err);
		std::future::pending::<()>().await;
	}
	info!("Shutting down");
}

#[tokio::main]
async fn main() -> CvResult<()> {
	logging::init();

	let vars: HashMap<String, String> = std::env::vars().collect();
	let service = Arc::new(build_service(&vars)?);
	let sweeper = service.spawn_sweeper();

	let listen = vars.get("CORVID_LISTEN").map_or(DEFAULT_LISTEN, String::as_str);
	let listener = tokio::net::TcpListener::bind(listen).await?;
	info!(
		version = %service.config().platform_version,
		ttl_secs = service.config().edit_context_ttl_secs,
		"Listening on HTTP {}",
		listen
	);

	let res = axum::serve(listener, router(service))
		.with_graceful_shutdown(shutdown_signal())
		.await;

	if let Some(sweeper) = sweeper {
		sweeper.abort();
	}
	res.map_err(Error::from)
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::Body;
	use axum::http::{Request, StatusCode};
	use tower::ServiceExt;

	#[test]
	fn test_invalid_config_is_rejected() {
		let vars = HashMap::from([("CORVID_BUS_BUFFER".to_string(), "0".to_string())]);
		assert!(matches!(build_service(&vars), Err(Error::ConfigError(_))));
	}

	#[tokio::test]
	async fn test_actor_header_reaches_handlers() {
		let service = Arc::new(build_service(&HashMap::new()).unwrap());
		let app = router(service);

		let req = Request::builder().uri("/api/settings/info").body(Body::empty()).unwrap();
		let res = app.clone().oneshot(req).await.unwrap();
		assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

		let req = Request::builder()
			.uri("/api/settings/info")
			.header(middleware::ACTOR_HEADER, "alice")
			.body(Body::empty())
			.unwrap();
		let res = app.oneshot(req).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
	}
}

// vim: ts=4
