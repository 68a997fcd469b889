//! Settings HTTP handlers
//!
//! Every route needs an [`Auth`] actor, inserted by the host's auth layer.

use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	routing::{get, patch, put},
};
use corvid_types::extract::Auth;
use corvid_types::types::{ApiResponse, Entity, FieldPatch, Fields};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::prelude::*;
use crate::service::SettingsService;
use crate::types::{ApplicationInfo, PlatformSettings};

type AppState = Arc<SettingsService>;

/// Body of a field edit: one patch or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EditFieldRequest {
	Many(Vec<FieldPatch>),
	One(FieldPatch),
}

impl EditFieldRequest {
	fn into_patches(self) -> Vec<FieldPatch> {
		match self {
			EditFieldRequest::Many(patches) => patches,
			EditFieldRequest::One(patch) => vec![patch],
		}
	}
}

pub fn router(service: AppState) -> Router {
	Router::new()
		.route("/api/settings", get(get_settings).post(post_settings))
		.route("/api/settings/info", get(get_application_info))
		.route("/api/settings/{id}", patch(patch_settings))
		.route(
			"/api/settings/{id}/context",
			put(put_edit_context).delete(delete_edit_context).get(get_edit_context),
		)
		.with_state(service)
}

/// GET /api/settings/info
pub async fn get_application_info(
	State(service): State<AppState>,
	Auth(_actor): Auth,
) -> CvResult<(StatusCode, Json<ApiResponse<ApplicationInfo>>)> {
	let info = service.get_application_info().await;
	Ok((StatusCode::OK, Json(ApiResponse::new(info))))
}

/// GET /api/settings
pub async fn get_settings(
	State(service): State<AppState>,
	Auth(_actor): Auth,
) -> CvResult<(StatusCode, Json<ApiResponse<PlatformSettings>>)> {
	let settings = service.get_settings().await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(settings))))
}

/// POST /api/settings
pub async fn post_settings(
	State(service): State<AppState>,
	Auth(actor): Auth,
	Json(input): Json<Fields>,
) -> CvResult<(StatusCode, Json<ApiResponse<Entity>>)> {
	let created = service.add_settings(&actor, input).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(created))))
}

/// PATCH /api/settings/{id}
pub async fn patch_settings(
	State(service): State<AppState>,
	Auth(actor): Auth,
	Path(id): Path<String>,
	Json(req): Json<EditFieldRequest>,
) -> CvResult<(StatusCode, Json<ApiResponse<Entity>>)> {
	let patches = req.into_patches();
	if patches.is_empty() {
		return Err(Error::ValidationError("no field to edit".into()));
	}
	let updated = service.edit_field(&actor, &id, &patches).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(updated))))
}

/// PUT /api/settings/{id}/context - Start editing, the body is the editor's input
pub async fn put_edit_context(
	State(service): State<AppState>,
	Auth(actor): Auth,
	Path(id): Path<String>,
	Json(input): Json<Value>,
) -> CvResult<(StatusCode, Json<ApiResponse<Entity>>)> {
	let entity = service.begin_edit(&actor, &id, input).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(entity))))
}

/// DELETE /api/settings/{id}/context
pub async fn delete_edit_context(
	State(service): State<AppState>,
	Auth(actor): Auth,
	Path(id): Path<String>,
) -> CvResult<(StatusCode, Json<ApiResponse<Entity>>)> {
	let entity = service.end_edit(&actor, &id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(entity))))
}

/// GET /api/settings/{id}/context - Actor ids currently editing
pub async fn get_edit_context(
	State(service): State<AppState>,
	Auth(_actor): Auth,
	Path(id): Path<String>,
) -> CvResult<(StatusCode, Json<ApiResponse<Vec<Box<str>>>>)> {
	let actors = service.edit_context(&id).await?;
	Ok((StatusCode::OK, Json(ApiResponse::new(actors))))
}

// vim: ts=4
