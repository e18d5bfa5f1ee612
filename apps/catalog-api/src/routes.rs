use axum::{
	Json, Router,
	extract::{DefaultBodyLimit, Multipart, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::{
	state::AppState,
	upload::{self, UploadError, UploadResponse},
};

pub fn router(state: AppState) -> Router {
	let upload_path = state.upload.path.clone();
	let body_limit = state.upload.max_bytes;

	Router::new()
		.route("/health", get(health))
		.route(&upload_path, post(upload_file))
		.layer(DefaultBodyLimit::max(body_limit))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn upload_file(
	State(state): State<AppState>,
	multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
	let response = upload::store_and_refresh(&state, multipart).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<UploadError> for ApiError {
	fn from(err: UploadError) -> Self {
		match err {
			UploadError::NoFile =>
				ApiError::new(StatusCode::BAD_REQUEST, "no_file", err.to_string()),
			UploadError::InvalidName { .. } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_file_name", err.to_string()),
			UploadError::Multipart(inner) =>
				ApiError::new(inner.status(), "invalid_multipart", inner.body_text()),
			UploadError::Store { .. } => {
				tracing::error!(error = ?err, "Failed to store upload.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_failed",
					"Failed to store uploaded file.",
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
