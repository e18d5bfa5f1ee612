use std::path::PathBuf;

use axum::extract::{Multipart, multipart::MultipartError};
use reqwest::Url;
use serde::Serialize;

use catalog_domain::UploadName;

use crate::state::AppState;

pub const FILE_FIELD: &str = "file";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
	#[error("No file uploaded")]
	NoFile,
	#[error("File name {name:?} has no usable stem.")]
	InvalidName { name: String },
	#[error(transparent)]
	Multipart(#[from] MultipartError),
	#[error("Failed to store upload at {path:?}.")]
	Store {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
	pub message: String,
}

/// Stores the `file` field of `multipart` and asks the reindexing service to refresh it.
///
/// A failed refresh is logged and does not fail the upload.
pub async fn store_and_refresh(
	state: &AppState,
	mut multipart: Multipart,
) -> Result<UploadResponse, UploadError> {
	let mut upload = None;

	while let Some(field) = multipart.next_field().await? {
		if field.name() != Some(FILE_FIELD) {
			continue;
		}

		let client_name = field.file_name().unwrap_or_default().to_string();
		let bytes = field.bytes().await?;

		upload = Some((client_name, bytes));

		break;
	}

	let Some((client_name, bytes)) = upload else {
		return Err(UploadError::NoFile);
	};
	let name = UploadName::new(&client_name, &state.upload.extension)
		.ok_or(UploadError::InvalidName { name: client_name })?;
	let data_dir = state.data_dir();

	tokio::fs::create_dir_all(&data_dir)
		.await
		.map_err(|err| UploadError::Store { path: data_dir.clone(), source: err })?;

	let path = data_dir.join(&name.stored);

	tokio::fs::write(&path, &bytes)
		.await
		.map_err(|err| UploadError::Store { path: path.clone(), source: err })?;

	tracing::info!(path = %path.display(), bytes = bytes.len(), "Stored uploaded file.");

	notify_refresh(state, &name.refresh_key).await;

	Ok(UploadResponse { message: format!("Uploaded and refreshed {}", name.original) })
}

/// Builds `<base>/api/refresh/<key>` with `key` encoded as a single path segment.
pub fn refresh_url(base: &str, key: &str) -> Option<Url> {
	let mut url = Url::parse(base).ok()?;

	url.path_segments_mut().ok()?.pop_if_empty().extend(["api", "refresh", key]);

	Some(url)
}

async fn notify_refresh(state: &AppState, key: &str) {
	let Some(url) = refresh_url(&state.upload.refresh_base, key) else {
		tracing::warn!(
			refresh_base = %state.upload.refresh_base,
			key,
			"Refresh base is not a usable URL; skipping refresh."
		);

		return;
	};
	let result = state.client.post(url.clone()).send().await.and_then(|res| res.error_for_status());

	match result {
		Ok(_) => tracing::info!(%url, "Refresh notification sent."),
		Err(err) => tracing::warn!(%url, error = %err, "Refresh notification failed."),
	}
}
