use std::{path::PathBuf, sync::Arc, time::Duration};

use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
	pub upload: Arc<catalog_config::Upload>,
	pub client: Client,
}
impl AppState {
	pub fn new(upload: catalog_config::Upload) -> color_eyre::Result<Self> {
		let client =
			Client::builder().timeout(Duration::from_millis(upload.refresh_timeout_ms)).build()?;

		Ok(Self { upload: Arc::new(upload), client })
	}

	pub fn data_dir(&self) -> PathBuf {
		PathBuf::from(&self.upload.data_dir)
	}
}
