use std::time::Duration;

use reqwest::Client;

use catalog_domain::{PageRequest, PageResponse};

use crate::{BoxFuture, Error, PageSource, Result};

/// Fetches pages from the remote search API over HTTP.
#[derive(Clone)]
pub struct HttpPageSource {
	client: Client,
	api_base: String,
}
impl HttpPageSource {
	pub fn new(cfg: &catalog_config::Search) -> Result<Self> {
		if cfg.api_base.trim().is_empty() {
			return Err(Error::InvalidConfig {
				message: "search.api_base must be non-empty.".to_string(),
			});
		}

		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { client, api_base: cfg.api_base.trim_end_matches('/').to_string() })
	}

	async fn fetch(&self, endpoint: &str, request: &PageRequest) -> Result<PageResponse> {
		let url = format!("{}{}", self.api_base, endpoint);
		let res = self.client.get(url).query(&request.query_pairs()).send().await?;
		let status = res.status();

		if !status.is_success() {
			return Err(Error::Status { endpoint: endpoint.to_string(), status: status.as_u16() });
		}

		Ok(res.json().await?)
	}
}
impl PageSource for HttpPageSource {
	fn fetch_page<'a>(
		&'a self,
		endpoint: &'a str,
		request: &'a PageRequest,
	) -> BoxFuture<'a, Result<PageResponse>> {
		Box::pin(self.fetch(endpoint, request))
	}
}
