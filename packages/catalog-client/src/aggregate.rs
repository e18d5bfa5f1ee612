use catalog_domain::{HasMorePolicy, Page, PageRequest, merge_pages};

use crate::{PageSource, Result};

/// Fetches `request` from every endpoint in order and merges the responses.
///
/// The first failing endpoint fails the whole page; nothing is merged from the others.
pub async fn fetch_merged(
	source: &dyn PageSource,
	endpoints: &[String],
	request: &PageRequest,
	policy: HasMorePolicy,
) -> Result<Page> {
	let mut responses = Vec::with_capacity(endpoints.len());

	for endpoint in endpoints {
		let response = source.fetch_page(endpoint, request).await?;

		responses.push((endpoint.as_str(), response));
	}

	Ok(merge_pages(responses, policy))
}
