use serde::{Deserialize, Serialize};

use crate::{
	item::ResultItem,
	screen::{Result, ScreenError},
};

/// One page of one query, as sent to every endpoint of a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
	pub query: String,
	pub page: u32,
	pub page_size: u32,
}
impl PageRequest {
	pub fn new(query: impl Into<String>, page: u32, page_size: u32) -> Self {
		Self { query: query.into(), page, page_size }
	}

	/// Query-string pairs in wire order. `q` is omitted for an empty query, which the API reads
	/// as "match all".
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::with_capacity(3);

		if !self.query.is_empty() {
			pairs.push(("q", self.query.clone()));
		}

		pairs.push(("page", self.page.to_string()));
		pairs.push(("page_size", self.page_size.to_string()));

		pairs
	}
}

/// Wire shape of a single endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
	#[serde(default)]
	pub results: Vec<ResultItem>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub has_more: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
}

/// Merged outcome of one logical page across every endpoint of a screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
	pub items: Vec<ResultItem>,
	pub has_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasMorePolicy {
	/// Trust the `has_more` flag reported by the endpoints.
	ServerFlag,
	/// Assume another page exists whenever this one was non-empty.
	NonEmpty,
}
impl HasMorePolicy {
	/// `auto` resolves to the server flag for a single endpoint and to the non-empty heuristic
	/// when several endpoints are merged.
	pub fn parse(raw: &str, endpoint_count: usize) -> Result<Self> {
		match raw {
			"server_flag" => Ok(Self::ServerFlag),
			"non_empty" => Ok(Self::NonEmpty),
			"auto" if endpoint_count <= 1 => Ok(Self::ServerFlag),
			"auto" => Ok(Self::NonEmpty),
			other => Err(ScreenError::UnknownHasMorePolicy(other.to_string())),
		}
	}
}

/// Last path segment of an endpoint, e.g. "/api/sparkplugs" becomes "sparkplugs".
pub fn origin_label(endpoint: &str) -> &str {
	let trimmed = endpoint.trim_end_matches('/');

	trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Concatenates endpoint responses in endpoint order, tagging untagged items with the origin
/// label of the endpoint they came from.
pub fn merge_pages<'a, I>(responses: I, policy: HasMorePolicy) -> Page
where
	I: IntoIterator<Item = (&'a str, PageResponse)>,
{
	let mut items = Vec::new();
	let mut flagged = false;

	for (endpoint, response) in responses {
		let label = origin_label(endpoint);

		flagged |= response.has_more.unwrap_or(false);

		items.extend(response.results.into_iter().map(|item| item.with_origin_fallback(label)));
	}

	let has_more = match policy {
		HasMorePolicy::ServerFlag => flagged,
		HasMorePolicy::NonEmpty => !items.is_empty(),
	};

	Page { items, has_more }
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn response(value: serde_json::Value) -> PageResponse {
		serde_json::from_value(value).expect("parse failed")
	}

	#[test]
	fn empty_query_omits_q() {
		let pairs = PageRequest::new("", 2, 30).query_pairs();

		assert_eq!(pairs, vec![("page", "2".to_string()), ("page_size", "30".to_string())]);
	}

	#[test]
	fn origin_label_uses_last_segment() {
		assert_eq!(origin_label("/api/sparkplugs"), "sparkplugs");
		assert_eq!(origin_label("/api/filters/"), "filters");
		assert_eq!(origin_label("engines"), "engines");
	}

	#[test]
	fn auto_policy_depends_on_endpoint_count() {
		assert_eq!(HasMorePolicy::parse("auto", 1).expect("parse"), HasMorePolicy::ServerFlag);
		assert_eq!(HasMorePolicy::parse("auto", 2).expect("parse"), HasMorePolicy::NonEmpty);
		assert!(HasMorePolicy::parse("maybe", 1).is_err());
	}

	#[test]
	fn merge_tags_and_keeps_endpoint_order() {
		let plugs = response(json!({
			"results": [{ "Description": "NGK BPR5ES" }, { "Description": "B", "sheet": "Iridium" }],
			"has_more": false
		}));
		let filters = response(json!({ "results": [{ "Description": "PF-1" }], "has_more": true }));
		let page = merge_pages(
			[("/api/sparkplugs", plugs), ("/api/filters", filters)],
			HasMorePolicy::ServerFlag,
		);
		let origins: Vec<_> = page.items.iter().map(|item| item.origin()).collect();

		assert_eq!(origins, vec![Some("sparkplugs"), Some("Iridium"), Some("filters")]);
		assert!(page.has_more);
	}

	#[test]
	fn non_empty_policy_ignores_server_flag() {
		let empty = response(json!({ "results": [], "has_more": true }));
		let page = merge_pages([("/api/filters", empty)], HasMorePolicy::NonEmpty);

		assert!(page.items.is_empty());
		assert!(!page.has_more);
	}

	#[test]
	fn missing_flag_reads_as_no_more() {
		let page = merge_pages(
			[("/api/engines", response(json!({ "results": [{ "Engine": "4G63" }] })))],
			HasMorePolicy::ServerFlag,
		);

		assert!(!page.has_more);
	}
}
