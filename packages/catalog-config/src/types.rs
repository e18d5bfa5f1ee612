use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub search: Search,
	pub upload: Upload,
	pub engines: Screen,
	pub service_parts: Screen,
	#[serde(default)]
	pub categories: Vec<Screen>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Base URL of the remote search API, e.g. "http://localhost:8000".
	pub api_base: String,
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	/// Quiescence window applied to raw input before a query is issued.
	#[serde(default = "default_debounce_ms")]
	pub debounce_ms: u64,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Upload {
	#[serde(default = "default_upload_path")]
	pub path: String,
	pub data_dir: String,
	/// Extension every stored file is normalized to, without the leading dot.
	#[serde(default = "default_extension")]
	pub extension: String,
	/// Base URL of the reindexing service that receives `/api/refresh/<key>`.
	pub refresh_base: String,
	#[serde(default = "default_timeout_ms")]
	pub refresh_timeout_ms: u64,
	#[serde(default = "default_max_bytes")]
	pub max_bytes: usize,
}

/// One searchable screen: a set of endpoints plus how their results are queried and shown.
#[derive(Debug, Clone, Deserialize)]
pub struct Screen {
	pub name: String,
	pub endpoints: Vec<String>,
	/// One of "suppress" or "fetch_all".
	#[serde(default = "default_empty_query")]
	pub empty_query: String,
	/// One of "auto", "server_flag", or "non_empty".
	#[serde(default = "default_has_more")]
	pub has_more: String,
	/// Fields tried in order for a card title. Empty means "first non-blank field".
	#[serde(default)]
	pub title_fields: Vec<String>,
	/// Fields never used as a title when `title_fields` is empty.
	#[serde(default = "default_title_exclude")]
	pub title_exclude: Vec<String>,
	#[serde(default = "default_title_fallback")]
	pub title_fallback: String,
	#[serde(default = "default_empty_message")]
	pub empty_message: String,
}

fn default_page_size() -> u32 {
	30
}

fn default_debounce_ms() -> u64 {
	300
}

fn default_timeout_ms() -> u64 {
	10_000
}

fn default_upload_path() -> String {
	"/api/upload".to_string()
}

fn default_extension() -> String {
	"xlsx".to_string()
}

fn default_max_bytes() -> usize {
	32 * 1_024 * 1_024
}

fn default_empty_query() -> String {
	"suppress".to_string()
}

fn default_has_more() -> String {
	"auto".to_string()
}

fn default_title_exclude() -> Vec<String> {
	vec!["Qty".to_string(), "QTY".to_string(), "NOTE".to_string()]
}

fn default_title_fallback() -> String {
	"Unnamed Part".to_string()
}

fn default_empty_message() -> String {
	"No matching parts found.".to_string()
}
