use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::{Table, Value};

use catalog_config::Error;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_table() -> Table {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn section<'a>(root: &'a mut Table, name: &str) -> &'a mut Table {
	root.get_mut(name)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{name}]."))
}

fn write_temp_config(root: &Table) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let payload = toml::to_string(root).expect("Failed to render template config.");
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("catalog_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_table(root: &Table) -> catalog_config::Result<catalog_config::Config> {
	let path = write_temp_config(root);
	let result = catalog_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(root: &Table, needle: &str) {
	let err = load_table(root).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");
	assert!(message.starts_with("Invalid catalog config: "), "Unexpected error message: {message}");
	assert!(message.contains(needle), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_table(&sample_table()).expect("Sample config must load.");

	assert_eq!(cfg.search.api_base, "http://localhost:8000");
	assert_eq!(cfg.search.page_size, 30);
	assert_eq!(cfg.upload.extension, "xlsx");
	assert_eq!(cfg.service_parts.endpoints, vec!["/api/sparkplugs", "/api/filters"]);
	assert_eq!(cfg.categories.len(), 2);
}

#[test]
fn category_defaults_are_applied() {
	let cfg = load_table(&sample_table()).expect("Sample config must load.");
	let category = &cfg.categories[0];

	assert_eq!(category.empty_query, "suppress");
	assert_eq!(category.has_more, "auto");
	assert!(category.title_fields.is_empty());
	assert_eq!(category.title_exclude, vec!["Qty", "QTY", "NOTE"]);
	assert_eq!(category.title_fallback, "Unnamed Part");
	assert_eq!(category.empty_message, "No matching parts found.");
}

#[test]
fn search_defaults_are_applied() {
	let mut root = sample_table();
	let search = section(&mut root, "search");

	search.remove("page_size");
	search.remove("debounce_ms");

	let cfg = load_table(&root).expect("Config without optional keys must load.");

	assert_eq!(cfg.search.page_size, 30);
	assert_eq!(cfg.search.debounce_ms, 300);
}

#[test]
fn page_size_must_be_positive() {
	let mut root = sample_table();

	section(&mut root, "search").insert("page_size".to_string(), Value::Integer(0));

	expect_validation(&root, "search.page_size must be greater than zero.");
}

#[test]
fn empty_query_policy_must_be_known() {
	let mut root = sample_table();

	section(&mut root, "engines")
		.insert("empty_query".to_string(), Value::String("sometimes".to_string()));

	expect_validation(&root, "engines.empty_query must be one of suppress or fetch_all.");
}

#[test]
fn has_more_policy_is_case_insensitive() {
	let mut root = sample_table();

	section(&mut root, "service_parts")
		.insert("has_more".to_string(), Value::String(" Server_Flag ".to_string()));

	let cfg = load_table(&root).expect("Mixed-case policy must load.");

	assert_eq!(cfg.service_parts.has_more, "server_flag");
}

#[test]
fn screens_require_endpoints() {
	let mut root = sample_table();

	section(&mut root, "service_parts").insert("endpoints".to_string(), Value::Array(vec![]));

	expect_validation(&root, "service_parts.endpoints must be non-empty");
}

#[test]
fn endpoints_must_be_absolute_paths() {
	let mut root = sample_table();

	section(&mut root, "engines").insert(
		"endpoints".to_string(),
		Value::Array(vec![Value::String("api/engines".to_string())]),
	);

	expect_validation(&root, "must be an absolute path");
}

#[test]
fn duplicate_category_names_are_rejected() {
	let mut root = sample_table();
	let categories = root
		.get_mut("categories")
		.and_then(Value::as_array_mut)
		.expect("Template config must include [[categories]].");
	let duplicate = categories[0].clone();

	categories.push(duplicate);

	expect_validation(&root, "categories contains duplicate name");
}

#[test]
fn upload_path_must_be_absolute() {
	let mut root = sample_table();

	section(&mut root, "upload").insert("path".to_string(), Value::String("upload".to_string()));

	expect_validation(&root, "upload.path must start with '/'.");
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("catalog_config_test_missing_file.toml");
	let err = catalog_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error kind: {err:?}");
	assert!(err.to_string().starts_with("Cannot read catalog config"), "Unexpected error: {err}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let mut path = env::temp_dir();

	path.push(format!("catalog_config_test_malformed_{}.toml", std::process::id()));

	fs::write(&path, "[service\nhttp_bind = ").expect("Failed to write test config.");

	let result = catalog_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error kind: {err:?}");
	assert!(err.to_string().contains("is not valid TOML"), "Unexpected error: {err}");
}
