mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Screen, Search, Service, Upload};

use std::{collections::HashSet, fs, path::Path};

pub const EMPTY_QUERY_POLICIES: [&str; 2] = ["suppress", "fetch_all"];
pub const HAS_MORE_POLICIES: [&str; 3] = ["auto", "server_flag", "non_empty"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.search.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.search.page_size == 0 {
		return Err(Error::Validation {
			message: "search.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.upload.path.starts_with('/') {
		return Err(Error::Validation { message: "upload.path must start with '/'.".to_string() });
	}
	if cfg.upload.data_dir.trim().is_empty() {
		return Err(Error::Validation {
			message: "upload.data_dir must be non-empty.".to_string(),
		});
	}
	if cfg.upload.extension.is_empty()
		|| !cfg.upload.extension.chars().all(|ch| ch.is_ascii_alphanumeric())
	{
		return Err(Error::Validation {
			message: "upload.extension must be a non-empty alphanumeric extension.".to_string(),
		});
	}
	if cfg.upload.refresh_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "upload.refresh_base must be non-empty.".to_string(),
		});
	}
	if cfg.upload.refresh_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "upload.refresh_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.upload.max_bytes == 0 {
		return Err(Error::Validation {
			message: "upload.max_bytes must be greater than zero.".to_string(),
		});
	}

	validate_screen("engines", &cfg.engines)?;
	validate_screen("service_parts", &cfg.service_parts)?;

	let mut seen = HashSet::new();

	for screen in &cfg.categories {
		validate_screen("categories", screen)?;

		if !seen.insert(screen.name.to_lowercase()) {
			return Err(Error::Validation {
				message: format!("categories contains duplicate name {:?}.", screen.name),
			});
		}
	}

	Ok(())
}

fn validate_screen(label: &str, screen: &Screen) -> Result<()> {
	if screen.name.trim().is_empty() {
		return Err(Error::Validation { message: format!("{label}.name must be non-empty.") });
	}
	if screen.endpoints.is_empty() {
		return Err(Error::Validation {
			message: format!("{label}.endpoints must be non-empty for screen {:?}.", screen.name),
		});
	}

	for endpoint in &screen.endpoints {
		if !endpoint.starts_with('/') || endpoint.trim_end_matches('/').is_empty() {
			return Err(Error::Validation {
				message: format!(
					"{label}.endpoints entry {endpoint:?} must be an absolute path such as /api/engines."
				),
			});
		}
	}

	if !EMPTY_QUERY_POLICIES.contains(&screen.empty_query.as_str()) {
		return Err(Error::Validation {
			message: format!("{label}.empty_query must be one of suppress or fetch_all."),
		});
	}
	if !HAS_MORE_POLICIES.contains(&screen.has_more.as_str()) {
		return Err(Error::Validation {
			message: format!("{label}.has_more must be one of auto, server_flag, or non_empty."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.api_base = cfg.search.api_base.trim().trim_end_matches('/').to_string();
	cfg.upload.refresh_base = cfg.upload.refresh_base.trim().trim_end_matches('/').to_string();
	cfg.upload.extension = cfg.upload.extension.trim().trim_start_matches('.').to_string();

	for screen in
		[&mut cfg.engines, &mut cfg.service_parts].into_iter().chain(cfg.categories.iter_mut())
	{
		screen.name = screen.name.trim().to_string();
		screen.empty_query = screen.empty_query.trim().to_ascii_lowercase();
		screen.has_more = screen.has_more.trim().to_ascii_lowercase();

		for endpoint in &mut screen.endpoints {
			*endpoint = endpoint.trim().to_string();
		}
	}
}
