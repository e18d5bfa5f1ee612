use serde_json::Value;

use crate::{
	item::{ResultItem, display_value, is_blank},
	page::HasMorePolicy,
};

pub type Result<T, E = ScreenError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
	#[error("Unknown empty query policy {0:?}.")]
	UnknownEmptyQueryPolicy(String),
	#[error("Unknown has_more policy {0:?}.")]
	UnknownHasMorePolicy(String),
	#[error("Screen {0:?} has no endpoints.")]
	NoEndpoints(String),
}

/// What a screen does when the debounced query is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyQueryPolicy {
	/// Issue no request and show nothing.
	Suppress,
	/// Request the full, unfiltered set.
	FetchAll,
}
impl EmptyQueryPolicy {
	pub fn parse(raw: &str) -> Result<Self> {
		match raw {
			"suppress" => Ok(Self::Suppress),
			"fetch_all" => Ok(Self::FetchAll),
			other => Err(ScreenError::UnknownEmptyQueryPolicy(other.to_string())),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleRule {
	/// First non-blank value among the listed fields.
	Fields { fields: Vec<String>, fallback: String },
	/// First non-blank payload field that is not excluded.
	FirstField { exclude: Vec<String>, fallback: String },
}
impl TitleRule {
	pub fn title(&self, item: &ResultItem) -> String {
		let found = match self {
			Self::Fields { fields, .. } => fields
				.iter()
				.filter_map(|name| item.field(name))
				.find(|value| !is_blank(value))
				.map(display_value),
			Self::FirstField { exclude, .. } => item
				.fields
				.iter()
				.filter(|(key, _)| !exclude.iter().any(|excluded| excluded == *key))
				.map(|(_, value)| value)
				.find(|value: &&Value| !is_blank(value))
				.map(display_value),
		};

		found.unwrap_or_else(|| self.fallback().to_string())
	}

	fn fallback(&self) -> &str {
		match self {
			Self::Fields { fallback, .. } | Self::FirstField { fallback, .. } => fallback,
		}
	}
}

/// A resolved, validated search screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSpec {
	pub name: String,
	pub endpoints: Vec<String>,
	pub empty_query: EmptyQueryPolicy,
	pub has_more: HasMorePolicy,
	pub title: TitleRule,
	pub empty_message: String,
}
impl ScreenSpec {
	pub fn from_config(cfg: &catalog_config::Screen) -> Result<Self> {
		if cfg.endpoints.is_empty() {
			return Err(ScreenError::NoEndpoints(cfg.name.clone()));
		}

		let empty_query = EmptyQueryPolicy::parse(&cfg.empty_query)?;
		let has_more = HasMorePolicy::parse(&cfg.has_more, cfg.endpoints.len())?;
		let title = if cfg.title_fields.is_empty() {
			TitleRule::FirstField {
				exclude: cfg.title_exclude.clone(),
				fallback: cfg.title_fallback.clone(),
			}
		} else {
			TitleRule::Fields {
				fields: cfg.title_fields.clone(),
				fallback: cfg.title_fallback.clone(),
			}
		};

		Ok(Self {
			name: cfg.name.clone(),
			endpoints: cfg.endpoints.clone(),
			empty_query,
			has_more,
			title,
			empty_message: cfg.empty_message.clone(),
		})
	}

	/// URL-friendly form of the screen name, e.g. "Service Parts" becomes "service-parts".
	pub fn slug(&self) -> String {
		self.name
			.split_whitespace()
			.map(|word| word.to_lowercase())
			.collect::<Vec<_>>()
			.join("-")
	}
}
