use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// A single record returned by the search API.
///
/// The payload is opaque and keeps the field order it arrived in. Only the two reserved tags are
/// typed: `sheet` is the origin label used for grouping and `source` names the catalog the row was
/// loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
	#[serde(default, deserialize_with = "lenient_label", skip_serializing_if = "Option::is_none")]
	pub sheet: Option<String>,
	#[serde(default, deserialize_with = "lenient_label", skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	#[serde(flatten)]
	pub fields: Map<String, Value>,
}
impl ResultItem {
	pub fn new(fields: Map<String, Value>) -> Self {
		Self { sheet: None, source: None, fields }
	}

	pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
		self.sheet = Some(sheet.into());

		self
	}

	/// Tags the item with `label` unless the server already supplied an origin.
	pub fn with_origin_fallback(mut self, label: &str) -> Self {
		if self.sheet.is_none() {
			self.sheet = Some(label.to_string());
		}

		self
	}

	pub fn origin(&self) -> Option<&str> {
		self.sheet.as_deref()
	}

	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}

	/// Non-blank payload fields in arrival order, rendered for display.
	pub fn visible_fields(&self) -> impl Iterator<Item = (&str, String)> {
		self.fields
			.iter()
			.filter(|(_, value)| !is_blank(value))
			.map(|(key, value)| (key.as_str(), display_value(value)))
	}
}

/// Null, empty strings, `false`, and zero carry nothing worth showing on a card.
pub fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::String(text) => text.is_empty(),
		Value::Number(number) => number.as_f64().map(|n| n == 0.0).unwrap_or(false),
		Value::Array(_) | Value::Object(_) => false,
	}
}

pub fn display_value(value: &Value) -> String {
	match value {
		Value::Null => "null".to_string(),
		Value::Bool(flag) => flag.to_string(),
		Value::String(text) => text.clone(),
		Value::Number(number) => display_number(number),
		Value::Array(_) | Value::Object(_) => value.to_string(),
	}
}

// Spreadsheet cells come back as floats; `4.0` reads better as `4`.
fn display_number(number: &Number) -> String {
	if number.is_f64()
		&& let Some(float) = number.as_f64()
		&& float.fract() == 0.0
		&& float.abs() < 1e15
	{
		return format!("{}", float as i64);
	}

	number.to_string()
}

fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;

	Ok(match value {
		None | Some(Value::Null) => None,
		Some(Value::String(text)) if text.is_empty() => None,
		Some(Value::String(text)) => Some(text),
		Some(other) => Some(display_value(&other)),
	})
}
