use std::fmt::{Display, Formatter};

/// Screens reachable by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
	/// `/`: lists the configured categories.
	Categories,
	/// `/category/<name>`: generic page for one category.
	Category { name: String },
	/// `/engines`
	Engines,
	/// `/service-parts`
	ServiceParts,
	NotFound(String),
}
impl Route {
	pub fn parse(path: &str) -> Self {
		let path = path.split(['?', '#']).next().unwrap_or_default();
		let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

		match segments.as_slice() {
			[] => Self::Categories,
			["engines"] => Self::Engines,
			["service-parts"] => Self::ServiceParts,
			["category", name] => Self::Category { name: (*name).to_string() },
			_ => Self::NotFound(path.to_string()),
		}
	}

	/// Display title of a category page, e.g. "spark-plugs" becomes "spark plugs".
	pub fn category_title(name: &str) -> String {
		name.replace('-', " ")
	}
}
impl Display for Route {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Categories => write!(f, "/"),
			Self::Category { name } => write!(f, "/category/{name}"),
			Self::Engines => write!(f, "/engines"),
			Self::ServiceParts => write!(f, "/service-parts"),
			Self::NotFound(path) => write!(f, "{path}"),
		}
	}
}
