use std::collections::HashMap;

use crate::{item::ResultItem, screen::ScreenSpec, session::SearchState};

pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
	pub title: String,
	pub fields: Vec<(String, String)>,
	pub source: Option<String>,
	pub sheet: Option<String>,
}
impl Card {
	pub fn new(item: &ResultItem, screen: &ScreenSpec) -> Self {
		Self {
			title: screen.title.title(item),
			fields: item
				.visible_fields()
				.map(|(key, value)| (key.to_string(), value))
				.collect(),
			source: item.source.clone(),
			sheet: item.sheet.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
	pub label: String,
	pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
	Hidden,
	Enabled,
	/// More pages exist but a fetch is still in flight.
	Disabled,
}

/// Everything a front end needs to draw one search screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
	pub screen: String,
	pub query: String,
	pub loading: bool,
	pub groups: Vec<Group>,
	pub empty_message: Option<String>,
	pub error: Option<String>,
	pub load_more: LoadMore,
}
impl SearchView {
	pub fn new(state: &SearchState, screen: &ScreenSpec) -> Self {
		let loading = state.is_loading_first_page();
		let groups = group_by_origin(&state.results)
			.into_iter()
			.map(|(label, items)| Group {
				label,
				cards: items.into_iter().map(|item| Card::new(item, screen)).collect(),
			})
			.collect::<Vec<_>>();
		let empty_message = (!state.query.is_empty()
			&& !state.is_loading()
			&& state.results.is_empty())
		.then(|| screen.empty_message.clone());
		let load_more = match (state.cursor.has_more, state.is_loading(), state.cursor.page > 0) {
			(true, true, _) => LoadMore::Disabled,
			(true, false, true) => LoadMore::Enabled,
			_ => LoadMore::Hidden,
		};

		Self {
			screen: screen.name.clone(),
			query: state.query.clone(),
			loading,
			groups,
			empty_message,
			error: state.last_error.clone(),
			load_more,
		}
	}

	pub fn card_count(&self) -> usize {
		self.groups.iter().map(|group| group.cards.len()).sum()
	}
}

/// Groups items by origin label, keeping the order in which each label was first seen.
pub fn group_by_origin(items: &[ResultItem]) -> Vec<(String, Vec<&ResultItem>)> {
	let mut groups: Vec<(String, Vec<&ResultItem>)> = Vec::new();
	let mut index: HashMap<&str, usize> = HashMap::new();

	for item in items {
		let label = item.origin().unwrap_or(UNKNOWN_GROUP);
		let slot = *index.entry(label).or_insert_with(|| {
			groups.push((label.to_string(), Vec::new()));

			groups.len() - 1
		});

		groups[slot].1.push(item);
	}

	groups
}
