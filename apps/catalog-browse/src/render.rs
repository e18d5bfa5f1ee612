//! Plain-text rendering of browse screens.

use std::fmt::Write;

use catalog_domain::{Card, LoadMore, Route, ScreenSpec, SearchView};

pub const LOADING: &str = "Loading...";

pub fn categories(categories: &[ScreenSpec]) -> String {
	let mut out = String::from("== Categories ==\n");

	if categories.is_empty() {
		out.push_str("No categories configured.\n");
	}

	for (index, category) in categories.iter().enumerate() {
		let _ = writeln!(out, "{:>3}. {}", index + 1, category.name);
	}

	out.push_str("Type a number or name to search a category, or :quit.\n");

	out
}

pub fn category_page(name: &str) -> String {
	let title = Route::category_title(name);

	format!(
		"== {title} ==\nShowing parts for the {title} category.\nType :back to return to categories.\n"
	)
}

pub fn not_found(path: &str) -> String {
	format!("No page at {path}.\nType :back to return to categories.\n")
}

pub fn screen_header(screen: &ScreenSpec) -> String {
	format!("== {} ==\nType to search. Commands: :more, :back, :quit.\n", screen.name)
}

pub fn view(view: &SearchView) -> String {
	let mut out = String::new();

	if view.query.is_empty() {
		let _ = writeln!(out, "-- {} --", view.screen);
	} else {
		let _ = writeln!(out, "-- {}: \"{}\" --", view.screen, view.query);
	}
	if view.loading {
		let _ = writeln!(out, "{LOADING}");

		return out;
	}

	for group in &view.groups {
		let _ = writeln!(out, "[{}]", group.label);

		for card in &group.cards {
			card_lines(&mut out, card);
		}
	}

	if let Some(message) = &view.empty_message {
		let _ = writeln!(out, "{message}");
	}
	if let Some(error) = &view.error {
		let _ = writeln!(out, "! {error}");
	}

	match view.load_more {
		LoadMore::Hidden => {},
		LoadMore::Enabled => out.push_str("(:more to load more)\n"),
		LoadMore::Disabled => {
			let _ = writeln!(out, "({LOADING})");
		},
	}

	out
}

fn card_lines(out: &mut String, card: &Card) {
	let _ = writeln!(out, "  * {}", card.title);

	for (key, value) in &card.fields {
		let _ = writeln!(out, "      {key}: {value}");
	}

	let footer = [card.source.as_deref(), card.sheet.as_deref()]
		.into_iter()
		.flatten()
		.collect::<Vec<_>>()
		.join(" / ");

	if !footer.is_empty() {
		let _ = writeln!(out, "      ({footer})");
	}
}
