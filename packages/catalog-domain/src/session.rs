//! Search session state and its transition function.
//!
//! Every change to what a screen shows goes through [`reduce`]. The function is pure: the driver
//! performs the returned [`FetchCommand`] and feeds the outcome back as another event, tagged with
//! the token it was issued under. Outcomes carrying any other token are dropped, so a superseded
//! request can never touch the current result set.

use crate::{
	item::ResultItem,
	page::{Page, PageRequest},
	screen::EmptyQueryPolicy,
};

/// Monotonically increasing identifier of the request a session currently trusts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);
impl SessionToken {
	pub fn next(self) -> Self {
		Self(self.0 + 1)
	}

	pub fn get(self) -> u64 {
		self.0
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
	/// Last page applied to the result set; zero before anything loaded.
	pub page: u32,
	/// Kept from the previous query while its replacement's first page is in flight.
	pub has_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
	pub token: SessionToken,
	pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRules {
	pub empty_query: EmptyQueryPolicy,
	pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
	pub rules: SessionRules,
	/// Current debounced query.
	pub query: String,
	pub results: Vec<ResultItem>,
	pub cursor: Cursor,
	pub token: SessionToken,
	pub in_flight: Option<InFlight>,
	pub last_error: Option<String>,
}
impl SearchState {
	pub fn new(rules: SessionRules) -> Self {
		Self {
			rules,
			query: String::new(),
			results: Vec::new(),
			cursor: Cursor::default(),
			token: SessionToken::default(),
			in_flight: None,
			last_error: None,
		}
	}

	pub fn is_loading(&self) -> bool {
		self.in_flight.is_some()
	}

	pub fn is_loading_first_page(&self) -> bool {
		self.in_flight.map(|flight| flight.page == 1).unwrap_or(false)
	}

	/// Whether an outcome tagged with `token` may still be applied.
	pub fn accepts(&self, token: SessionToken) -> bool {
		self.in_flight.map(|flight| flight.token == token).unwrap_or(false)
	}

	pub fn can_load_more(&self) -> bool {
		!self.is_loading()
			&& self.cursor.has_more
			&& self.cursor.page > 0
			&& !self.suppresses_query()
	}

	fn suppresses_query(&self) -> bool {
		self.query.is_empty() && self.rules.empty_query == EmptyQueryPolicy::Suppress
	}

	fn issue(&mut self, page: u32) -> FetchCommand {
		self.token = self.token.next();
		self.in_flight = Some(InFlight { token: self.token, page });

		FetchCommand {
			token: self.token,
			request: PageRequest::new(self.query.clone(), page, self.rules.page_size),
		}
	}
}

/// A fetch the driver must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
	pub token: SessionToken,
	pub request: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
	/// The request was aborted because a newer one superseded it.
	Cancelled,
	Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
	/// The screen was opened.
	Start,
	QueryChanged(String),
	LoadMore,
	PageLoaded { token: SessionToken, page: Page },
	PageFailed { token: SessionToken, failure: FetchFailure },
}

pub fn reduce(mut state: SearchState, event: SearchEvent) -> (SearchState, Option<FetchCommand>) {
	match event {
		SearchEvent::Start => {
			if state.is_loading() || state.suppresses_query() {
				return (state, None);
			}

			let command = state.issue(1);

			(state, Some(command))
		},
		SearchEvent::QueryChanged(query) => {
			let had_more = state.cursor.has_more;

			state.token = state.token.next();
			state.query = query;
			state.results.clear();
			state.cursor = Cursor::default();
			state.in_flight = None;
			state.last_error = None;

			if state.suppresses_query() {
				return (state, None);
			}

			state.cursor.has_more = had_more;

			let command = state.issue(1);

			(state, Some(command))
		},
		SearchEvent::LoadMore => {
			if !state.can_load_more() {
				return (state, None);
			}

			let next = state.cursor.page + 1;
			let command = state.issue(next);

			(state, Some(command))
		},
		SearchEvent::PageLoaded { token, page } => {
			let Some(flight) = state.in_flight.filter(|flight| flight.token == token) else {
				return (state, None);
			};

			if flight.page <= 1 {
				state.results = page.items;
			} else {
				state.results.extend(page.items);
			}

			state.cursor = Cursor { page: flight.page, has_more: page.has_more };
			state.in_flight = None;
			state.last_error = None;

			(state, None)
		},
		SearchEvent::PageFailed { token, failure } => {
			if !state.accepts(token) {
				return (state, None);
			}

			state.in_flight = None;

			if let FetchFailure::Error(message) = failure {
				state.last_error = Some(message);
			}

			(state, None)
		},
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Map, json};

	use super::*;

	fn rules(empty_query: EmptyQueryPolicy) -> SessionRules {
		SessionRules { empty_query, page_size: 30 }
	}

	fn item(title: &str) -> ResultItem {
		let mut fields = Map::new();

		fields.insert("Description".to_string(), json!(title));

		ResultItem::new(fields).with_sheet("sparkplugs")
	}

	fn page(titles: &[&str], has_more: bool) -> Page {
		Page { items: titles.iter().map(|title| item(title)).collect(), has_more }
	}

	#[test]
	fn start_fetches_everything_when_empty_query_means_all() {
		let (state, command) =
			reduce(SearchState::new(rules(EmptyQueryPolicy::FetchAll)), SearchEvent::Start);
		let command = command.expect("expected fetch");

		assert_eq!(command.request, PageRequest::new("", 1, 30));
		assert!(state.is_loading_first_page());
	}

	#[test]
	fn start_is_silent_when_empty_query_is_suppressed() {
		let (state, command) =
			reduce(SearchState::new(rules(EmptyQueryPolicy::Suppress)), SearchEvent::Start);

		assert_eq!(command, None);
		assert!(!state.is_loading());
	}

	#[test]
	fn query_change_resets_results_and_cursor() {
		let state = SearchState::new(rules(EmptyQueryPolicy::FetchAll));
		let (state, first) = reduce(state, SearchEvent::QueryChanged("plug".to_string()));
		let token = first.expect("expected fetch").token;
		let (state, _) = reduce(state, SearchEvent::PageLoaded { token, page: page(&["A"], true) });

		assert_eq!(state.cursor, Cursor { page: 1, has_more: true });

		let (state, second) = reduce(state, SearchEvent::QueryChanged("filter".to_string()));

		assert!(state.results.is_empty());
		assert_eq!(state.cursor, Cursor { page: 0, has_more: true });
		assert!(!state.can_load_more());
		assert_eq!(second.expect("expected fetch").request.page, 1);
	}

	#[test]
	fn stale_outcomes_are_dropped() {
		let state = SearchState::new(rules(EmptyQueryPolicy::Suppress));
		let (state, old) = reduce(state, SearchEvent::QueryChanged("sp".to_string()));
		let (state, new) = reduce(state, SearchEvent::QueryChanged("spark".to_string()));
		let old = old.expect("expected fetch").token;
		let new = new.expect("expected fetch").token;

		assert!(old < new);

		let (state, _) =
			reduce(state, SearchEvent::PageLoaded { token: old, page: page(&["stale"], true) });

		assert!(state.results.is_empty());
		assert!(state.is_loading());

		let (state, _) = reduce(state, SearchEvent::PageFailed {
			token: old,
			failure: FetchFailure::Error("boom".to_string()),
		});

		assert_eq!(state.last_error, None);
		assert!(state.is_loading());
	}

	#[test]
	fn load_more_appends_and_is_ignored_while_loading() {
		let state = SearchState::new(rules(EmptyQueryPolicy::FetchAll));
		let (state, first) = reduce(state, SearchEvent::Start);
		let first = first.expect("expected fetch");
		let (state, ignored) = reduce(state, SearchEvent::LoadMore);

		assert_eq!(ignored, None);

		let (state, _) = reduce(state, SearchEvent::PageLoaded {
			token: first.token,
			page: page(&["A", "B"], true),
		});
		let (state, more) = reduce(state, SearchEvent::LoadMore);
		let more = more.expect("expected fetch");

		assert_eq!(more.request, PageRequest::new("", 2, 30));
		assert!(state.is_loading());
		assert!(!state.is_loading_first_page());

		let (state, _) =
			reduce(state, SearchEvent::PageLoaded { token: more.token, page: page(&["C"], false) });

		assert_eq!(state.results.len(), 3);
		assert_eq!(state.cursor, Cursor { page: 2, has_more: false });
		assert_eq!(reduce(state, SearchEvent::LoadMore).1, None);
	}

	#[test]
	fn failure_keeps_prior_results() {
		let state = SearchState::new(rules(EmptyQueryPolicy::FetchAll));
		let (state, first) = reduce(state, SearchEvent::Start);
		let (state, _) = reduce(state, SearchEvent::PageLoaded {
			token: first.expect("expected fetch").token,
			page: page(&["A"], true),
		});
		let (state, more) = reduce(state, SearchEvent::LoadMore);
		let (state, _) = reduce(state, SearchEvent::PageFailed {
			token: more.expect("expected fetch").token,
			failure: FetchFailure::Error("502 Bad Gateway".to_string()),
		});

		assert_eq!(state.results.len(), 1);
		assert!(!state.is_loading());
		assert_eq!(state.last_error.as_deref(), Some("502 Bad Gateway"));
		assert!(state.can_load_more());
	}

	#[test]
	fn cancellation_is_not_reported() {
		let state = SearchState::new(rules(EmptyQueryPolicy::FetchAll));
		let (state, first) = reduce(state, SearchEvent::Start);
		let (state, _) = reduce(state, SearchEvent::PageFailed {
			token: first.expect("expected fetch").token,
			failure: FetchFailure::Cancelled,
		});

		assert_eq!(state.last_error, None);
		assert!(!state.is_loading());
	}

	#[test]
	fn clearing_a_suppressed_query_clears_results_without_fetching() {
		let state = SearchState::new(rules(EmptyQueryPolicy::Suppress));
		let (state, first) = reduce(state, SearchEvent::QueryChanged("oil".to_string()));
		let (state, _) = reduce(state, SearchEvent::PageLoaded {
			token: first.expect("expected fetch").token,
			page: page(&["A"], true),
		});
		let (state, command) = reduce(state, SearchEvent::QueryChanged(String::new()));

		assert_eq!(command, None);
		assert!(state.results.is_empty());
		assert_eq!(state.cursor, Cursor::default());
		assert!(!state.can_load_more());
	}

	#[test]
	fn failed_first_page_leaves_nothing_to_load() {
		let state = SearchState::new(rules(EmptyQueryPolicy::FetchAll));
		let (state, first) = reduce(state, SearchEvent::Start);
		let (state, _) = reduce(state, SearchEvent::PageLoaded {
			token: first.expect("expected fetch").token,
			page: page(&["A"], true),
		});
		let (state, second) = reduce(state, SearchEvent::QueryChanged("oil".to_string()));
		let (state, _) = reduce(state, SearchEvent::PageFailed {
			token: second.expect("expected fetch").token,
			failure: FetchFailure::Error("timed out".to_string()),
		});

		assert!(state.results.is_empty());
		assert!(!state.can_load_more());
		assert_eq!(reduce(state, SearchEvent::LoadMore).1, None);
	}
}
