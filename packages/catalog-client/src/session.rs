use std::{mem, sync::Arc, time::Duration};

use tokio::{
	sync::{mpsc, oneshot, watch},
	task::JoinHandle,
	time::{self, Instant},
};

use catalog_domain::{
	Debouncer, FetchCommand, FetchFailure, Page, ScreenSpec, SearchEvent, SearchState, SearchView,
	SessionRules, SessionToken, reduce,
};

use crate::{Error, PageSource, Result, aggregate};

const ACTION_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
	pub debounce: Duration,
	pub page_size: u32,
}
impl SessionSettings {
	pub fn from_config(cfg: &catalog_config::Search) -> Self {
		Self { debounce: Duration::from_millis(cfg.debounce_ms), page_size: cfg.page_size }
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
	/// Raw input changed; it is debounced before it becomes a query.
	Input(String),
	LoadMore,
}

/// Handle to a running search session for one screen.
///
/// The session task owns all state. Every transition is published on a watch channel, so callers
/// observe a consistent snapshot and never mutate it directly. Dropping the handle stops the task
/// and cancels any fetch still in flight.
pub struct SearchSession {
	screen: ScreenSpec,
	actions: mpsc::Sender<SessionAction>,
	state: watch::Receiver<SearchState>,
	task: JoinHandle<()>,
}
impl SearchSession {
	pub fn spawn(source: Arc<dyn PageSource>, screen: ScreenSpec, settings: SessionSettings) -> Self {
		let rules = SessionRules { empty_query: screen.empty_query, page_size: settings.page_size };
		let initial = SearchState::new(rules);
		let (action_tx, action_rx) = mpsc::channel(ACTION_BUFFER);
		let (state_tx, state_rx) = watch::channel(initial.clone());
		let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
		let driver = Driver {
			source,
			screen: screen.clone(),
			debouncer: Debouncer::new(settings.debounce),
			state: initial,
			published: state_tx,
			outcomes: outcome_tx,
			fetch: None,
		};
		let task = tokio::spawn(driver.run(action_rx, outcome_rx));

		Self { screen, actions: action_tx, state: state_rx, task }
	}

	pub async fn input(&self, raw: impl Into<String>) -> Result<()> {
		self.send(SessionAction::Input(raw.into())).await
	}

	pub async fn load_more(&self) -> Result<()> {
		self.send(SessionAction::LoadMore).await
	}

	pub fn state(&self) -> SearchState {
		self.state.borrow().clone()
	}

	pub fn view(&self) -> SearchView {
		SearchView::new(&self.state.borrow(), &self.screen)
	}

	pub fn subscribe(&self) -> watch::Receiver<SearchState> {
		self.state.clone()
	}

	/// Stops the session and waits for its task to finish.
	pub async fn close(self) {
		let Self { actions, task, .. } = self;

		drop(actions);

		if let Err(err) = task.await
			&& !err.is_cancelled()
		{
			tracing::error!(error = %err, "Search session task failed.");
		}
	}

	async fn send(&self, action: SessionAction) -> Result<()> {
		self.actions.send(action).await.map_err(|_| Error::SessionClosed)
	}
}

struct FetchOutcome {
	token: SessionToken,
	result: Result<Page>,
}
impl FetchOutcome {
	fn into_event(self) -> SearchEvent {
		match self.result {
			Ok(page) => SearchEvent::PageLoaded { token: self.token, page },
			Err(err) if err.is_cancelled() =>
				SearchEvent::PageFailed { token: self.token, failure: FetchFailure::Cancelled },
			Err(err) => SearchEvent::PageFailed {
				token: self.token,
				failure: FetchFailure::Error(err.to_string()),
			},
		}
	}
}

struct ActiveFetch {
	token: SessionToken,
	cancel: oneshot::Sender<()>,
	handle: JoinHandle<()>,
}

struct Driver {
	source: Arc<dyn PageSource>,
	screen: ScreenSpec,
	debouncer: Debouncer,
	state: SearchState,
	published: watch::Sender<SearchState>,
	outcomes: mpsc::UnboundedSender<FetchOutcome>,
	fetch: Option<ActiveFetch>,
}
impl Driver {
	async fn run(
		mut self,
		mut actions: mpsc::Receiver<SessionAction>,
		mut outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
	) {
		self.dispatch(SearchEvent::Start);

		loop {
			let deadline = self.debouncer.deadline();
			let wake = deadline.map(Instant::from_std).unwrap_or_else(Instant::now);

			tokio::select! {
				action = actions.recv() => match action {
					Some(SessionAction::Input(raw)) =>
						self.debouncer.input(raw, Instant::now().into_std()),
					Some(SessionAction::LoadMore) => self.dispatch(SearchEvent::LoadMore),
					None => break,
				},
				_ = time::sleep_until(wake), if deadline.is_some() => {
					if let Some(query) = self.debouncer.settle(Instant::now().into_std()) {
						self.dispatch(SearchEvent::QueryChanged(query));
					}
				},
				Some(outcome) = outcomes.recv() => self.dispatch(outcome.into_event()),
			}
		}

		if let Some(active) = self.fetch.take() {
			active.handle.abort();
		}

		tracing::debug!(screen = %self.screen.name, "Search session closed.");
	}

	fn dispatch(&mut self, event: SearchEvent) {
		let settled = match &event {
			SearchEvent::PageLoaded { token, .. } | SearchEvent::PageFailed { token, .. } =>
				Some(*token),
			_ => None,
		};

		match &event {
			SearchEvent::PageLoaded { token, .. } | SearchEvent::PageFailed { token, .. }
				if !self.state.accepts(*token) =>
			{
				tracing::debug!(
					screen = %self.screen.name,
					token = token.get(),
					current = self.state.token.get(),
					"Discarded stale search outcome."
				);
			},
			SearchEvent::PageFailed { failure: FetchFailure::Error(message), .. } => {
				tracing::warn!(
					screen = %self.screen.name,
					query = %self.state.query,
					error = %message,
					"Search fetch failed."
				);
			},
			_ => {},
		}

		let rules = self.state.rules;
		let current = mem::replace(&mut self.state, SearchState::new(rules));
		let (next, command) = reduce(current, event);

		self.state = next;

		if settled.is_some() && self.fetch.as_ref().map(|active| active.token) == settled {
			self.fetch = None;
		}
		if self.fetch.as_ref().is_some_and(|active| active.token != self.state.token) {
			self.cancel_fetch();
		}
		if let Some(command) = command {
			self.start_fetch(command);
		}

		self.published.send_replace(self.state.clone());
	}

	fn cancel_fetch(&mut self) {
		let Some(active) = self.fetch.take() else {
			return;
		};

		tracing::debug!(
			screen = %self.screen.name,
			token = active.token.get(),
			"Cancelling superseded fetch."
		);

		let _ = active.cancel.send(());
	}

	fn start_fetch(&mut self, command: FetchCommand) {
		let FetchCommand { token, request } = command;
		let source = self.source.clone();
		let endpoints = self.screen.endpoints.clone();
		let policy = self.screen.has_more;
		let outcomes = self.outcomes.clone();
		let (cancel_tx, cancel_rx) = oneshot::channel();

		tracing::debug!(
			screen = %self.screen.name,
			token = token.get(),
			query = %request.query,
			page = request.page,
			"Dispatching search fetch."
		);

		let handle = tokio::spawn(async move {
			let result = tokio::select! {
				result = aggregate::fetch_merged(source.as_ref(), &endpoints, &request, policy) =>
					result,
				_ = cancel_rx => Err(Error::Cancelled),
			};

			let _ = outcomes.send(FetchOutcome { token, result });
		});

		self.fetch = Some(ActiveFetch { token, cancel: cancel_tx, handle });
	}
}
