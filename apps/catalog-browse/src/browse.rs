use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};

use catalog_client::{PageSource, SearchSession, SessionSettings};
use catalog_domain::{Route, ScreenError, ScreenSpec};

use crate::render;

/// Every screen the browser can open, resolved from configuration.
#[derive(Debug, Clone)]
pub struct Catalog {
	pub engines: ScreenSpec,
	pub service_parts: ScreenSpec,
	pub categories: Vec<ScreenSpec>,
}
impl Catalog {
	pub fn from_config(cfg: &catalog_config::Config) -> Result<Self, ScreenError> {
		Ok(Self {
			engines: ScreenSpec::from_config(&cfg.engines)?,
			service_parts: ScreenSpec::from_config(&cfg.service_parts)?,
			categories: cfg
				.categories
				.iter()
				.map(ScreenSpec::from_config)
				.collect::<Result<Vec<_>, _>>()?,
		})
	}

	/// Resolves a 1-based number, a name, or a slug to a category.
	pub fn category(&self, selection: &str) -> Option<&ScreenSpec> {
		let selection = selection.trim();

		if let Ok(number) = selection.parse::<usize>() {
			return number.checked_sub(1).and_then(|index| self.categories.get(index));
		}

		self.categories.iter().find(|category| {
			category.name.eq_ignore_ascii_case(selection)
				|| category.slug().eq_ignore_ascii_case(selection)
		})
	}
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	More,
	Back,
	Quit,
	Input(String),
}
impl Command {
	pub fn parse(line: &str) -> Self {
		match line.trim() {
			":more" => Self::More,
			":back" => Self::Back,
			":quit" | ":q" => Self::Quit,
			_ => Self::Input(line.to_string()),
		}
	}
}

enum Next {
	Open(Route),
	Search(ScreenSpec),
	Quit,
}

pub struct Browser<R, W> {
	catalog: Catalog,
	source: Arc<dyn PageSource>,
	settings: SessionSettings,
	lines: Lines<R>,
	out: W,
}
impl<R, W> Browser<R, W>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	pub fn new(
		catalog: Catalog,
		source: Arc<dyn PageSource>,
		settings: SessionSettings,
		lines: Lines<R>,
		out: W,
	) -> Self {
		Self { catalog, source, settings, lines, out }
	}

	pub fn into_output(self) -> W {
		self.out
	}

	/// Runs until `:quit` or end of input.
	pub async fn run(&mut self, start: Route) -> color_eyre::Result<()> {
		let mut next = Next::Open(start);

		loop {
			next = match next {
				Next::Open(route) => self.open(route).await?,
				Next::Search(screen) => self.search(screen).await?,
				Next::Quit => break,
			};
		}

		self.out.flush().await?;

		Ok(())
	}

	async fn open(&mut self, route: Route) -> color_eyre::Result<Next> {
		tracing::debug!(%route, "Opening route.");

		match route {
			Route::Categories => self.categories().await,
			Route::Engines => Ok(Next::Search(self.catalog.engines.clone())),
			Route::ServiceParts => Ok(Next::Search(self.catalog.service_parts.clone())),
			Route::Category { name } => self.static_page(render::category_page(&name)).await,
			Route::NotFound(path) => self.static_page(render::not_found(&path)).await,
		}
	}

	async fn categories(&mut self) -> color_eyre::Result<Next> {
		self.write(&render::categories(&self.catalog.categories)).await?;

		loop {
			let Some(line) = self.lines.next_line().await? else {
				return Ok(Next::Quit);
			};

			match Command::parse(&line) {
				Command::Quit => return Ok(Next::Quit),
				Command::More | Command::Back => continue,
				Command::Input(selection) if selection.trim().is_empty() => continue,
				Command::Input(selection) => match self.catalog.category(&selection) {
					Some(screen) => return Ok(Next::Search(screen.clone())),
					None => {
						let message = format!("No category matches {:?}.\n", selection.trim());

						self.write(&message).await?;
					},
				},
			}
		}
	}

	async fn static_page(&mut self, page: String) -> color_eyre::Result<Next> {
		self.write(&page).await?;

		loop {
			let Some(line) = self.lines.next_line().await? else {
				return Ok(Next::Quit);
			};

			match Command::parse(&line) {
				Command::Quit => return Ok(Next::Quit),
				Command::Back => return Ok(Next::Open(Route::Categories)),
				Command::More | Command::Input(_) => continue,
			}
		}
	}

	async fn search(&mut self, screen: ScreenSpec) -> color_eyre::Result<Next> {
		self.write(&render::screen_header(&screen)).await?;

		let session = SearchSession::spawn(self.source.clone(), screen, self.settings);
		let mut updates = session.subscribe();
		let mut last_frame = String::new();
		let next = loop {
			let frame = render::view(&session.view());

			if frame != last_frame {
				self.write(&frame).await?;

				last_frame = frame;
			}

			tokio::select! {
				changed = updates.changed() => {
					if changed.is_err() {
						break Next::Open(Route::Categories);
					}
				},
				line = self.lines.next_line() => match line? {
					None => break Next::Quit,
					Some(line) => match Command::parse(&line) {
						Command::Quit => break Next::Quit,
						Command::Back => break Next::Open(Route::Categories),
						Command::More => session.load_more().await?,
						Command::Input(raw) => session.input(raw).await?,
					},
				},
			}
		};

		session.close().await;

		Ok(next)
	}

	async fn write(&mut self, text: &str) -> color_eyre::Result<()> {
		self.out.write_all(text.as_bytes()).await?;
		self.out.flush().await?;

		Ok(())
	}
}
