pub mod browse;
pub mod render;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use catalog_client::{HttpPageSource, SessionSettings};
use catalog_domain::Route;

use crate::browse::{Browser, Catalog};

#[derive(Debug, Parser)]
#[command(
	version = catalog_cli::VERSION,
	rename_all = "kebab",
	styles = catalog_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Path to open first, e.g. /engines or /category/spark-plugs.
	#[arg(long, value_name = "PATH", default_value = "/")]
	pub route: String,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = catalog_config::load(&args.config)?;
	init_tracing(&config)?;
	let catalog = Catalog::from_config(&config)?;
	let source = Arc::new(HttpPageSource::new(&config.search)?);
	let settings = SessionSettings::from_config(&config.search);
	let lines = BufReader::new(io::stdin()).lines();
	let mut browser = Browser::new(catalog, source, settings, lines, io::stdout());

	tracing::debug!(api_base = %config.search.api_base, route = %args.route, "Browser starting.");

	browser.run(Route::parse(&args.route)).await
}

// Stdout carries rendered screens; logs go to stderr.
fn init_tracing(config: &catalog_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
	Ok(())
}
