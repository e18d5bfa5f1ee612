use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = catalog_browse::Args::parse();
	catalog_browse::run(args).await
}
