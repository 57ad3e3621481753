use clap::Parser;

use aqua::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	aqua::run(args).await
}
