use clap::Parser;
use command::Cli;
use context::CliContext;
use nuzbot::commands::router::execute_words;
use nuzbot::context::config::ProviderConfig;
use nuzbot::context::paths::NuzPaths;
use nuzbot::context::{Error, UserContext};
use nuzbot::logs;

mod command;
mod context;

#[tokio::main]
async fn main() -> Result<(), Error> {
	logs::init();
	let cli = Cli::parse();

	let paths = match cli.data_dir {
		Some(dir) => NuzPaths::from_data_dir(dir)?,
		None => NuzPaths::new()?,
	};

	let mut ctx = CliContext::new(UserContext::new(paths, &ProviderConfig::from_env()?)?);

	let words = cli.command.iter().map(String::as_str).collect::<Vec<_>>();
	if !execute_words(&mut ctx, &words).await? {
		std::process::exit(1);
	}

	Ok(())
}
