use std::path::PathBuf;

/// Run a single tracker command against the local database.
#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Directory holding the database
	#[arg(long, env = "NUZBOT_DATA_DIR")]
	pub data_dir: Option<PathBuf>,

	/// The command to run, like `run add RedRun 1`
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	pub command: Vec<String>,
}
