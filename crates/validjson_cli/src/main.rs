#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;
mod logging;

/// Exit status when diagnostics were reported.
const EXIT_DIAGNOSTICS: i32 = 3;

#[derive(Parser)]
#[command(name = "validjson", about = "Report json-tagged struct fields whose types cannot be encoded")]
struct Cli {
	#[command(flatten)]
	log: logging::LogArgs,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Check source files for tagged fields of non-serializable types.
	Check(cmd::check::Args),
	/// List declared types with their underlying types and method sets.
	Types(cmd::types::Args),
}

fn main() {
	let cli = Cli::parse();
	logging::init_logging(&cli.log);

	match run(cli.command) {
		Ok(false) => {}
		Ok(true) => std::process::exit(EXIT_DIAGNOSTICS),
		Err(err) => {
			eprintln!("error: {err}");
			std::process::exit(1);
		}
	}
}

/// Returns whether any diagnostic was reported.
fn run(command: Commands) -> validjson::analysis::Result<bool> {
	match command {
		Commands::Check(args) => cmd::check::run(args),
		Commands::Types(args) => cmd::types::run(args).map(|()| false),
	}
}
