use std::fmt;

/// Output format for log events on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
	Text,
	Json,
}

/// Logging verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum LogLevel {
	Error,
	Warn,
	Info,
	Debug,
	Trace,
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
			LogLevel::Trace => "trace",
		};
		f.write_str(text)
	}
}

/// Global logging flags.
#[derive(Debug, clap::Args)]
pub struct LogArgs {
	/// Minimum level of emitted events; `RUST_LOG` takes precedence.
	#[arg(long, global = true, value_enum, env = "VALIDJSON_LOG_LEVEL", default_value_t = LogLevel::Warn)]
	pub log_level: LogLevel,
	#[arg(long, global = true, value_enum, env = "VALIDJSON_LOG_FORMAT", default_value_t = LogFormat::Text)]
	pub log_format: LogFormat,
}

/// Install the process-wide subscriber writing to stderr.
pub fn init_logging(args: &LogArgs) {
	use std::io::IsTerminal;
	use std::sync::OnceLock;
	use tracing_subscriber::{EnvFilter, fmt};

	static INITIALISED: OnceLock<()> = OnceLock::new();

	INITIALISED.get_or_init(|| {
		let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level.to_string()));
		let builder = fmt::fmt()
			.with_env_filter(filter)
			.with_ansi(use_ansi)
			.with_writer(std::io::stderr)
			.with_target(true)
			.with_level(true);

		let installed = match args.log_format {
			LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
			LogFormat::Text => tracing::subscriber::set_global_default(builder.compact().finish()),
		};
		if let Err(err) = installed {
			eprintln!("warning: logging unavailable: {err}");
		}
	});
}
