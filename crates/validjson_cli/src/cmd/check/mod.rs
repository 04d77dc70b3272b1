use std::path::PathBuf;
use std::sync::Arc;

use validjson::analysis::{Capabilities, CheckOptions, Diagnostic, DirImporter, Result, StdImporter, check_unit, parse_file};

use crate::cmd::util::{emit_json, path_label};

#[derive(clap::Args)]
pub struct Args {
	#[arg(required = true)]
	pub files: Vec<PathBuf>,
	#[arg(long)]
	pub json: bool,
	/// Struct tag key holding the directive.
	#[arg(long, default_value = "json")]
	pub tag_key: String,
	/// Directory holding `encoding.go` instead of the built-in copy.
	#[arg(long)]
	pub stdlib_dir: Option<PathBuf>,
}

/// Check every file and print its diagnostics; returns whether any were found.
///
/// Capabilities are resolved before any file is read, so a missing
/// `encoding` package fails the run without output.
pub fn run(args: Args) -> Result<bool> {
	let Args {
		files,
		json,
		tag_key,
		stdlib_dir,
	} = args;

	let caps = match &stdlib_dir {
		Some(dir) => Capabilities::resolve(&DirImporter::new(dir))?,
		None => Capabilities::resolve(&StdImporter)?,
	};
	let options = CheckOptions {
		tag_key: Arc::<str>::from(tag_key),
	};

	let mut reports = Vec::with_capacity(files.len());
	for path in files {
		let unit = parse_file(&path)?;
		let diagnostics = check_unit(&unit, &caps, &options);
		reports.push(FileReport {
			path,
			issues: unit.issues.len(),
			diagnostics,
		});
	}

	let total: usize = reports.iter().map(|report| report.diagnostics.len()).sum();
	tracing::info!(files = reports.len(), diagnostics = total, "check finished");

	if json {
		emit_json(&CheckJson {
			tag_key: options.tag_key.to_string(),
			total,
			files: reports.iter().map(file_json).collect(),
		})?;
	} else {
		for report in &reports {
			for line in render_lines(report) {
				println!("{line}");
			}
		}
	}

	Ok(total > 0)
}

struct FileReport {
	path: PathBuf,
	issues: usize,
	diagnostics: Vec<Diagnostic>,
}

fn render_lines(report: &FileReport) -> Vec<String> {
	let label = path_label(&report.path);
	report.diagnostics.iter().map(|diag| format!("{label}:{diag}")).collect()
}

fn file_json(report: &FileReport) -> FileJson {
	FileJson {
		path: path_label(&report.path),
		issues: report.issues,
		diagnostics: report
			.diagnostics
			.iter()
			.map(|diag| DiagnosticJson {
				line: diag.pos.line,
				column: diag.pos.column,
				field: diag.field.to_string(),
				type_name: diag.type_name.to_string(),
				message: diag.message.clone(),
			})
			.collect(),
	}
}

#[derive(serde::Serialize)]
struct CheckJson {
	tag_key: String,
	total: usize,
	files: Vec<FileJson>,
}

#[derive(serde::Serialize)]
struct FileJson {
	path: String,
	/// Front-end problems that left some declarations unchecked.
	issues: usize,
	diagnostics: Vec<DiagnosticJson>,
}

#[derive(serde::Serialize)]
struct DiagnosticJson {
	line: u32,
	column: u32,
	field: String,
	#[serde(rename = "type")]
	type_name: String,
	message: String,
}
