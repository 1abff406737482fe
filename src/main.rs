//! xfdf-merge command-line interface
//!
//! Merges the annotations of an XFDF file into a PDF:
//! `xfdf-merge input.pdf input.xfdf output.pdf [PGNUMSHIFT/XSHIFT/YSHIFT/SCALE]`

use std::path::{Path, PathBuf};
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, ValueEnum};
use tokio::fs as async_fs;
use tracing::{error, info, warn};

use xfdf_merge::{init_logging, MergeConfig, MergePipeline, TransformSpec};

const USAGE: &str = "Usage: xfdf-merge input.pdf input.xfdf output.pdf [PGNUMSHIFT/XSHIFT/YSHIFT/SCALE]";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages (default)
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and all messages
    Debug,
    /// Trace and all messages (most verbose)
    Trace,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[tokio::main]
async fn main() {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) if err.use_stderr() => {
            eprintln!("{}", USAGE);
            return;
        }
        Err(err) => {
            // --help and --version
            let _ = err.print();
            return;
        }
    };

    let log_level = matches.get_one::<LogLevel>("verbose").copied().unwrap_or(LogLevel::Warn);
    if let Err(e) = init_logging(log_level.as_filter()) {
        eprintln!("{}", e);
    }

    let Some(config) = load_config(&matches).await else {
        return;
    };

    if let Err(e) = run(&matches, config).await {
        error!("Merge failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Resolves the merge configuration from `--config` and the transform quad.
/// `None` means usage has already been printed.
async fn load_config(matches: &ArgMatches) -> Option<MergeConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => match read_config(path).await {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => MergeConfig::default(),
    };

    if let Some(raw) = matches.get_one::<String>("transform") {
        match TransformSpec::parse(raw).and_then(|spec| config.apply(spec)) {
            Ok(()) => {}
            Err(e) => {
                warn!("{}", e);
                eprintln!("{}", USAGE);
                return None;
            }
        }
    }
    Some(config)
}

async fn read_config(path: &Path) -> xfdf_merge::Result<MergeConfig> {
    let raw = async_fs::read_to_string(path).await?;
    MergeConfig::from_json_str(&raw)
}

async fn run(matches: &ArgMatches, config: MergeConfig) -> xfdf_merge::Result<()> {
    let input = required_path(matches, "input");
    let xfdf = required_path(matches, "xfdf");
    let output = required_path(matches, "output");

    info!(input = %input.display(), xfdf = %xfdf.display(), output = %output.display(), "Starting merge");
    let pipeline = MergePipeline::new(config);
    let outcome = pipeline.execute(&input, &xfdf, &output).await?;

    let stats = &outcome.summary.statistics;
    info!(
        records = stats.records_created,
        popups = stats.popups_created,
        unresolved = stats.replies_unresolved,
        "Wrote {}",
        output.display()
    );

    if let Some(report_path) = matches.get_one::<PathBuf>("report") {
        outcome.report().write(report_path).await?;
        info!(path = %report_path.display(), "Report written");
    }
    Ok(())
}

fn required_path(matches: &ArgMatches, name: &str) -> PathBuf {
    matches.get_one::<PathBuf>(name).cloned().unwrap_or_default()
}

fn build_cli() -> Command {
    Command::new("xfdf-merge")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merges XFDF annotations into a PDF document")
        .override_usage("xfdf-merge input.pdf input.xfdf output.pdf [PGNUMSHIFT/XSHIFT/YSHIFT/SCALE]")

        // Inputs and output
        .arg(Arg::new("input")
            .value_name("INPUT_PDF")
            .value_parser(value_parser!(PathBuf))
            .required(true)
            .help("PDF to merge into"))

        .arg(Arg::new("xfdf")
            .value_name("INPUT_XFDF")
            .value_parser(value_parser!(PathBuf))
            .required(true)
            .help("XFDF file holding the annotations"))

        .arg(Arg::new("output")
            .value_name("OUTPUT_PDF")
            .value_parser(value_parser!(PathBuf))
            .required(true)
            .help("Where to write the merged PDF"))

        .arg(Arg::new("transform")
            .value_name("PGNUMSHIFT/XSHIFT/YSHIFT/SCALE")
            .allow_hyphen_values(true)
            .help("Page shift, x shift, y shift and scale applied to every annotation"))

        // Configuration and reporting
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("JSON merge configuration; the transform argument overrides its geometry"))

        .arg(Arg::new("report")
            .short('r')
            .long("report")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("Write a merge report (JSON when the file ends in .json, text otherwise)"))

        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .value_name("LEVEL")
            .value_parser(value_parser!(LogLevel))
            .action(ArgAction::Set)
            .help("Log level"))
}
