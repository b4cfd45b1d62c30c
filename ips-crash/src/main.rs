// Copyright 2015 Ted Mielczarek. See the COPYRIGHT
// file at the top-level directory of this distribution.

use std::boxed::Box;
use std::fs::{self, File};
use std::io::{self, Write};
use std::ops::Deref;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use ips_processor::TextOptions;
use log::error;
use simplelog::{
    ColorChoice, ConfigBuilder, Level, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};

/// Converts an Apple .ips crash report into a human-readable crash log (or JSON).
#[derive(Debug, Parser)]
#[command(version, next_line_help = true)]
struct Args {
    /// Emit the report sections as JSON instead of a human-readable log.
    #[arg(long)]
    json: bool,

    /// Pretty-print --json output.
    #[arg(long)]
    pretty: bool,

    /// Provide a briefer human-readable report.
    ///
    /// Only provides the process and exception summaries and the backtrace of
    /// the crashed thread.
    #[arg(long)]
    brief: bool,

    /// Print binary image UUIDs without hyphens.
    #[arg(long)]
    compact_uuids: bool,

    /// Where to write the output to (if unspecified, stdout is used).
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Where to write logs to (if unspecified, stderr is used).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Set the logging level.
    #[arg(long, value_enum, default_value_t = Verbosity::Error)]
    verbose: Verbosity,

    /// Path to the .ips file to convert.
    ips: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Verbosity {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<Verbosity> for LevelFilter {
    fn from(v: Verbosity) -> Self {
        match v {
            Verbosity::Off => LevelFilter::Off,
            Verbosity::Error => LevelFilter::Error,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

fn init_logging(verbosity: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut config = ConfigBuilder::new();
    config
        .set_location_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off);

    if let Some(log_path) = log_file {
        let log_file = File::create(log_path)
            .with_context(|| format!("couldn't create log file {}", log_path.display()))?;
        let _ = WriteLogger::init(verbosity, config.build(), log_file);
    } else {
        let _ = TermLogger::init(
            verbosity,
            config.set_level_color(Level::Trace, None).build(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
    }
    Ok(())
}

fn read_report(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("couldn't read {}", path.display()))
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                // Usage errors (including a missing input path) exit with 1, like
                // every other failure.
                let _ = err.print();
                exit(1);
            }
        },
    };

    if let Err(err) = init_logging(args.verbose.into(), args.log_file.as_deref()) {
        eprintln!("{err:#}");
        exit(1);
    }

    // Set a panic hook to redirect to the logger
    panic::set_hook(Box::new(|panic_info| {
        let (filename, line) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line()))
            .unwrap_or(("<unknown>", 0));
        let cause = panic_info
            .payload()
            .downcast_ref::<String>()
            .map(String::deref)
            .unwrap_or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<&str>()
                    .copied()
                    .unwrap_or("<cause unknown>")
            });
        error!("Panic - A panic occurred at {}:{}: {}", filename, line, cause);
    }));

    // clap can't express "only valid with (or without) --json" for plain flags.
    if args.pretty && !args.json {
        error!("The --pretty flag is only valid for --json output");
        exit(1);
    }
    if args.brief && args.json {
        error!("The --brief flag is only valid for human-readable output");
        exit(1);
    }

    let raw = match read_report(&args.ips) {
        Ok(raw) => raw,
        Err(err) => {
            error!("Io - Error reading report: {:#}", err);
            exit(1);
        }
    };

    let (metadata, report) = match ips::decode(&raw) {
        Ok(decoded) => decoded,
        Err(err) => {
            error!("{} - Error reading report: {}", err.name(), err);
            exit(1);
        }
    };

    let sections = ips_processor::build(&report, &metadata);

    let mut stdout;
    let mut output_f;
    let mut output: &mut dyn Write = if let Some(ref output_path) = args.output_file {
        output_f = match File::create(output_path) {
            Ok(f) => f,
            Err(err) => {
                error!(
                    "Io - Error creating {}: {}",
                    output_path.display(),
                    err
                );
                exit(1);
            }
        };
        &mut output_f
    } else {
        stdout = io::stdout().lock();
        &mut stdout
    };

    let result = if args.json {
        ips_processor::print_sections_json(&sections, &mut output, args.pretty)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(output))
    } else {
        let options = TextOptions {
            compact_uuids: args.compact_uuids,
            brief: args.brief,
        };
        ips_processor::print_sections(&sections, &mut output, &options)
    };

    if let Err(err) = result.and_then(|()| output.flush()) {
        error!("Io - Error writing report: {}", err);
        exit(1);
    }
}
