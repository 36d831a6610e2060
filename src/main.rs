//! Command-line entry point. A thin wrapper: read the named file, hand its
//! contents to `verba::run_source`, and translate the result into a process
//! exit code.

use std::{fs, process};

use clap::Parser;
use log::error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interpreter for a small English-prose-styled programming language")]
struct Cli {
    /// Path to the source file to run.
    file: std::path::PathBuf,

    /// Verbosity of diagnostic logging.
    #[arg(short, long, value_enum, default_value_t = LogLevel::Error)]
    verbosity: LogLevel,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

fn main() {
    let args = Cli::parse();

    simple_logger::init_with_level((&args.verbosity).into()).expect("failed to initialise logger");

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            error!("could not read '{}': {err}", args.file.display());
            process::exit(1);
        }
    };

    if let Err(err) = verba::run_source(&source) {
        error!("{err}");
        process::exit(1);
    }
}
