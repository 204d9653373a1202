//! Command-line interface for md2slack.
//!
//! Usage:
//!   md2slack [OPTIONS] [FILE]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use md2slack::io::{self, Error};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MD2SLACK_LOG";

const EXAMPLES: &str = "\
Examples:
  md2slack file.md
  echo \"**bold text**\" | md2slack
  md2slack < input.md > output.txt
  md2slack notes.md --output notes.txt";

#[derive(Debug, Parser)]
#[command(
    name = "md2slack",
    version,
    about = "Convert Markdown to Slack formatting",
    after_help = EXAMPLES
)]
struct Args {
    /// Markdown file to convert (reads piped stdin when omitted)
    file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log more detail to stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Error> {
    let input = io::read_input(args.file.as_deref())?;
    debug!(bytes = input.len(), "converting");
    let output = md2slack::convert(&input);

    io::write_output(&output, args.output.as_deref())?;
    if let Some(path) = &args.output {
        println!("Converted text written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            if matches!(err, Error::NoInput) {
                eprintln!("Try: md2slack --help");
            }
            ExitCode::FAILURE
        }
    }
}
