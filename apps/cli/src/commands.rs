//! CLI definition, argument handling, tracing setup, and console reporting.

use std::path::{Path, PathBuf};

use clap::Parser;
use clap::error::ErrorKind;
use color_eyre::eyre::Result;
use qnatsv_core::emit::WrittenFile;
use qnatsv_core::pipeline::{ConversionReporter, ConvertConfig, ConvertResult, convert};
use qnatsv_shared::load_config;
use tracing::info;

/// Exit status for a wrong invocation.
const USAGE_EXIT_CODE: i32 = 1;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// qnatsv: knowledge-base JSON export to TSV converter.
#[derive(Parser)]
#[command(
    name = "qnatsv",
    version,
    about = "Convert a knowledge-base JSON export into QnAs, Settings and Synonyms TSV files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the export file (must end in .json).
    #[arg(allow_hyphen_values = true)]
    pub input: PathBuf,

    /// TOML file overriding the Settings.tsv values.
    #[arg(long, env = "QNATSV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Parse the command line.
///
/// A wrong argument count prints the usage to stdout and exits with
/// status 1; `--help` and `--version` exit normally.
pub(crate) fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            print!("{}", e.render());
            std::process::exit(USAGE_EXIT_CODE);
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr; stdout carries only the console report.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = format!("qnatsv={level},qnatsv_core={level},qnatsv_shared={level}");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Run the conversion.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let converter = load_config(cli.config.as_deref())?;

    info!(input = %cli.input.display(), "starting conversion");

    let config = ConvertConfig {
        input: cli.input,
        converter,
    };
    convert(&config, &ConsoleProgress)?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Console reporter
// ---------------------------------------------------------------------------

/// Prints human-readable progress lines to stdout.
struct ConsoleProgress;

impl ConversionReporter for ConsoleProgress {
    fn folder_ready(&self, dir: &Path, created: bool) {
        if created {
            println!("Created folder: {}", dir.display());
        } else {
            println!("Folder already exists: {}", dir.display());
        }
    }

    fn file_written(&self, file: &WrittenFile) {
        println!("Created {} file: {}", file.kind, file.path.display());
    }

    fn done(&self, result: &ConvertResult) {
        println!(
            "Conversion completed successfully. Files are located in {}",
            result.output_dir.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_input() {
        let cli = Cli::try_parse_from(["qnatsv", "export.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("export.json"));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn rejects_missing_input() {
        let err = Cli::try_parse_from(["qnatsv"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_extra_positional() {
        assert!(Cli::try_parse_from(["qnatsv", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn hyphen_prefixed_input_is_a_path() {
        let cli = Cli::try_parse_from(["qnatsv", "-kb.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("-kb.json"));
        assert_eq!(cli.verbose, 0);

        let cli = Cli::try_parse_from(["qnatsv", "-v", "--", "--kb.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("--kb.json"));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn ambient_flags() {
        let cli =
            Cli::try_parse_from(["qnatsv", "-vv", "--log-format", "json", "kb.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
    }
}
