mod commands;
mod error;
mod sources;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use crate::error::CliError;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Jack syntax analyzer.
#[derive(Parser)]
#[command(name = "jackc", version, about = "Jack syntax analyzer")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a .jack file or a directory of them, writing Xxx.xml per class
    Analyze {
        /// Path to a .jack file or a directory containing .jack files
        path: PathBuf,
        /// Directory for the generated files (default: next to each source)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Also write the token stream as XxxT.xml
        #[arg(long)]
        tokens: bool,
        /// Stop after this many diagnostics per file (0 = unlimited)
        #[arg(long, default_value_t = jack_core::DEFAULT_MAX_ERRORS)]
        max_errors: usize,
    },

    /// Print the token stream of a .jack file
    Tokens {
        /// Path to the .jack source file
        file: PathBuf,
    },

    /// Print the parse tree of a .jack file
    Parse {
        /// Path to the .jack source file
        file: PathBuf,
    },

    /// Report diagnostics without writing any files
    Check {
        /// Path to a .jack file or a directory containing .jack files
        path: PathBuf,
    },
}

/// What a command found, once it ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Clean,
    Diagnostics,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            path,
            out_dir,
            tokens,
            max_errors,
        } => commands::cmd_analyze(
            &path,
            &commands::AnalyzeOptions {
                out_dir: out_dir.as_deref(),
                tokens,
                max_errors,
            },
            cli.output,
            cli.quiet,
        ),
        Commands::Tokens { file } => commands::cmd_tokens(&file, cli.output),
        Commands::Parse { file } => commands::cmd_parse(&file, cli.output, cli.quiet),
        Commands::Check { path } => commands::cmd_check(&path, cli.output, cli.quiet),
    };

    match result {
        Ok(Status::Clean) => {}
        Ok(Status::Diagnostics) => process::exit(1),
        Err(e) => {
            report_error(&e, cli.output, cli.quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(err: &CliError, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", err),
        OutputFormat::Json => {
            let json = serde_json::json!({ "error": err.to_string() });
            eprintln!("{}", json);
        }
    }
}
