//! Command line interface for the studydeck study aid.
//!
//! This crate provides the `studydeck` binary on top of the `studydeck` library. It
//! supports operations like:
//! - Database initialization and cleanup
//! - Uploading PDFs and organizing them into folders with tags
//! - Generating flashcards, quizzes and summaries from stored documents
//! - Studying flashcards and taking quizzes in the terminal
//! - Serving the generation API over HTTP
//!
//! # Usage
//!
//! ```bash
//! # Initialize a new database
//! studydeck init
//!
//! # Upload a PDF into a folder
//! studydeck folder add Biology
//! studydeck upload cells.pdf --folder Biology --tag exam
//!
//! # Show everything
//! studydeck list
//!
//! # Generate and study
//! studydeck generate cells.pdf summary
//! studydeck study cells.pdf quiz
//!
//! # Run the HTTP API
//! studydeck serve --bind 127.0.0.1:3000
//! ```
//!
//! The CLI provides colored output and interactive confirmations for destructive
//! operations. It also supports various verbosity levels for debugging through
//! the `-v` flag.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Parser};
use console::style;
use studydeck::{config::Config, prelude::*};
use tracing::{debug, trace};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
static WARNING_PREFIX: &str = "⚠️ ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";
/// Prefix for user prompts
static PROMPT_PREFIX: &str = "❯ ";
/// Continuation line for tree structure
static CONTINUE_PREFIX: &str = "│  ";
/// Vertical line for tree structure
static TREE_VERT: &str = "│";
/// Branch character for tree structure
static TREE_BRANCH: &str = "├";
/// Leaf character for tree structure (end of branch)
static TREE_LEAF: &str = "└";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Turn PDFs into flashcards, summaries and quizzes")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the database file. Overrides the `database_path` of the configuration,
  /// which defaults to the platform-specific data directory.
  #[arg(long, short, global = true)]
  path: Option<PathBuf>,

  /// Path to the configuration file, `~/.studydeck/config.toml` by default
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used (0-4)
/// * `log_dir` - Directory for a daily rolling log file, if any
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// `RUST_LOG` takes precedence when set. The returned guard flushes the log file and
/// must be kept alive for as long as logging is needed.
fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let terminal = fmt::layer()
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true);

  let (file, guard) = match log_dir {
    Some(dir) => {
      let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "studydeck.log"));
      (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
    },
    None => (None, None),
  };

  tracing_subscriber::registry().with(filter).with(terminal).with(file).init();
  guard
}

/// Loads the configuration and applies the `--path` override.
fn load_config(cli: &Cli) -> Result<(Config, PathBuf)> {
  let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
  let mut config = Config::load(&config_path)?;
  if let Some(path) = &cli.path {
    config = config.with_database_path(path);
  }
  trace!("Using database at {}", config.database_path.display());
  Ok((config, config_path))
}

/// Runs the parsed command.
async fn run(cli: Cli) -> Result<()> {
  let (config, config_path) = load_config(&cli)?;
  let interaction = Terminal::new(cli.accept_defaults);

  match cli.command {
    Commands::Init(options) => init(&interaction, config, &config_path, options).await,
    Commands::Upload(options) => upload(&interaction, &config, options).await,
    Commands::List(options) => list(&interaction, &config, options).await,
    Commands::Show { document } => show(&interaction, &config, &document).await,
    Commands::Folder { cmd } => folder(&interaction, &config, cmd).await,
    Commands::Doc { cmd } => doc(&interaction, &config, cmd).await,
    Commands::Tag { cmd } => tag(&interaction, &config, cmd).await,
    Commands::Generate(options) => generate(&interaction, &config, options).await,
    Commands::Study(options) => study(&interaction, &config, options).await,
    Commands::Serve(options) => serve(&interaction, config, options).await,
    Commands::Clean => clean(&interaction, &config).await,
  }
}

/// Entry point for the studydeck CLI application
///
/// Handles command line argument parsing, sets up logging, and executes the requested
/// command. Errors are printed as a single line and end the process with a non-zero
/// exit code.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();

  let log_dir = match &cli.command {
    Commands::Serve(options) => options.log_dir.clone(),
    _ => None,
  };
  let guard = setup_logging(cli.verbose, log_dir.as_deref());

  let result = run(cli).await;
  drop(guard);

  if let Err(e) = result {
    debug!("Command failed: {e:?}");
    eprintln!("{} {e}", style(ERROR_PREFIX).red());
    std::process::exit(1);
  }
}
