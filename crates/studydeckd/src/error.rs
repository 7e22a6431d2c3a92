//! Error types for the studydeck command line.

use std::path::PathBuf;

use studydeck::generate::GenerationKind;
use thiserror::Error;

use super::*;

/// Result alias for the command line.
pub type Result<T> = core::result::Result<T, StudydeckdError>;

/// Everything that can go wrong while running a command.
#[derive(Error, Debug)]
pub enum StudydeckdError {
  /// Failure inside the library
  #[error(transparent)]
  Study(#[from] StudyError),

  /// Reading a file or talking to the terminal failed
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A prompt could not be shown
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// The pattern for the database side files was invalid
  #[error(transparent)]
  Glob(#[from] glob::PatternError),

  /// The database file does not exist yet
  #[error("No database at {}. Run `studydeck init` first", .0.display())]
  NotInitialized(PathBuf),

  /// A name or id prefix matched more than one entry
  #[error("\"{key}\" matches {count} {kind}s, use the id instead")]
  Ambiguous {
    /// `"document"` or `"folder"`
    kind:  &'static str,
    /// What the user typed
    key:   String,
    /// How many entries matched
    count: usize,
  },

  /// The document holds no text to generate from
  #[error("Document \"{0}\" has no extracted text")]
  NoContent(String),

  /// Every requested generation failed
  #[error("Failed to generate {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
  Generation(Vec<GenerationKind>),
}
