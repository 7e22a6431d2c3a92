//! Error types for the studydeck library.
//!
//! One error type covers every failure mode of the library:
//! - Input validation (media types, tags, unknown identifiers, folder cycles)
//! - PDF extraction
//! - Upstream model calls
//! - Model responses that do not match the expected shape
//! - Local storage and configuration
//!
//! # Examples
//!
//! ```
//! use studydeck::{
//!   error::StudyError,
//!   pdf::{PDFExtractor, Upload},
//! };
//!
//! let upload = Upload::new("notes.txt", "text/plain", b"hello".to_vec());
//! match PDFExtractor::new().extract(&upload) {
//!   Err(StudyError::UnsupportedMediaType(media_type)) => println!("Not a PDF: {media_type}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(text) => println!("{text}"),
//! }
//! ```

use thiserror::Error;

use crate::generate::GenerationKind;

/// Error type alias used for the [`studydeck`](crate) crate.
pub type Result<T> = core::result::Result<T, StudyError>;

/// Errors that can occur when working with the studydeck library.
#[derive(Error, Debug)]
pub enum StudyError {
  /// An upload was not declared as a PDF.
  ///
  /// The string parameter is the media type that was declared. Extraction is
  /// never attempted for such uploads.
  #[error("Unsupported media type \"{0}\", only application/pdf is accepted")]
  UnsupportedMediaType(String),

  /// The PDF could not be parsed or its text could not be recovered.
  ///
  /// This covers corrupt files, encrypted documents and content streams in an
  /// encoding the extractor does not understand.
  #[error(transparent)]
  Pdf(#[from] lopdf::Error),

  /// No document or folder exists with the given identifier.
  #[error("No {kind} found with id \"{id}\"")]
  NotFound {
    /// What was looked up, `"document"` or `"folder"`
    kind: &'static str,
    /// The identifier that was not found
    id:   String,
  },

  /// An entry with this identifier is already in the store.
  #[error("A {kind} with id \"{id}\" already exists")]
  DuplicateEntry {
    /// What was added, `"document"` or `"folder"`
    kind: &'static str,
    /// The duplicated identifier
    id:   String,
  },

  /// Moving the folder would make it its own ancestor.
  #[error("Moving folder \"{folder}\" under \"{parent}\" would create a cycle")]
  CircularFolder {
    /// The folder being moved
    folder: String,
    /// The requested new parent
    parent: String,
  },

  /// A tag was empty after trimming.
  #[error("Tags must not be empty")]
  InvalidTag,

  /// A network request to the model service failed.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The model service answered with an error or an unusable response.
  ///
  /// The string parameter contains the status and body returned by the service.
  #[error("API error: {0}")]
  ApiError(String),

  /// The model's answer did not match the schema expected for the generation.
  #[error("Invalid {kind} response from model: {reason}")]
  InvalidResponse {
    /// Which generation produced the response
    kind:   GenerationKind,
    /// Why validation failed
    reason: String,
  },

  /// A model was not specified for the completion request.
  #[error("No model was chosen for the LLM.")]
  LLMMissingModel,

  /// No messages were provided in the completion request.
  #[error("No messages were supplied to send to the LLM.")]
  LLMMissingMessage,

  /// A SQLite operation on local storage failed.
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// A stored collection could not be serialized or deserialized.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be written.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// The configuration is incomplete or inconsistent.
  #[error("{0}")]
  Config(String),
}

impl StudyError {
  /// Shorthand for a missing document.
  pub(crate) fn document_not_found(id: impl Into<String>) -> Self {
    Self::NotFound { kind: "document", id: id.into() }
  }

  /// Shorthand for a missing folder.
  pub(crate) fn folder_not_found(id: impl Into<String>) -> Self {
    Self::NotFound { kind: "folder", id: id.into() }
  }
}
