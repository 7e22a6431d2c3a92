//! Study aids generated from PDF documents.
//!
//! `studydeck` turns uploaded PDFs into three kinds of study material, providing:
//!
//! - A document store of documents and folders, persisted to local storage
//! - PDF text extraction
//! - Flashcard, quiz and summary generation through a hosted language model
//! - An HTTP API exposing the three generators
//! - View state for browsing documents, flipping cards and running quizzes
//!
//! # Getting Started
//!
//! ```no_run
//! use studydeck::{
//!   document::Document,
//!   pdf::{PDFExtractor, Upload},
//!   prelude::*,
//!   store::{Add, DocumentStore, Query, SqliteStorage},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Open the durable store
//! let storage = SqliteStorage::open(SqliteStorage::default_path())?;
//! let mut store = DocumentStore::open(storage)?;
//!
//! // Extract the text of a PDF and keep it
//! let upload = Upload::from_path("lecture.pdf")?;
//! let text = PDFExtractor::new().extract(&upload)?;
//! Add::document(Document::pdf(&upload.name).with_content(text)).execute(&mut store)?;
//!
//! for document in Query::all().execute(&mut store)? {
//!   println!("{}", document.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`document`]: Durable document and folder types
//! - [`store`]: The document store, its instructions and storage backends
//! - [`pdf`]: PDF upload validation and text extraction
//! - [`llm`]: Chat completion client for the hosted model
//! - [`generate`]: Prompt templates, schema validation and the generation gateway
//! - [`api`]: HTTP endpoints for the generators
//! - [`view`]: Presentation state for the dashboard, flashcards, quizzes and tree
//! - [`config`]: On-disk configuration
//! - [`prelude`]: Common traits and types for ergonomic imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt::Display,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod generate;
pub mod llm;
pub mod pdf;
pub mod store;
pub mod view;

use crate::{document::*, error::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use studydeck::{prelude::*, store::{DocumentStore, MemoryStorage, Query}};
///
/// fn example() -> Result<(), StudyError> {
///   let mut store = DocumentStore::open(MemoryStorage::new())?;
///   let documents = Query::all().execute(&mut store)?;
///   Ok(())
/// }
/// ```
///
/// # Contents
///
/// - [`StoreInstruction`]: Trait for executing store operations
/// - [`CompletionModel`]: Trait for anything that can complete a prompt
/// - [`StudyError`]: Core error type for the library
pub mod prelude {
  pub use crate::{error::StudyError, llm::CompletionModel, store::StoreInstruction};
}
