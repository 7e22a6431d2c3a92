use clap::{Args, Subcommand, ValueEnum};
use studydeck::{
  document::{Document, Folder},
  store::{DocumentStore, SqliteStorage},
};

use super::*;

pub mod clean;
pub mod generate;
pub mod init;
pub mod list;
pub mod organize;
pub mod serve;
pub mod study;
pub mod upload;

pub use clean::clean;
pub use generate::{document_text, generate, GenerateOptions, GenerateTarget};
pub use init::{init, InitOptions};
pub use list::{list, show, ListOptions};
pub use organize::{doc, folder, tag, DocCommands, FolderCommands, TagCommands};
pub use serve::{serve, ServeOptions};
pub use study::{study, StudyMode, StudyOptions};
pub use upload::{upload, UploadOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write the configuration and create a new database
  Init(InitOptions),

  /// Extract the text of a PDF and store it as a document
  Upload(UploadOptions),

  /// Show the folder tree with its documents
  List(ListOptions),

  /// Show the details of one document
  Show {
    /// Document id, id prefix or name
    document: String,
  },

  /// Create, rename, move and remove folders
  Folder {
    /// The folder operation
    #[command(subcommand)]
    cmd: FolderCommands,
  },

  /// Rename, move and remove documents
  Doc {
    /// The document operation
    #[command(subcommand)]
    cmd: DocCommands,
  },

  /// Add and remove document tags
  Tag {
    /// The tag operation
    #[command(subcommand)]
    cmd: TagCommands,
  },

  /// Generate flashcards, a quiz or a summary from a document
  Generate(GenerateOptions),

  /// Study the flashcards or take the quiz of a document
  Study(StudyOptions),

  /// Serve the generation API over HTTP
  Serve(ServeOptions),

  /// Removes the entire database after confirmation
  Clean,
}

/// Opens the document store at the configured database path.
///
/// The database must already exist; only `init` creates one.
pub fn open_store(config: &Config) -> Result<DocumentStore> {
  let path = &config.database_path;
  if !path.exists() {
    return Err(StudydeckdError::NotInitialized(path.clone()));
  }
  Ok(DocumentStore::open(SqliteStorage::open(path)?)?)
}

/// Something that can be picked out by id, id prefix or name.
pub trait Entry {
  /// `"document"` or `"folder"`
  const KIND: &'static str;

  /// Unique identifier
  fn id(&self) -> &str;

  /// Display name
  fn name(&self) -> &str;
}

impl Entry for Document {
  const KIND: &'static str = "document";

  fn id(&self) -> &str { &self.id }

  fn name(&self) -> &str { &self.name }
}

impl Entry for Folder {
  const KIND: &'static str = "folder";

  fn id(&self) -> &str { &self.id }

  fn name(&self) -> &str { &self.name }
}

/// Finds the entry meant by `key`.
///
/// An exact id wins. Otherwise `key` must be a unique id prefix or a unique name,
/// compared without regard to case.
pub fn resolve<'a, T: Entry>(items: &'a [T], key: &str) -> Result<&'a T> {
  if let Some(item) = items.iter().find(|item| item.id() == key) {
    return Ok(item);
  }
  let matches: Vec<&T> = items
    .iter()
    .filter(|item| item.id().starts_with(key) || item.name().eq_ignore_ascii_case(key))
    .collect();
  match matches.as_slice() {
    [item] => Ok(*item),
    [] => Err(StudyError::NotFound { kind: T::KIND, id: key.to_string() }.into()),
    _ => Err(StudydeckdError::Ambiguous { kind: T::KIND, key: key.to_string(), count: matches.len() }),
  }
}

/// Resolves an optional folder argument to its id, `None` meaning the root.
pub fn resolve_folder(store: &DocumentStore, key: Option<&str>) -> Result<Option<String>> {
  key.map(|key| resolve(store.folders(), key).map(|folder| folder.id.clone())).transpose()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_resolve() {
    let notes = Document::pdf("Notes.pdf");
    let other = Document::pdf("other.pdf");
    let documents = vec![notes.clone(), other.clone()];

    assert_eq!(resolve(&documents, &notes.id).unwrap().id, notes.id);
    assert_eq!(resolve(&documents, "notes.PDF").unwrap().id, notes.id);
    assert_eq!(resolve(&documents, &other.id[..8]).unwrap().id, other.id);
    assert!(matches!(
      resolve(&documents, "missing.pdf"),
      Err(StudydeckdError::Study(StudyError::NotFound { kind: "document", .. }))
    ));
  }

  #[test]
  fn test_resolve_ambiguous_name() {
    let folders = vec![Folder::new("Week 1"), Folder::new("week 1")];
    assert!(matches!(
      resolve(&folders, "WEEK 1"),
      Err(StudydeckdError::Ambiguous { kind: "folder", count: 2, .. })
    ));
    assert_eq!(resolve(&folders, &folders[1].id).unwrap().name, "week 1");
  }
}
