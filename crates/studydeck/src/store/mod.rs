//! The document store: documents and folders held in memory and mirrored to local storage.
//!
//! The store keeps two collections, documents and folders, and writes the full
//! collection back to its [`Storage`] after every mutation. Nothing is diffed and
//! nothing is versioned: each key holds a JSON snapshot of one collection.
//!
//! All operations are expressed as instructions implementing [`StoreInstruction`]:
//!
//! - [`Add`]: add a document or folder
//! - [`Update`]: change a document's fields or rename a folder
//! - [`Remove`]: delete a document, or a folder together with its subtree
//! - [`Move`]: reparent a document or folder
//! - [`Tag`]: add or remove a document tag
//! - [`Query`]: read documents back
//!
//! Consumers that need to react to changes register an observer with
//! [`DocumentStore::subscribe`].
//!
//! # Examples
//!
//! ```
//! use studydeck::{
//!   document::{Document, Folder},
//!   prelude::*,
//!   store::{Add, DocumentStore, MemoryStorage, Move, Remove},
//! };
//!
//! # fn main() -> Result<(), StudyError> {
//! let mut store = DocumentStore::open(MemoryStorage::new())?;
//!
//! let course = Folder::new("Biology");
//! let week = Folder::new("Week 1").with_parent(&course.id);
//! Add::folder(course.clone()).execute(&mut store)?;
//! Add::folder(week.clone()).execute(&mut store)?;
//!
//! let notes = Document::pdf("cells.pdf").with_folder(&week.id);
//! Add::document(notes.clone()).execute(&mut store)?;
//!
//! // A folder can never be moved below itself
//! assert!(Move::folder(&course.id, Some(&week.id)).execute(&mut store).is_err());
//!
//! // Deleting a folder keeps its documents, at the root
//! Remove::folder(&course.id).execute(&mut store)?;
//! assert!(store.folders().is_empty());
//! assert_eq!(store.document(&notes.id).unwrap().folder_id, None);
//! # Ok(())
//! # }
//! ```

use super::*;

pub mod instruction;
pub mod storage;
pub mod tree;

pub use self::{instruction::*, storage::*, tree::*};

/// Storage key of the document collection.
pub const DOCUMENTS_KEY: &str = "documents";
/// Storage key of the folder collection.
pub const FOLDERS_KEY: &str = "folders";

/// One of the two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
  /// All documents
  Documents,
  /// All folders
  Folders,
}

impl Collection {
  /// The storage key the collection is written under.
  pub fn key(&self) -> &'static str {
    match self {
      Collection::Documents => DOCUMENTS_KEY,
      Collection::Folders => FOLDERS_KEY,
    }
  }
}

/// Notification sent to observers after a collection was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
  /// The document collection changed
  DocumentsChanged,
  /// The folder collection changed
  FoldersChanged,
}

impl From<Collection> for StoreEvent {
  fn from(collection: Collection) -> Self {
    match collection {
      Collection::Documents => StoreEvent::DocumentsChanged,
      Collection::Folders => StoreEvent::FoldersChanged,
    }
  }
}

/// Callback registered with [`DocumentStore::subscribe`].
pub type Observer = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// Documents and folders, mirrored to a [`Storage`] backend.
pub struct DocumentStore {
  /// Every document, in insertion order
  documents: Vec<Document>,
  /// Every folder, in insertion order
  folders:   Vec<Folder>,
  /// Where snapshots are written
  storage:   Box<dyn Storage>,
  /// Change listeners
  observers: Vec<Observer>,
}

impl DocumentStore {
  /// Opens a store, reading both collections back from `storage`.
  ///
  /// Missing entries are treated as empty collections.
  ///
  /// # Errors
  ///
  /// Fails if the storage cannot be read or a stored snapshot is not valid JSON for its
  /// collection.
  pub fn open(storage: impl Storage + 'static) -> Result<Self> {
    let documents: Vec<Document> = load_collection(&storage, Collection::Documents)?;
    let folders: Vec<Folder> = load_collection(&storage, Collection::Folders)?;
    debug!("Opened store with {} documents and {} folders", documents.len(), folders.len());
    Ok(Self { documents, folders, storage: Box::new(storage), observers: Vec::new() })
  }

  /// All documents in insertion order.
  pub fn documents(&self) -> &[Document] { &self.documents }

  /// All folders in insertion order.
  pub fn folders(&self) -> &[Folder] { &self.folders }

  /// Looks up a document by identifier.
  pub fn document(&self, id: &str) -> Option<&Document> {
    self.documents.iter().find(|document| document.id == id)
  }

  /// Looks up a folder by identifier.
  pub fn folder(&self, id: &str) -> Option<&Folder> {
    self.folders.iter().find(|folder| folder.id == id)
  }

  /// Every tag used by any document, sorted and without duplicates.
  pub fn all_tags(&self) -> Vec<String> {
    self
      .documents
      .iter()
      .flat_map(|document| document.tags.iter().cloned())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }

  /// A read-only view of the folder hierarchy.
  pub fn tree(&self) -> FolderTree<'_> { FolderTree::new(&self.folders, &self.documents) }

  /// Registers a callback invoked after every successful write.
  pub fn subscribe(&mut self, observer: impl Fn(&StoreEvent) + Send + Sync + 'static) {
    self.observers.push(Box::new(observer));
  }

  /// Fails unless `folder_id` is `None` or names an existing folder.
  pub(crate) fn ensure_folder(&self, folder_id: Option<&str>) -> Result<()> {
    match folder_id {
      Some(id) if self.folder(id).is_none() => Err(StudyError::folder_not_found(id)),
      _ => Ok(()),
    }
  }

  /// Runs `edit` on a copy of one document and keeps the result only once it is persisted.
  pub(crate) fn edit_document<T>(
    &mut self,
    id: &str,
    edit: impl FnOnce(&mut Document) -> Result<T>,
  ) -> Result<T> {
    let mut documents = self.documents.clone();
    let document = documents
      .iter_mut()
      .find(|document| document.id == id)
      .ok_or_else(|| StudyError::document_not_found(id))?;
    let output = edit(document)?;
    self.replace_documents(documents)?;
    Ok(output)
  }

  /// Runs `edit` on a copy of one folder and keeps the result only once it is persisted.
  pub(crate) fn edit_folder<T>(
    &mut self,
    id: &str,
    edit: impl FnOnce(&mut Folder) -> Result<T>,
  ) -> Result<T> {
    let mut folders = self.folders.clone();
    let folder = folders
      .iter_mut()
      .find(|folder| folder.id == id)
      .ok_or_else(|| StudyError::folder_not_found(id))?;
    let output = edit(folder)?;
    self.replace_folders(folders)?;
    Ok(output)
  }

  /// Writes `documents` to storage, then makes them the document collection.
  ///
  /// On error the collection held in memory is left as it was.
  pub(crate) fn replace_documents(&mut self, documents: Vec<Document>) -> Result<()> {
    self.persist(Collection::Documents, &serde_json::to_string(&documents)?)?;
    self.documents = documents;
    self.notify(Collection::Documents);
    Ok(())
  }

  /// Writes `folders` to storage, then makes them the folder collection.
  ///
  /// On error the collection held in memory is left as it was.
  pub(crate) fn replace_folders(&mut self, folders: Vec<Folder>) -> Result<()> {
    self.persist(Collection::Folders, &serde_json::to_string(&folders)?)?;
    self.folders = folders;
    self.notify(Collection::Folders);
    Ok(())
  }

  /// Writes one collection snapshot.
  fn persist(&mut self, collection: Collection, snapshot: &str) -> Result<()> {
    self.storage.save(collection.key(), snapshot)?;
    trace!("Wrote {} bytes to \"{}\"", snapshot.len(), collection.key());
    Ok(())
  }

  /// Tells every observer that `collection` changed.
  fn notify(&self, collection: Collection) {
    let event = StoreEvent::from(collection);
    for observer in &self.observers {
      observer(&event);
    }
  }
}

/// Reads one collection, treating a missing entry as empty.
fn load_collection<T: serde::de::DeserializeOwned>(
  storage: &impl Storage,
  collection: Collection,
) -> Result<Vec<T>> {
  match storage.load(collection.key())? {
    Some(snapshot) => Ok(serde_json::from_str(&snapshot)?),
    None => {
      trace!("No \"{}\" entry in storage, starting empty", collection.key());
      Ok(Vec::new())
    },
  }
}
