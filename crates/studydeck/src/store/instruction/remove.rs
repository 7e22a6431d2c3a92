//! Remove instruction for documents and folder subtrees.
//!
//! Removing a document deletes it. Removing a folder deletes the folder and every
//! folder below it, but never a document: documents anywhere in the removed subtree
//! are moved to the root.
//!
//! # Examples
//!
//! ```
//! use studydeck::{document::*, prelude::*, store::*};
//!
//! # fn main() -> Result<(), StudyError> {
//! let mut store = DocumentStore::open(MemoryStorage::new())?;
//! let course = Folder::new("Course");
//! let week = Folder::new("Week 1").with_parent(&course.id);
//! Add::folder(course.clone()).execute(&mut store)?;
//! Add::folder(week.clone()).execute(&mut store)?;
//! Add::document(Document::pdf("a.pdf").with_folder(&week.id)).execute(&mut store)?;
//!
//! // Preview the removal
//! let preview = Remove::folder(&course.id).dry_run().execute(&mut store)?;
//! assert_eq!(preview.folders.len(), 2);
//! assert_eq!(store.folders().len(), 2);
//!
//! let removal = Remove::folder(&course.id).execute(&mut store)?;
//! assert_eq!(removal.reparented.len(), 1);
//! assert!(store.documents()[0].folder_id.is_none());
//! # Ok(())
//! # }
//! ```

use super::*;

/// Configuration options for removal operations.
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
  /// When true, computes what would be removed without modifying the store.
  pub dry_run: bool,
}

/// What a [`Remove`] deletes.
#[derive(Debug, Clone)]
enum RemoveTarget {
  /// A single document
  Document(String),
  /// A folder and its subtree
  Folder(String),
}

/// The outcome of a [`Remove`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
  /// Documents that were deleted
  pub documents:  Vec<Document>,
  /// Folders that were deleted, the requested folder among them
  pub folders:    Vec<Folder>,
  /// Identifiers of documents moved to the root because their folder was deleted
  pub reparented: Vec<String>,
}

impl Removal {
  /// Whether nothing was (or would be) removed.
  pub fn is_empty(&self) -> bool {
    self.documents.is_empty() && self.folders.is_empty() && self.reparented.is_empty()
  }
}

/// Instruction deleting a document or a folder subtree.
///
/// Unknown identifiers are not an error; the returned [`Removal`] is simply empty and
/// nothing is written.
#[derive(Debug, Clone)]
pub struct Remove {
  /// The entry to delete
  target:  RemoveTarget,
  /// Configuration options for the removal
  options: RemoveOptions,
}

impl Remove {
  /// Deletes the document with `id`.
  pub fn document(id: impl Into<String>) -> Self {
    Self { target: RemoveTarget::Document(id.into()), options: RemoveOptions::default() }
  }

  /// Deletes the folder with `id`, every folder below it, and moves their documents to the
  /// root.
  pub fn folder(id: impl Into<String>) -> Self {
    Self { target: RemoveTarget::Folder(id.into()), options: RemoveOptions::default() }
  }

  /// Enables dry run mode: the removal is computed and returned but not applied.
  pub fn dry_run(mut self) -> Self {
    self.options.dry_run = true;
    self
  }

  /// Deletes one document.
  fn remove_document(&self, store: &mut DocumentStore, id: &str) -> Result<Removal> {
    let Some(document) = store.document(id).cloned() else {
      debug!("No document \"{id}\" to remove");
      return Ok(Removal::default());
    };

    if !self.options.dry_run {
      let mut documents = store.documents().to_vec();
      documents.retain(|document| document.id != id);
      store.replace_documents(documents)?;
      debug!("Removed document \"{}\" ({id})", document.name);
    }
    Ok(Removal { documents: vec![document], ..Removal::default() })
  }

  /// Deletes a folder subtree, moving its documents to the root.
  fn remove_folder(&self, store: &mut DocumentStore, id: &str) -> Result<Removal> {
    if store.folder(id).is_none() {
      debug!("No folder \"{id}\" to remove");
      return Ok(Removal::default());
    }

    let closure = store.tree().descendants(id);
    let folders: Vec<Folder> =
      store.folders().iter().filter(|folder| closure.contains(&folder.id)).cloned().collect();
    let reparented: Vec<String> = store
      .documents()
      .iter()
      .filter(|document| document.folder_id.as_ref().is_some_and(|folder| closure.contains(folder)))
      .map(|document| document.id.clone())
      .collect();

    if !self.options.dry_run {
      let previous = store.documents().to_vec();
      let mut documents = previous.clone();
      for document in &mut documents {
        if document.folder_id.as_ref().is_some_and(|folder| closure.contains(folder)) {
          document.folder_id = None;
        }
      }
      let mut remaining = store.folders().to_vec();
      remaining.retain(|folder| !closure.contains(&folder.id));

      // Documents first: stored documents must never point at a deleted folder
      store.replace_documents(documents)?;
      if let Err(e) = store.replace_folders(remaining) {
        if let Err(rollback) = store.replace_documents(previous) {
          warn!("Could not restore documents after a failed folder removal: {rollback}");
        }
        return Err(e);
      }
      debug!(
        "Removed {} folders under \"{id}\" and moved {} documents to the root",
        folders.len(),
        reparented.len()
      );
    }
    Ok(Removal { documents: Vec::new(), folders, reparented })
  }
}

impl StoreInstruction for Remove {
  type Output = Removal;

  fn execute(&self, store: &mut DocumentStore) -> Result<Self::Output> {
    match &self.target {
      RemoveTarget::Document(id) => self.remove_document(store, id),
      RemoveTarget::Folder(id) => self.remove_folder(store, id),
    }
  }
}
