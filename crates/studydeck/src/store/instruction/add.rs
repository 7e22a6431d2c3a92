//! Add instruction for new documents and folders.

use super::*;

/// What an [`Add`] inserts.
#[derive(Debug, Clone)]
pub enum AddTarget {
  /// A new document
  Document(Document),
  /// A new folder
  Folder(Folder),
}

/// Instruction inserting a document or folder.
///
/// Identifiers must be unique within their collection, and any folder the new entry
/// points at must already exist.
///
/// # Examples
///
/// ```
/// # use studydeck::{document::*, prelude::*, store::*};
/// # fn main() -> Result<(), StudyError> {
/// let mut store = DocumentStore::open(MemoryStorage::new())?;
/// let id = Add::document(Document::pdf("notes.pdf")).execute(&mut store)?;
/// assert_eq!(store.document(&id).unwrap().name, "notes.pdf");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Add {
  /// The entry to insert
  target: AddTarget,
}

impl Add {
  /// Adds a document.
  pub fn document(document: Document) -> Self { Self { target: AddTarget::Document(document) } }

  /// Adds a folder.
  pub fn folder(folder: Folder) -> Self { Self { target: AddTarget::Folder(folder) } }
}

impl StoreInstruction for Add {
  /// Identifier of the inserted entry
  type Output = String;

  fn execute(&self, store: &mut DocumentStore) -> Result<Self::Output> {
    match &self.target {
      AddTarget::Document(document) => {
        if store.document(&document.id).is_some() {
          return Err(StudyError::DuplicateEntry { kind: "document", id: document.id.clone() });
        }
        store.ensure_folder(document.folder_id.as_deref())?;

        let mut documents = store.documents().to_vec();
        documents.push(document.clone());
        store.replace_documents(documents)?;
        debug!("Added document \"{}\" ({})", document.name, document.id);
        Ok(document.id.clone())
      },
      AddTarget::Folder(folder) => {
        if store.folder(&folder.id).is_some() {
          return Err(StudyError::DuplicateEntry { kind: "folder", id: folder.id.clone() });
        }
        store.ensure_folder(folder.parent_id.as_deref())?;

        let mut folders = store.folders().to_vec();
        folders.push(folder.clone());
        store.replace_folders(folders)?;
        debug!("Added folder \"{}\" ({})", folder.name, folder.id);
        Ok(folder.id.clone())
      },
    }
  }
}
