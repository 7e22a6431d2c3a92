//! Update instruction for document fields and folder names.

use super::*;

/// What an [`Update`] changes.
#[derive(Debug, Clone)]
enum UpdateTarget {
  /// Partial update of a document
  Document { id: String, update: DocumentUpdate },
  /// New name for a folder
  Folder { id: String, name: String },
}

/// Instruction changing an existing document or folder in place.
///
/// Moving is handled by [`Move`] and tags one at a time by [`Tag`]; an update can still
/// replace the whole tag list.
#[derive(Debug, Clone)]
pub struct Update {
  /// The entry to change and how
  target: UpdateTarget,
}

impl Update {
  /// Applies `update` to the document with `id`.
  pub fn document(id: impl Into<String>, update: DocumentUpdate) -> Self {
    Self { target: UpdateTarget::Document { id: id.into(), update } }
  }

  /// Renames the folder with `id`.
  pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self { target: UpdateTarget::Folder { id: id.into(), name: name.into() } }
  }
}

impl StoreInstruction for Update {
  type Output = ();

  fn execute(&self, store: &mut DocumentStore) -> Result<Self::Output> {
    match &self.target {
      UpdateTarget::Document { id, update } => {
        store.edit_document(id, |document| update.apply(document))
      },
      UpdateTarget::Folder { id, name } => store.edit_folder(id, |folder| {
        folder.name = name.clone();
        Ok(())
      }),
    }
  }
}
