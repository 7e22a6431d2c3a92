//! Move instruction for reparenting documents and folders.

use super::*;

/// What a [`Move`] relocates.
#[derive(Debug, Clone)]
enum MoveTarget {
  /// A document, into a folder or the root
  Document(String),
  /// A folder, under another folder or to the top level
  Folder(String),
}

/// Instruction reparenting a document or folder.
///
/// A folder can never be moved into its own subtree: the ancestor chain of the new
/// parent is walked upward first and the move is rejected with
/// [`StudyError::CircularFolder`] if the folder is found on it.
///
/// # Examples
///
/// ```
/// # use studydeck::{document::*, prelude::*, store::*};
/// # fn main() -> Result<(), StudyError> {
/// let mut store = DocumentStore::open(MemoryStorage::new())?;
/// let a = Folder::new("A");
/// let b = Folder::new("B").with_parent(&a.id);
/// Add::folder(a.clone()).execute(&mut store)?;
/// Add::folder(b.clone()).execute(&mut store)?;
///
/// let err = Move::folder(&a.id, Some(&b.id)).execute(&mut store).unwrap_err();
/// assert!(matches!(err, StudyError::CircularFolder { .. }));
///
/// Move::folder(&b.id, None).execute(&mut store)?;
/// assert_eq!(store.folder(&b.id).unwrap().parent_id, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Move {
  /// The entry to move
  target:      MoveTarget,
  /// The new containing folder, `None` for the root
  destination: Option<String>,
}

impl Move {
  /// Moves a document into `destination`, or to the root for `None`.
  pub fn document(id: impl Into<String>, destination: Option<&str>) -> Self {
    Self { target: MoveTarget::Document(id.into()), destination: destination.map(str::to_string) }
  }

  /// Moves a folder under `destination`, or to the top level for `None`.
  pub fn folder(id: impl Into<String>, destination: Option<&str>) -> Self {
    Self { target: MoveTarget::Folder(id.into()), destination: destination.map(str::to_string) }
  }
}

impl StoreInstruction for Move {
  type Output = ();

  fn execute(&self, store: &mut DocumentStore) -> Result<Self::Output> {
    let destination = self.destination.as_deref();
    store.ensure_folder(destination)?;

    match &self.target {
      MoveTarget::Document(id) => {
        store.edit_document(id, |document| {
          document.folder_id = self.destination.clone();
          Ok(())
        })?;
        debug!("Moved document {id} to {}", destination.unwrap_or("the root"));
        Ok(())
      },
      MoveTarget::Folder(id) => {
        if store.folder(id).is_none() {
          return Err(StudyError::folder_not_found(id));
        }
        if let Some(parent) = destination {
          if store.tree().is_within(parent, id) {
            warn!("Refusing to move folder {id} into its own subtree at {parent}");
            return Err(StudyError::CircularFolder {
              folder: id.clone(),
              parent: parent.to_string(),
            });
          }
        }

        store.edit_folder(id, |folder| {
          folder.parent_id = self.destination.clone();
          Ok(())
        })?;
        debug!("Moved folder {id} to {}", destination.unwrap_or("the top level"));
        Ok(())
      },
    }
  }
}
