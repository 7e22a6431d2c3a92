//! Tag instruction for adding and removing document tags.

use super::*;

/// Whether a [`Tag`] adds or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagAction {
  /// Add the tag unless present
  Add,
  /// Remove the tag if present
  Remove,
}

/// Instruction adding a tag to, or removing a tag from, a document.
///
/// Both directions are idempotent: adding a tag the document already has, or removing
/// one it does not have, leaves the tags unchanged. The output tells whether anything
/// changed.
#[derive(Debug, Clone)]
pub struct Tag {
  /// Document to tag
  document_id: String,
  /// The tag itself
  tag:         String,
  /// Add or remove
  action:      TagAction,
}

impl Tag {
  /// Adds `tag` to the document.
  pub fn add(document_id: impl Into<String>, tag: impl Into<String>) -> Self {
    Self { document_id: document_id.into(), tag: tag.into(), action: TagAction::Add }
  }

  /// Removes `tag` from the document.
  pub fn remove(document_id: impl Into<String>, tag: impl Into<String>) -> Self {
    Self { document_id: document_id.into(), tag: tag.into(), action: TagAction::Remove }
  }
}

impl StoreInstruction for Tag {
  type Output = bool;

  fn execute(&self, store: &mut DocumentStore) -> Result<Self::Output> {
    let changed = store.edit_document(&self.document_id, |document| match self.action {
      TagAction::Add => document.add_tag(&self.tag),
      TagAction::Remove => Ok(document.remove_tag(&self.tag)),
    })?;
    trace!("{:?} tag \"{}\" on {}: changed = {changed}", self.action, self.tag, self.document_id);
    Ok(changed)
  }
}
