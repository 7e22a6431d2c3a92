//! Store instructions: one type per operation, executed against a [`DocumentStore`].
//!
//! Each instruction validates everything it needs, then works on a copy of the affected
//! collection that replaces the stored one only after it was written. An instruction
//! that returns an error has made no change.

use super::*;

pub mod add;
pub mod query;
pub mod relocate;
pub mod remove;
pub mod tag;
pub mod update;

pub use self::{add::*, query::*, relocate::*, remove::*, tag::*, update::*};

/// An operation on the document store.
pub trait StoreInstruction {
  /// What the instruction yields when it succeeds
  type Output;

  /// Runs the instruction, persisting whatever collection it changed.
  ///
  /// The store is borrowed, so several instructions can run against it in turn.
  fn execute(&self, store: &mut DocumentStore) -> Result<Self::Output>;
}
