//! Presentation state for interactive front ends.
//!
//! Nothing in this module is persisted or talks to the network. Each type holds the
//! state one screen needs and exposes the transitions the user can trigger:
//!
//! - [`Dashboard`]: the tabbed workspace and the three generated artifacts
//! - [`FlashcardViewer`]: one card at a time, flippable
//! - [`QuizSession`]: answering, submitting and scoring a quiz
//! - [`Explorer`]: the filtered folder tree

use super::*;

pub mod dashboard;
pub mod explorer;
pub mod flashcards;
pub mod quiz;

pub use self::{dashboard::*, explorer::*, flashcards::*, quiz::*};
