//! One-card-at-a-time flashcard viewer.

use super::*;
use crate::generate::Flashcard;

/// Which side of a card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
  /// The question side
  Front,
  /// The answer side
  Back,
}

/// Steps through a deck of cards. Moving to another card always shows its front.
///
/// ```
/// use studydeck::{generate::Flashcard, view::{Face, FlashcardViewer}};
///
/// let card = |front: &str| Flashcard { front: front.to_string(), back: "b".to_string() };
/// let mut viewer = FlashcardViewer::new(vec![card("one"), card("two")]);
///
/// viewer.flip();
/// assert_eq!(viewer.face(), Face::Back);
/// assert!(viewer.next());
/// assert_eq!(viewer.face(), Face::Front);
/// assert_eq!(viewer.visible_text(), Some("two"));
/// assert!(!viewer.next());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlashcardViewer {
  /// The deck
  cards:   Vec<Flashcard>,
  /// Position of the current card
  index:   usize,
  /// Whether the back is showing
  flipped: bool,
}

impl FlashcardViewer {
  /// A viewer on the first card of `cards`, front up.
  pub fn new(cards: Vec<Flashcard>) -> Self { Self { cards, index: 0, flipped: false } }

  /// Whether there are no cards.
  pub fn is_empty(&self) -> bool { self.cards.is_empty() }

  /// Number of cards.
  pub fn len(&self) -> usize { self.cards.len() }

  /// Zero-based position of the current card.
  pub fn index(&self) -> usize { self.index }

  /// The current card.
  pub fn current(&self) -> Option<&Flashcard> { self.cards.get(self.index) }

  /// The side that is showing.
  pub fn face(&self) -> Face {
    if self.flipped {
      Face::Back
    } else {
      Face::Front
    }
  }

  /// Text of the side that is showing.
  pub fn visible_text(&self) -> Option<&str> {
    self.current().map(|card| match self.face() {
      Face::Front => card.front.as_str(),
      Face::Back => card.back.as_str(),
    })
  }

  /// Turns the current card over.
  pub fn flip(&mut self) { self.flipped = !self.flipped; }

  /// Advances to the next card. Returns false at the last card.
  pub fn next(&mut self) -> bool {
    if self.index + 1 >= self.cards.len() {
      return false;
    }
    self.index += 1;
    self.flipped = false;
    true
  }

  /// Goes back one card. Returns false at the first card.
  pub fn previous(&mut self) -> bool {
    if self.index == 0 {
      return false;
    }
    self.index -= 1;
    self.flipped = false;
    true
  }

  /// `"Card 2 of 5"`, or an empty string for an empty deck.
  pub fn progress(&self) -> String {
    if self.is_empty() {
      return String::new();
    }
    format!("Card {} of {}", self.index + 1, self.len())
  }
}
