//! The tabbed dashboard and its generated artifacts.
//!
//! When text arrives, [`Dashboard::begin`] puts all three artifacts into
//! [`Artifact::Loading`] and hands out a [`Ticket`] for the round. Results are applied
//! with that ticket. If another round started in the meantime the ticket is stale and
//! the result is dropped, so a slow answer for an old document can never overwrite the
//! current one.
//!
//! ```
//! use studydeck::view::{Artifact, Dashboard, Tab};
//!
//! let mut dashboard = Dashboard::new();
//! let first = dashboard.begin("Old document");
//! let second = dashboard.begin("New document");
//!
//! assert!(!dashboard.apply_summary(first, Ok("old".to_string())));
//! assert!(dashboard.apply_summary(second, Ok("new".to_string())));
//! assert_eq!(dashboard.summary().value().map(String::as_str), Some("new"));
//!
//! dashboard.select(Tab::Summary);
//! assert_eq!(dashboard.active_tab(), Tab::Summary);
//! ```

use super::*;
use crate::generate::{Flashcard, Generated, QuizQuestion};

/// A dashboard tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
  /// PDF upload
  #[default]
  Upload,
  /// Flashcard viewer
  Flashcards,
  /// Markdown summary
  Summary,
  /// Quiz session
  Quiz,
}

impl Tab {
  /// Every tab, in display order.
  pub const ALL: [Tab; 4] = [Tab::Upload, Tab::Flashcards, Tab::Summary, Tab::Quiz];
}

impl Display for Tab {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Tab::Upload => write!(f, "Upload"),
      Tab::Flashcards => write!(f, "Flashcards"),
      Tab::Summary => write!(f, "Summary"),
      Tab::Quiz => write!(f, "Quiz"),
    }
  }
}

/// The state of one generated output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Artifact<T> {
  /// Nothing requested yet
  #[default]
  Idle,
  /// A request is in flight
  Loading,
  /// The output arrived
  Ready(T),
  /// Generation failed; the message is for display only
  Failed(String),
}

impl<T> Artifact<T> {
  /// Whether a request is in flight.
  pub fn is_loading(&self) -> bool { matches!(self, Artifact::Loading) }

  /// The output, if it arrived.
  pub fn value(&self) -> Option<&T> {
    match self {
      Artifact::Ready(value) => Some(value),
      _ => None,
    }
  }

  /// Settles the artifact from a generation result.
  fn settle(&mut self, result: Result<T>) {
    *self = match result {
      Ok(value) => Artifact::Ready(value),
      Err(e) => Artifact::Failed(e.to_string()),
    };
  }
}

/// Identifies one generation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// State of the main study screen.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
  /// Visible tab
  active:     Tab,
  /// Text of the current round
  text:       Option<String>,
  /// Number of rounds started
  round:      u64,
  /// Generated flashcards
  flashcards: Artifact<Vec<Flashcard>>,
  /// Generated quiz
  quiz:       Artifact<Vec<QuizQuestion>>,
  /// Generated summary
  summary:    Artifact<String>,
}

impl Dashboard {
  /// A dashboard on the upload tab with nothing generated.
  pub fn new() -> Self { Self::default() }

  /// The visible tab.
  pub fn active_tab(&self) -> Tab { self.active }

  /// Switches tabs.
  pub fn select(&mut self, tab: Tab) { self.active = tab; }

  /// Text of the current round, if any.
  pub fn text(&self) -> Option<&str> { self.text.as_deref() }

  /// The flashcard artifact.
  pub fn flashcards(&self) -> &Artifact<Vec<Flashcard>> { &self.flashcards }

  /// The quiz artifact.
  pub fn quiz(&self) -> &Artifact<Vec<QuizQuestion>> { &self.quiz }

  /// The summary artifact.
  pub fn summary(&self) -> &Artifact<String> { &self.summary }

  /// Whether any artifact is still loading.
  pub fn is_generating(&self) -> bool {
    self.flashcards.is_loading() || self.quiz.is_loading() || self.summary.is_loading()
  }

  /// Starts a new round for `text`: every artifact goes to loading and earlier tickets
  /// become stale.
  pub fn begin(&mut self, text: impl Into<String>) -> Ticket {
    self.round += 1;
    self.text = Some(text.into());
    self.flashcards = Artifact::Loading;
    self.quiz = Artifact::Loading;
    self.summary = Artifact::Loading;
    trace!("Started generation round {}", self.round);
    Ticket(self.round)
  }

  /// Whether `ticket` belongs to the current round; logs when it does not.
  fn is_current(&self, ticket: Ticket, what: &str) -> bool {
    let current = ticket.0 == self.round;
    if !current {
      debug!("Discarding stale {what} from round {} (current round {})", ticket.0, self.round);
    }
    current
  }

  /// Applies a flashcard result. Returns false if the ticket was stale.
  pub fn apply_flashcards(&mut self, ticket: Ticket, result: Result<Vec<Flashcard>>) -> bool {
    if !self.is_current(ticket, "flashcards") {
      return false;
    }
    self.flashcards.settle(result);
    true
  }

  /// Applies a quiz result. Returns false if the ticket was stale.
  pub fn apply_quiz(&mut self, ticket: Ticket, result: Result<Vec<QuizQuestion>>) -> bool {
    if !self.is_current(ticket, "quiz") {
      return false;
    }
    self.quiz.settle(result);
    true
  }

  /// Applies a summary result. Returns false if the ticket was stale.
  pub fn apply_summary(&mut self, ticket: Ticket, result: Result<String>) -> bool {
    if !self.is_current(ticket, "summary") {
      return false;
    }
    self.summary.settle(result);
    true
  }

  /// Applies all three results of a round. Returns false if the ticket was stale.
  pub fn apply_all(&mut self, ticket: Ticket, generated: Generated) -> bool {
    self.apply_flashcards(ticket, generated.flashcards)
      && self.apply_quiz(ticket, generated.quiz)
      && self.apply_summary(ticket, generated.summary)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// One card.
  fn cards() -> Vec<Flashcard> {
    vec![Flashcard { front: "ATP".to_string(), back: "Energy".to_string() }]
  }

  #[test]
  fn test_new_dashboard() {
    let dashboard = Dashboard::new();
    assert_eq!(dashboard.active_tab(), Tab::Upload);
    assert_eq!(dashboard.summary(), &Artifact::Idle);
    assert!(!dashboard.is_generating());
    assert_eq!(dashboard.text(), None);
  }

  #[test]
  fn test_round_lifecycle() {
    let mut dashboard = Dashboard::new();
    let ticket = dashboard.begin("text");
    assert!(dashboard.is_generating());
    assert!(dashboard.quiz().is_loading());

    assert!(dashboard.apply_flashcards(ticket, Ok(cards())));
    assert!(dashboard.apply_quiz(ticket, Err(StudyError::ApiError("500: boom".to_string()))));
    assert!(dashboard.is_generating());
    assert!(dashboard.apply_summary(ticket, Ok("summary".to_string())));
    assert!(!dashboard.is_generating());

    assert_eq!(dashboard.flashcards().value(), Some(&cards()));
    assert!(matches!(dashboard.quiz(), Artifact::Failed(message) if message.contains("boom")));
  }

  #[traced_test]
  #[test]
  fn test_stale_results_discarded() {
    let mut dashboard = Dashboard::new();
    let old = dashboard.begin("old");
    let new = dashboard.begin("new");

    assert!(!dashboard.apply_flashcards(old, Ok(cards())));
    assert!(dashboard.flashcards().is_loading());
    assert!(logs_contain("Discarding stale flashcards"));

    let generated = Generated {
      flashcards: Ok(cards()),
      quiz:       Ok(Vec::new()),
      summary:    Ok("old summary".to_string()),
    };
    assert!(!dashboard.apply_all(old, generated));
    assert!(dashboard.summary().is_loading());

    assert!(dashboard.apply_summary(new, Ok("new summary".to_string())));
    assert_eq!(dashboard.text(), Some("new"));
  }

  #[test]
  fn test_tabs() {
    let names: Vec<String> = Tab::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["Upload", "Flashcards", "Summary", "Quiz"]);

    let mut dashboard = Dashboard::new();
    dashboard.select(Tab::Quiz);
    dashboard.begin("text");
    assert_eq!(dashboard.active_tab(), Tab::Quiz);
  }
}
