//! Flashcard, quiz and summary generation.
//!
//! The [`Gateway`] wraps a [`CompletionModel`](crate::llm::CompletionModel): it embeds
//! document text in the instruction template for the requested kind, sends the
//! prompt, and validates the answer with [`schema`]. The three generations are
//! independent. A failure in one never affects the others, and nothing is retried.
//!
//! # Examples
//!
//! ```no_run
//! use studydeck::{generate::Gateway, llm::ChatClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new(ChatClient::new().with_api_key(std::env::var("GROQ_API_KEY")?));
//!
//! let generated = gateway.generate_all("Mitochondria produce ATP through respiration.").await;
//! match generated.flashcards {
//!   Ok(cards) => println!("{} flashcards", cards.len()),
//!   Err(e) => eprintln!("Flashcards failed: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

use crate::llm::CompletionModel;

use super::*;

pub mod prompt;
pub mod schema;

pub use self::schema::{Flashcard, QuizQuestion};

/// The three kinds of study material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
  /// Question and answer cards
  Flashcards,
  /// Multiple-choice questions
  Quiz,
  /// A markdown summary
  Summary,
}

impl GenerationKind {
  /// Every kind, in display order.
  pub const ALL: [GenerationKind; 3] =
    [GenerationKind::Flashcards, GenerationKind::Quiz, GenerationKind::Summary];
}

impl Display for GenerationKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      GenerationKind::Flashcards => write!(f, "flashcards"),
      GenerationKind::Quiz => write!(f, "quiz"),
      GenerationKind::Summary => write!(f, "summary"),
    }
  }
}

/// Results of [`Gateway::generate_all`], one per kind.
#[derive(Debug)]
pub struct Generated {
  /// Flashcards, or why they failed
  pub flashcards: Result<Vec<Flashcard>>,
  /// Quiz questions, or why they failed
  pub quiz:       Result<Vec<QuizQuestion>>,
  /// Markdown summary, or why it failed
  pub summary:    Result<String>,
}

/// Turns document text into study material through a completion model.
#[derive(Debug, Clone)]
pub struct Gateway<M> {
  /// The model every prompt goes to
  model: M,
}

impl<M: CompletionModel> Gateway<M> {
  /// Creates a gateway over `model`.
  pub fn new(model: M) -> Self { Self { model } }

  /// The underlying model.
  pub fn model(&self) -> &M { &self.model }

  /// Sends the prompt for `kind` and returns the raw answer.
  async fn ask(&self, kind: GenerationKind, text: &str) -> Result<String> {
    debug!("Requesting {kind} for {} characters of text", text.len());
    let answer = self.model.complete(&kind.prompt(text)).await;
    if let Err(e) = &answer {
      warn!("Model call for {kind} failed: {e}");
    }
    answer
  }

  /// Generates flashcards from `text`.
  ///
  /// # Errors
  ///
  /// Fails if the model call fails or the answer is not a valid flashcard array.
  pub async fn flashcards(&self, text: &str) -> Result<Vec<Flashcard>> {
    let raw = self.ask(GenerationKind::Flashcards, text).await?;
    schema::parse_flashcards(&raw)
  }

  /// Generates quiz questions from `text`.
  ///
  /// # Errors
  ///
  /// Fails if the model call fails or the answer is not a valid quiz array.
  pub async fn quiz(&self, text: &str) -> Result<Vec<QuizQuestion>> {
    let raw = self.ask(GenerationKind::Quiz, text).await?;
    schema::parse_quiz(&raw)
  }

  /// Generates a markdown summary of `text`. The answer is returned verbatim.
  ///
  /// # Errors
  ///
  /// Fails only if the model call fails.
  pub async fn summary(&self, text: &str) -> Result<String> {
    self.ask(GenerationKind::Summary, text).await
  }

  /// Runs all three generations concurrently.
  pub async fn generate_all(&self, text: &str) -> Generated {
    let (flashcards, quiz, summary) =
      futures::join!(self.flashcards(text), self.quiz(text), self.summary(text));
    Generated { flashcards, quiz, summary }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  /// Answers each prompt by looking at which template it starts with.
  #[derive(Default)]
  struct ScriptedModel {
    /// Answer for flashcard prompts
    flashcards: Option<String>,
    /// Answer for quiz prompts
    quiz:       Option<String>,
    /// Answer for summary prompts
    summary:    Option<String>,
    /// Number of calls received
    calls:      AtomicUsize,
  }

  #[async_trait]
  impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      let answer = if prompt.starts_with(prompt::FLASHCARDS_TEMPLATE) {
        &self.flashcards
      } else if prompt.starts_with(prompt::QUIZ_TEMPLATE) {
        &self.quiz
      } else {
        &self.summary
      };
      answer.clone().ok_or_else(|| StudyError::ApiError("500: upstream down".to_string()))
    }
  }

  const CARDS: &str = r#"[{"front": "ATP", "back": "Energy currency"}]"#;

  #[traced_test]
  #[tokio::test]
  async fn test_each_kind() {
    let model = ScriptedModel {
      flashcards: Some(CARDS.to_string()),
      summary: Some("# Overview\n- point".to_string()),
      quiz: Some("Here is your quiz!".to_string()),
      ..Default::default()
    };
    let gateway = Gateway::new(model);

    assert_eq!(gateway.flashcards("text").await.unwrap()[0].front, "ATP");
    assert_eq!(gateway.summary("text").await.unwrap(), "# Overview\n- point");
    let err = gateway.quiz("text").await.unwrap_err();
    assert!(matches!(err, StudyError::InvalidResponse { kind: GenerationKind::Quiz, .. }));
    assert_eq!(gateway.model().calls.load(Ordering::SeqCst), 3);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_generate_all_failures_are_independent() {
    let model = ScriptedModel { flashcards: Some(CARDS.to_string()), ..Default::default() };
    let gateway = Gateway::new(model);

    let generated = gateway.generate_all("text").await;
    assert_eq!(generated.flashcards.unwrap().len(), 1);
    assert!(matches!(generated.quiz, Err(StudyError::ApiError(_))));
    assert!(matches!(generated.summary, Err(StudyError::ApiError(_))));
    assert_eq!(gateway.model().calls.load(Ordering::SeqCst), 3);
    assert!(logs_contain("Model call for summary failed"));
  }

  #[test]
  fn test_kind_names() {
    let names: Vec<String> = GenerationKind::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["flashcards", "quiz", "summary"]);
    assert_eq!(serde_json::to_string(&GenerationKind::Quiz).unwrap(), "\"quiz\"");
  }
}
