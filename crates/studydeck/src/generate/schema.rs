//! Strict validation of model output.
//!
//! Model answers for flashcards and quizzes must be a bare JSON array. Parsing is
//! strict: unknown fields are rejected, every required string must be non-empty,
//! and an empty array is an error. Nothing is repaired. A response either validates
//! completely or fails with [`StudyError::InvalidResponse`].

use serde::de::DeserializeOwned;

use super::*;

/// Number of options every quiz question must offer.
pub const QUIZ_OPTION_COUNT: usize = 4;

/// A two-sided study card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flashcard {
  /// Question or concept
  pub front: String,
  /// Answer or explanation
  pub back:  String,
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuizQuestion {
  /// The question text
  pub question:       String,
  /// Exactly four answer options
  pub options:        Vec<String>,
  /// The option text that is correct, matched exactly
  pub correct_answer: String,
  /// Why the correct answer is correct
  pub explanation:    String,
}

/// Item-level checks that deserialization alone cannot express.
pub trait Validate {
  /// Returns a description of the first problem found.
  fn validate(&self) -> core::result::Result<(), String>;
}

impl Validate for Flashcard {
  fn validate(&self) -> core::result::Result<(), String> {
    require_text("front", &self.front)?;
    require_text("back", &self.back)
  }
}

impl Validate for QuizQuestion {
  fn validate(&self) -> core::result::Result<(), String> {
    require_text("question", &self.question)?;
    if self.options.len() != QUIZ_OPTION_COUNT {
      return Err(format!(
        "options: expected {QUIZ_OPTION_COUNT} options, found {}",
        self.options.len()
      ));
    }
    for (index, option) in self.options.iter().enumerate() {
      require_text(&format!("options[{index}]"), option)?;
    }
    require_text("correctAnswer", &self.correct_answer)?;
    if !self.options.contains(&self.correct_answer) {
      return Err(format!("correctAnswer: \"{}\" is not one of the options", self.correct_answer));
    }
    require_text("explanation", &self.explanation)
  }
}

/// Fails when `value` is blank.
fn require_text(field: &str, value: &str) -> core::result::Result<(), String> {
  if value.trim().is_empty() {
    return Err(format!("{field}: must not be empty"));
  }
  Ok(())
}

/// Parses and validates a flashcard response.
///
/// ```
/// use studydeck::generate::schema::parse_flashcards;
///
/// let cards = parse_flashcards(r#"[{"front": "ATP?", "back": "Energy currency"}]"#).unwrap();
/// assert_eq!(cards[0].back, "Energy currency");
///
/// assert!(parse_flashcards("Sure! Here are your flashcards:").is_err());
/// ```
pub fn parse_flashcards(raw: &str) -> Result<Vec<Flashcard>> {
  parse_array(GenerationKind::Flashcards, raw)
}

/// Parses and validates a quiz response.
pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>> { parse_array(GenerationKind::Quiz, raw) }

/// Parses a non-empty JSON array of `T`, validating every element.
fn parse_array<T: DeserializeOwned + Validate>(kind: GenerationKind, raw: &str) -> Result<Vec<T>> {
  let invalid = |reason: String| StudyError::InvalidResponse { kind, reason };

  let items: Vec<T> = serde_json::from_str(raw.trim()).map_err(|e| invalid(e.to_string()))?;
  if items.is_empty() {
    return Err(invalid("expected at least one item, found an empty array".to_string()));
  }
  for (index, item) in items.iter().enumerate() {
    item.validate().map_err(|reason| invalid(format!("[{index}].{reason}")))?;
  }

  trace!("Validated {} {kind} items", items.len());
  Ok(items)
}

#[cfg(test)]
mod tests {
  use super::*;

  /// A well-formed question with the given correct answer.
  fn question(correct: &str) -> serde_json::Value {
    serde_json::json!({
      "question": "Which organelle produces ATP?",
      "options": ["Nucleus", "Mitochondrion", "Ribosome", "Golgi apparatus"],
      "correctAnswer": correct,
      "explanation": "Cellular respiration happens in the mitochondria."
    })
  }

  /// The reason of an [`StudyError::InvalidResponse`].
  fn reason(err: StudyError) -> String {
    match err {
      StudyError::InvalidResponse { reason, .. } => reason,
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn test_valid_flashcards() {
    let raw = r#"
      [
        {"front": "What is ATP?", "back": "The energy currency of the cell"},
        {"front": "Osmosis", "back": "Diffusion of water across a membrane"}
      ]
    "#;
    let cards = parse_flashcards(raw).unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[1].front, "Osmosis");
  }

  #[test]
  fn test_flashcards_rejections() {
    assert!(reason(parse_flashcards("not json").unwrap_err()).contains("expected"));
    assert!(reason(parse_flashcards("[]").unwrap_err()).contains("empty array"));
    assert!(parse_flashcards(r#"{"front": "a", "back": "b"}"#).is_err());
    assert!(parse_flashcards(r#"[{"front": "a"}]"#).is_err());
    assert!(parse_flashcards(r#"[{"front": "a", "back": "b", "hint": "c"}]"#).is_err());

    let err = parse_flashcards(r#"[{"front": "a", "back": "b"}, {"front": " ", "back": "b"}]"#);
    assert_eq!(reason(err.unwrap_err()), "[1].front: must not be empty");
  }

  #[test]
  fn test_fenced_output_is_not_repaired() {
    let raw = "```json\n[{\"front\": \"a\", \"back\": \"b\"}]\n```";
    assert!(parse_flashcards(raw).is_err());
  }

  #[test]
  fn test_valid_quiz() {
    let raw = serde_json::to_string(&vec![question("Mitochondrion")]).unwrap();
    let quiz = parse_quiz(&raw).unwrap();
    assert_eq!(quiz[0].correct_answer, "Mitochondrion");
    assert_eq!(quiz[0].options.len(), QUIZ_OPTION_COUNT);
  }

  #[test]
  fn test_quiz_correct_answer_must_be_an_option() {
    let raw = serde_json::to_string(&vec![question("Chloroplast")]).unwrap();
    let err = parse_quiz(&raw).unwrap_err();
    assert!(matches!(err, StudyError::InvalidResponse { kind: GenerationKind::Quiz, .. }));
    assert!(reason(err).contains("not one of the options"));

    // Exact match only
    let raw = serde_json::to_string(&vec![question("mitochondrion")]).unwrap();
    assert!(parse_quiz(&raw).is_err());
  }

  #[test]
  fn test_quiz_needs_four_options() {
    let mut three = question("Nucleus");
    three["options"] = serde_json::json!(["Nucleus", "Mitochondrion", "Ribosome"]);
    let raw = serde_json::to_string(&vec![three]).unwrap();
    assert_eq!(reason(parse_quiz(&raw).unwrap_err()), "[0].options: expected 4 options, found 3");
  }

  #[test]
  fn test_quiz_rejects_unknown_and_missing_fields() {
    let mut extra = question("Nucleus");
    extra["difficulty"] = serde_json::json!("easy");
    assert!(parse_quiz(&serde_json::to_string(&vec![extra]).unwrap()).is_err());

    let mut missing = question("Nucleus");
    missing.as_object_mut().unwrap().remove("explanation");
    assert!(parse_quiz(&serde_json::to_string(&vec![missing]).unwrap()).is_err());
  }

  #[test]
  fn test_quiz_serializes_camel_case() {
    let question: QuizQuestion = serde_json::from_value(question("Nucleus")).unwrap();
    let value = serde_json::to_value(&question).unwrap();
    assert_eq!(value["correctAnswer"], "Nucleus");
    assert!(value.get("correct_answer").is_none());
  }
}
