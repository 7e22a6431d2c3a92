//! Instruction templates wrapped around document text.
//!
//! Each template asks for exactly the shape its validator in
//! [`schema`](super::schema) accepts. The document text is appended verbatim after the
//! instructions.

use super::*;

/// Instructions for flashcard generation.
pub const FLASHCARDS_TEMPLATE: &str = "\
Create flashcards from the following text. Format the output as a JSON array of objects, \
where each object has a \"front\" and \"back\" property. The front should be a question or concept, \
and the back should be the answer or explanation. Make the flashcards concise but comprehensive.
Only return the JSON array, nothing else.

Text to process:
";

/// Instructions for quiz generation.
pub const QUIZ_TEMPLATE: &str = "\
Create a quiz based on the following text. Generate 5 multiple-choice questions.
Format the output as a JSON array of objects with the following structure:
{
  \"question\": \"The question text\",
  \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],
  \"correctAnswer\": \"The correct option text\",
  \"explanation\": \"Brief explanation of why this is the correct answer\"
}

Only return the JSON array, nothing else.

Text to create quiz from:
";

/// Instructions for summary generation.
pub const SUMMARY_TEMPLATE: &str = "\
Create a comprehensive summary of the following text. The summary should:
1. Start with a brief overview
2. Include main key points in bullet points
3. Highlight important concepts or terms
4. End with a brief conclusion

Format the response in markdown.

Text to summarize:
";

impl GenerationKind {
  /// The instruction template for this kind.
  pub fn template(&self) -> &'static str {
    match self {
      GenerationKind::Flashcards => FLASHCARDS_TEMPLATE,
      GenerationKind::Quiz => QUIZ_TEMPLATE,
      GenerationKind::Summary => SUMMARY_TEMPLATE,
    }
  }

  /// The full prompt for `text`.
  ///
  /// ```
  /// use studydeck::generate::GenerationKind;
  ///
  /// let prompt = GenerationKind::Summary.prompt("Mitochondria make ATP.");
  /// assert!(prompt.starts_with("Create a comprehensive summary"));
  /// assert!(prompt.ends_with("Mitochondria make ATP."));
  /// ```
  pub fn prompt(&self, text: &str) -> String { format!("{}{text}", self.template()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_prompts_embed_text_last() {
    for kind in GenerationKind::ALL {
      let prompt = kind.prompt("X");
      assert!(prompt.ends_with(":\nX"), "{kind} prompt: {prompt}");
    }
  }

  #[test]
  fn test_prompts_describe_schema() {
    assert!(GenerationKind::Flashcards.prompt("").contains("\"front\" and \"back\""));
    let quiz = GenerationKind::Quiz.prompt("");
    assert!(quiz.contains("\"correctAnswer\""));
    assert!(quiz.contains("5 multiple-choice questions"));
    assert!(GenerationKind::Summary.prompt("").contains("markdown"));
  }
}
