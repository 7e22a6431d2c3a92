//! Answering and scoring a multiple-choice quiz.
//!
//! A [`QuizSession`] walks through the questions one at a time. Selecting an answer
//! reveals the explanation for that question. Once every question has an answer the
//! quiz can be submitted; after that answers are frozen and the session reports a
//! [`Score`].
//!
//! # Examples
//!
//! ```
//! use studydeck::{generate::QuizQuestion, view::QuizSession};
//!
//! let question = QuizQuestion {
//!   question:       "2 + 2?".to_string(),
//!   options:        vec!["3".into(), "4".into(), "5".into(), "22".into()],
//!   correct_answer: "4".to_string(),
//!   explanation:    "Arithmetic.".to_string(),
//! };
//! let mut session = QuizSession::new(vec![question]);
//!
//! assert!(!session.can_submit());
//! session.select("4");
//! let score = session.submit().unwrap();
//! assert_eq!(score.to_string(), "1 out of 1 (100%)");
//! ```

use super::*;
use crate::generate::QuizQuestion;

/// The result of a submitted quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
  /// Questions answered correctly
  pub correct: usize,
  /// Questions in the quiz
  pub total:   usize,
}

impl Score {
  /// Percentage of correct answers, rounded half up. Zero for an empty quiz.
  pub fn percent(&self) -> usize {
    if self.total == 0 {
      return 0;
    }
    (self.correct * 200 + self.total) / (self.total * 2)
  }
}

impl Display for Score {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} out of {} ({}%)", self.correct, self.total, self.percent())
  }
}

/// What to show under the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback<'a> {
  /// Before submission: the explanation alone
  Explanation(&'a str),
  /// After submission, answered correctly
  Correct(&'a str),
  /// After submission, answered wrongly
  Incorrect {
    /// The option that was correct
    correct_answer: &'a str,
    /// Why
    explanation:    &'a str,
  },
}

/// State of one attempt at a quiz.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
  /// The questions
  questions:        Vec<QuizQuestion>,
  /// Position of the current question
  index:            usize,
  /// Selected option per question
  answers:          Vec<Option<String>>,
  /// Whether the explanation is showing
  show_explanation: bool,
  /// Whether the quiz was submitted
  submitted:        bool,
}

impl QuizSession {
  /// A fresh attempt positioned on the first question.
  pub fn new(questions: Vec<QuizQuestion>) -> Self {
    let answers = vec![None; questions.len()];
    Self { questions, index: 0, answers, show_explanation: false, submitted: false }
  }

  /// Whether the quiz has no questions.
  pub fn is_empty(&self) -> bool { self.questions.is_empty() }

  /// Number of questions.
  pub fn len(&self) -> usize { self.questions.len() }

  /// Zero-based position of the current question.
  pub fn index(&self) -> usize { self.index }

  /// The current question.
  pub fn current(&self) -> Option<&QuizQuestion> { self.questions.get(self.index) }

  /// Whether the current question is the last one.
  pub fn is_last(&self) -> bool { self.index + 1 >= self.questions.len() }

  /// The answer selected for question `index`.
  pub fn answer(&self, index: usize) -> Option<&str> {
    self.answers.get(index).and_then(|answer| answer.as_deref())
  }

  /// Whether the quiz was submitted.
  pub fn is_submitted(&self) -> bool { self.submitted }

  /// Selects `answer` for the current question and reveals the explanation.
  ///
  /// Returns false, changing nothing, after submission or when `answer` is not one of
  /// the current question's options.
  pub fn select(&mut self, answer: &str) -> bool {
    if self.submitted {
      trace!("Ignoring answer after submission");
      return false;
    }
    let Some(question) = self.questions.get(self.index) else {
      return false;
    };
    if !question.options.iter().any(|option| option == answer) {
      return false;
    }
    self.answers[self.index] = Some(answer.to_string());
    self.show_explanation = true;
    true
  }

  /// Advances to the next question, hiding the explanation. Returns false at the end.
  pub fn next(&mut self) -> bool {
    if self.is_last() {
      return false;
    }
    self.index += 1;
    self.show_explanation = self.submitted;
    true
  }

  /// Goes back one question, hiding the explanation. Returns false at the start.
  pub fn previous(&mut self) -> bool {
    if self.index == 0 {
      return false;
    }
    self.index -= 1;
    self.show_explanation = self.submitted;
    true
  }

  /// Whether every question has an answer and the quiz is still open.
  pub fn can_submit(&self) -> bool {
    !self.submitted && !self.questions.is_empty() && self.answers.iter().all(Option::is_some)
  }

  /// Submits the quiz. Returns `None`, changing nothing, unless [`can_submit`] holds.
  ///
  /// [`can_submit`]: QuizSession::can_submit
  pub fn submit(&mut self) -> Option<Score> {
    if !self.can_submit() {
      return None;
    }
    self.submitted = true;
    self.show_explanation = true;
    let score = self.score();
    debug!("Quiz submitted: {score}");
    Some(score)
  }

  /// Count of answers matching the correct option exactly.
  pub fn score(&self) -> Score {
    let correct = self
      .questions
      .iter()
      .zip(&self.answers)
      .filter(|(question, answer)| answer.as_deref() == Some(question.correct_answer.as_str()))
      .count();
    Score { correct, total: self.questions.len() }
  }

  /// Feedback for the current question, once an answer is selected and the explanation
  /// is showing.
  pub fn feedback(&self) -> Option<Feedback<'_>> {
    let question = self.current()?;
    let answer = self.answer(self.index)?;
    if !self.show_explanation {
      return None;
    }
    if !self.submitted {
      return Some(Feedback::Explanation(&question.explanation));
    }
    if answer == question.correct_answer {
      Some(Feedback::Correct(&question.explanation))
    } else {
      Some(Feedback::Incorrect {
        correct_answer: &question.correct_answer,
        explanation:    &question.explanation,
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// A question whose correct answer is `"b"`.
  fn question(n: usize) -> QuizQuestion {
    QuizQuestion {
      question:       format!("Question {n}"),
      options:        vec!["a".into(), "b".into(), "c".into(), "d".into()],
      correct_answer: "b".to_string(),
      explanation:    format!("Explanation {n}"),
    }
  }

  /// Answers every question of `session` in order.
  fn answer_all(session: &mut QuizSession, answers: &[&str]) {
    for (i, answer) in answers.iter().enumerate() {
      assert!(session.select(answer));
      if i + 1 < answers.len() {
        assert!(session.next());
      }
    }
  }

  #[test]
  fn test_three_of_five() {
    let mut session = QuizSession::new((1..=5).map(question).collect());
    answer_all(&mut session, &["b", "a", "b", "c", "b"]);
    let score = session.submit().unwrap();
    assert_eq!(score, Score { correct: 3, total: 5 });
    assert_eq!(score.to_string(), "3 out of 5 (60%)");
  }

  #[test]
  fn test_percent_rounds_half_up() {
    assert_eq!(Score { correct: 1, total: 8 }.percent(), 13);
    assert_eq!(Score { correct: 2, total: 3 }.percent(), 67);
    assert_eq!(Score { correct: 1, total: 3 }.percent(), 33);
    assert_eq!(Score { correct: 0, total: 0 }.to_string(), "0 out of 0 (0%)");
  }

  #[test]
  fn test_submit_requires_all_answers() {
    let mut session = QuizSession::new((1..=2).map(question).collect());
    session.select("b");
    assert!(!session.can_submit());
    assert_eq!(session.submit(), None);
    assert!(!session.is_submitted());

    session.next();
    session.select("a");
    assert!(session.can_submit());
    assert!(session.submit().is_some());
    assert!(!session.can_submit());
    assert_eq!(session.submit(), None);
  }

  #[test]
  fn test_answers_frozen_after_submission() {
    let mut session = QuizSession::new(vec![question(1)]);
    session.select("a");
    session.submit().unwrap();
    assert!(!session.select("b"));
    assert_eq!(session.answer(0), Some("a"));
    assert_eq!(session.score().correct, 0);
  }

  #[test]
  fn test_unknown_option_ignored() {
    let mut session = QuizSession::new(vec![question(1)]);
    assert!(!session.select("z"));
    assert_eq!(session.answer(0), None);
    assert_eq!(session.feedback(), None);
  }

  #[test]
  fn test_feedback_flow() {
    let mut session = QuizSession::new((1..=2).map(question).collect());
    assert_eq!(session.feedback(), None);
    session.select("c");
    assert_eq!(session.feedback(), Some(Feedback::Explanation("Explanation 1")));

    // Navigation hides the explanation until an answer is chosen again
    session.next();
    assert_eq!(session.feedback(), None);
    session.select("b");
    session.previous();
    assert_eq!(session.feedback(), None);

    session.submit().unwrap();
    assert_eq!(
      session.feedback(),
      Some(Feedback::Incorrect { correct_answer: "b", explanation: "Explanation 1" })
    );
    session.next();
    assert_eq!(session.feedback(), Some(Feedback::Correct("Explanation 2")));
  }

  #[test]
  fn test_empty_quiz() {
    let mut session = QuizSession::new(Vec::new());
    assert!(session.is_empty());
    assert!(!session.select("a"));
    assert!(!session.can_submit());
    assert!(!session.next());
  }
}
