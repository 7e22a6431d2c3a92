//! Module for interactive study sessions in the terminal.
//!
//! The material is generated fresh for every session. Flashcards are flipped and paged
//! through with a menu; a quiz is answered question by question, submitted once every
//! question has an answer, and then reviewed with the correct answers.

use studydeck::{
  generate::{Flashcard, Gateway, QuizQuestion},
  view::{FlashcardViewer, QuizSession},
};

use super::*;

/// Which material to study
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StudyMode {
  /// Flip through flashcards
  #[default]
  Flashcards,
  /// Take a multiple-choice quiz
  Quiz,
}

/// Options for [`Commands::Study`]
#[derive(Args, Clone)]
pub struct StudyOptions {
  /// Document id, id prefix or name
  pub document: String,

  /// What to study
  #[arg(value_enum, default_value_t = StudyMode::Flashcards)]
  pub mode: StudyMode,
}

/// Menu entries while studying flashcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardAction {
  /// Show the next card
  Next,
  /// Leave the session
  Finish,
  /// Turn the card over
  Flip,
  /// Show the previous card
  Previous,
}

impl CardAction {
  /// Menu label.
  fn label(&self) -> &'static str {
    match self {
      CardAction::Next => "Next card",
      CardAction::Finish => "Finish",
      CardAction::Flip => "Flip",
      CardAction::Previous => "Previous card",
    }
  }
}

/// The actions available on the current card, the default first.
fn card_actions(viewer: &FlashcardViewer) -> Vec<CardAction> {
  let last = viewer.index() + 1 >= viewer.len();
  let mut actions = vec![if last { CardAction::Finish } else { CardAction::Next }, CardAction::Flip];
  if viewer.index() > 0 {
    actions.push(CardAction::Previous);
  }
  if !last {
    actions.push(CardAction::Finish);
  }
  actions
}

/// Function for the [`Commands::Study`] in the CLI.
pub async fn study<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  study_options: StudyOptions,
) -> Result<()> {
  let StudyOptions { document, mode } = study_options;
  let store = open_store(config)?;
  let document = resolve(store.documents(), &document)?;
  let text = document_text(document)?;
  let gateway = Gateway::new(config.chat_client()?);

  match mode {
    StudyMode::Flashcards => {
      interaction.reply(ResponseContent::Info(&format!("Generating flashcards for {}", document.name)))?;
      let cards = gateway.flashcards(text).await?;
      study_flashcards(interaction, cards)
    },
    StudyMode::Quiz => {
      interaction.reply(ResponseContent::Info(&format!("Generating a quiz for {}", document.name)))?;
      let questions = gateway.quiz(text).await?;
      take_quiz(interaction, questions)
    },
  }
}

/// Pages through `cards` until the user finishes.
pub fn study_flashcards<I: UserInteraction>(interaction: &I, cards: Vec<Flashcard>) -> Result<()> {
  let mut viewer = FlashcardViewer::new(cards);
  if viewer.is_empty() {
    return interaction.reply(ResponseContent::Info("There are no flashcards to study"));
  }

  loop {
    interaction.reply(ResponseContent::Card(&viewer))?;
    let actions = card_actions(&viewer);
    let labels: Vec<String> = actions.iter().map(|action| action.label().to_string()).collect();
    match actions[interaction.select("What next?", &labels)?] {
      CardAction::Next => {
        viewer.next();
      },
      CardAction::Previous => {
        viewer.previous();
      },
      CardAction::Flip => viewer.flip(),
      CardAction::Finish => break,
    }
  }
  interaction.reply(ResponseContent::Success(&format!("Studied {} flashcards", viewer.len())))
}

/// Asks every question of `questions`, submits, and shows the review.
pub fn take_quiz<I: UserInteraction>(interaction: &I, questions: Vec<QuizQuestion>) -> Result<()> {
  let mut session = QuizSession::new(questions);
  if session.is_empty() {
    return interaction.reply(ResponseContent::Info("There are no questions in this quiz"));
  }

  while !session.can_submit() {
    interaction.reply(ResponseContent::Question(&session))?;
    let Some(question) = session.current() else { break };
    let options = question.options.clone();
    let choice = interaction.select("Your answer", &options)?;
    session.select(&options[choice]);
    if let Some(feedback) = session.feedback() {
      interaction.reply(ResponseContent::Feedback(feedback))?;
    }
    if !session.next() && !session.can_submit() {
      // Back to the first unanswered question
      while session.previous() {}
      while session.answer(session.index()).is_some() && session.next() {}
    }
  }

  let Some(score) = session.submit() else {
    return Ok(());
  };
  interaction.reply(ResponseContent::Score(score))?;

  while session.previous() {}
  loop {
    interaction.reply(ResponseContent::Question(&session))?;
    if let Some(answer) = session.answer(session.index()) {
      interaction.reply(ResponseContent::Info(&format!("You answered {answer}")))?;
    }
    if let Some(feedback) = session.feedback() {
      interaction.reply(ResponseContent::Feedback(feedback))?;
    }
    if !session.next() {
      break;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;

  /// Plays back scripted selections and collects what would be printed.
  #[derive(Default)]
  struct Scripted {
    choices: RefCell<Vec<usize>>,
    shown:   RefCell<Vec<String>>,
  }

  impl Scripted {
    fn new(mut choices: Vec<usize>) -> Self {
      choices.reverse();
      Self { choices: RefCell::new(choices), shown: RefCell::default() }
    }
  }

  impl UserInteraction for Scripted {
    fn confirm(&self, _message: &str) -> Result<bool> { Ok(true) }

    fn confirm_typed(&self, _message: &str, _word: &str) -> Result<bool> { Ok(true) }

    fn select(&self, _message: &str, _items: &[String]) -> Result<usize> {
      Ok(self.choices.borrow_mut().pop().unwrap_or(0))
    }

    fn reply(&self, content: ResponseContent) -> Result<()> {
      let line = match content {
        ResponseContent::Card(viewer) => format!("card {}", viewer.visible_text().unwrap()),
        ResponseContent::Score(score) => format!("score {score}"),
        ResponseContent::Feedback(feedback) => format!("{feedback:?}"),
        ResponseContent::Success(message) | ResponseContent::Info(message) => message.to_string(),
        other => format!("{other:?}"),
      };
      self.shown.borrow_mut().push(line);
      Ok(())
    }
  }

  fn cards() -> Vec<Flashcard> {
    vec![
      Flashcard { front: "ATP".to_string(), back: "Energy".to_string() },
      Flashcard { front: "DNA".to_string(), back: "Genes".to_string() },
    ]
  }

  fn question(n: usize) -> QuizQuestion {
    QuizQuestion {
      question:       format!("Question {n}"),
      options:        vec!["A".into(), "B".into(), "C".into(), "D".into()],
      correct_answer: "B".to_string(),
      explanation:    format!("Because {n}"),
    }
  }

  #[test]
  fn test_flashcards_with_defaults() {
    let interaction = Scripted::new(Vec::new());
    study_flashcards(&interaction, cards()).unwrap();
    assert_eq!(
      *interaction.shown.borrow(),
      vec!["card ATP", "card DNA", "Studied 2 flashcards"]
    );
  }

  #[test]
  fn test_flip_and_go_back() {
    // Flip, next, previous (resets the flip), next, finish
    let interaction = Scripted::new(vec![1, 0, 2, 0, 0]);
    study_flashcards(&interaction, cards()).unwrap();
    assert_eq!(
      *interaction.shown.borrow(),
      vec!["card ATP", "card Energy", "card DNA", "card ATP", "card DNA", "Studied 2 flashcards"]
    );
  }

  #[test]
  fn test_card_actions() {
    let mut viewer = FlashcardViewer::new(cards());
    assert_eq!(card_actions(&viewer), vec![CardAction::Next, CardAction::Flip, CardAction::Finish]);
    viewer.next();
    assert_eq!(card_actions(&viewer), vec![
      CardAction::Finish,
      CardAction::Flip,
      CardAction::Previous
    ]);
  }

  #[test]
  fn test_quiz_three_of_five() {
    // Options are A, B, C, D and B is always right
    let interaction = Scripted::new(vec![1, 0, 1, 2, 1]);
    take_quiz(&interaction, (1..=5).map(question).collect()).unwrap();
    let shown = interaction.shown.borrow();
    assert!(shown.contains(&"score 3 out of 5 (60%)".to_string()));
    assert!(shown.contains(&"You answered C".to_string()));
    assert!(shown
      .iter()
      .any(|line| line.contains("Incorrect") && line.contains("Because 2")));
  }

  #[test]
  fn test_empty_material() {
    let interaction = Scripted::new(Vec::new());
    study_flashcards(&interaction, Vec::new()).unwrap();
    take_quiz(&interaction, Vec::new()).unwrap();
    assert_eq!(*interaction.shown.borrow(), vec![
      "There are no flashcards to study",
      "There are no questions in this quiz"
    ]);
  }
}
