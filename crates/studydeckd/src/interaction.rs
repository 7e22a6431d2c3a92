//! Prompts and output for the terminal.
//!
//! Commands never print directly. They describe what to show with a [`ResponseContent`]
//! and ask questions through [`UserInteraction`], so the same command code runs against
//! an interactive terminal or, with `--accept-defaults`, without any prompts at all.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use studydeck::{
  document::{Document, Folder},
  generate::{Flashcard, QuizQuestion},
  view::{Face, Feedback, FlashcardViewer, QuizSession, Row, Score},
};

use super::*;

/// Something a command wants to show.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Details of one document and the folders leading to it
  Document {
    /// The document
    document: &'a Document,
    /// Folders from the top level down to the one holding the document
    path:     &'a [&'a Folder],
  },
  /// The folder tree as display rows
  Tree(&'a [Row<'a>]),
  /// Generated flashcards, fronts and backs
  Flashcards(&'a [Flashcard]),
  /// Generated quiz questions with their answers
  Quiz(&'a [QuizQuestion]),
  /// A generated markdown summary
  Summary(&'a str),
  /// The current card of a study session
  Card(&'a FlashcardViewer),
  /// The current question of a quiz
  Question(&'a QuizSession),
  /// What to show under an answered question
  Feedback(Feedback<'a>),
  /// The result of a submitted quiz
  Score(Score),
  /// Something worked
  Success(&'a str),
  /// Something failed but the command carries on
  Failure(&'a str),
  /// Something worth noticing
  Warning(&'a str),
  /// Plain information
  Info(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;

  /// Asks the user to type `word` to go ahead with something destructive.
  fn confirm_typed(&self, message: &str, word: &str) -> Result<bool>;

  /// Lets the user pick one of `items`, returning its index.
  fn select(&self, message: &str, items: &[String]) -> Result<usize>;

  /// Shows something.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// The interactive terminal.
///
/// With `accept_defaults` every confirmation is answered yes and every selection picks
/// the first item, without drawing a prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal {
  /// Answer every prompt with its default
  accept_defaults: bool,
}

impl Terminal {
  /// A terminal that prompts unless `accept_defaults` is set.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }

  /// The dialoguer theme with the prompt prefix.
  fn theme() -> ColorfulTheme {
    ColorfulTheme { prompt_prefix: style(PROMPT_PREFIX.trim().to_string()).cyan(), ..Default::default() }
  }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      trace!("Accepting default for: {message}");
      return Ok(true);
    }
    Ok(Confirm::with_theme(&Self::theme()).with_prompt(message).default(false).interact()?)
  }

  fn confirm_typed(&self, message: &str, word: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    let input = Input::<String>::with_theme(&Self::theme())
      .with_prompt(format!("{message} Type {} to confirm", style(word).red().bold()))
      .allow_empty(true)
      .interact_text()?;
    Ok(input == word)
  }

  fn select(&self, message: &str, items: &[String]) -> Result<usize> {
    if self.accept_defaults {
      return Ok(0);
    }
    Ok(Select::with_theme(&Self::theme()).with_prompt(message).items(items).default(0).interact()?)
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Document { document, path } => print_document(document, path),
      ResponseContent::Tree(rows) => print_tree(rows),
      ResponseContent::Flashcards(cards) => print_flashcards(cards),
      ResponseContent::Quiz(questions) => print_quiz(questions),
      ResponseContent::Summary(summary) => println!("{summary}"),
      ResponseContent::Card(viewer) => print_card(viewer),
      ResponseContent::Question(session) => print_question(session),
      ResponseContent::Feedback(feedback) => print_feedback(&feedback),
      ResponseContent::Score(score) =>
        println!("{} Score: {}", style(SUCCESS_PREFIX).green(), style(score).bold()),
      ResponseContent::Success(message) => println!("{} {message}", style(SUCCESS_PREFIX).green()),
      ResponseContent::Failure(message) => println!("{} {message}", style(ERROR_PREFIX).red()),
      ResponseContent::Warning(message) =>
        println!("{} {message}", style(WARNING_PREFIX).yellow()),
      ResponseContent::Info(message) => println!("{} {message}", style(INFO_PREFIX).cyan()),
    }
    Ok(())
  }
}

/// The first characters of an identifier, enough to pick it out on the command line.
pub fn short_id(id: &str) -> &str { id.get(..8).unwrap_or(id) }

/// Tags rendered as `#tag #other`.
fn format_tags(tags: &[String]) -> String {
  tags.iter().map(|tag| format!("#{tag}")).collect::<Vec<_>>().join(" ")
}

/// Prints document details.
fn print_document(document: &Document, path: &[&Folder]) {
  let location = if path.is_empty() {
    "(root)".to_string()
  } else {
    path.iter().map(|folder| folder.name.as_str()).collect::<Vec<_>>().join(" / ")
  };
  let content = document.content.as_deref().unwrap_or_default();

  println!("{} {}", style(INFO_PREFIX).cyan(), style(&document.name).bold());
  println!("{CONTINUE_PREFIX}{}  {}", style("id    ").dim(), document.id);
  println!("{CONTINUE_PREFIX}{}  {}", style("type  ").dim(), document.document_type);
  println!("{CONTINUE_PREFIX}{}  {}", style("folder").dim(), location);
  if !document.tags.is_empty() {
    println!("{CONTINUE_PREFIX}{}  {}", style("tags  ").dim(), style(format_tags(&document.tags)).cyan());
  }
  println!(
    "{CONTINUE_PREFIX}{}  {}",
    style("added ").dim(),
    document.created_at.format("%Y-%m-%d %H:%M:%S UTC")
  );
  println!("{TREE_LEAF}─ {} words", content.split_whitespace().count());

  let preview: String = content.chars().take(280).collect();
  if !preview.is_empty() {
    println!();
    println!("{}", style(preview.replace('\n', " ")).dim());
  }
}

/// Whether the row at `index` is the last among its siblings.
fn is_last_sibling(rows: &[Row<'_>], index: usize) -> bool {
  let depth = row_depth(&rows[index]);
  rows[index + 1..].iter().map(row_depth).find(|next| *next <= depth).map_or(true, |next| next < depth)
}

/// Nesting depth of a row.
fn row_depth(row: &Row<'_>) -> usize {
  match row {
    Row::Folder { depth, .. } | Row::Document { depth, .. } => *depth,
  }
}

/// Prints the folder tree.
fn print_tree(rows: &[Row<'_>]) {
  for (index, row) in rows.iter().enumerate() {
    let indent = CONTINUE_PREFIX.repeat(row_depth(row));
    let branch = if is_last_sibling(rows, index) { TREE_LEAF } else { TREE_BRANCH };
    match row {
      Row::Folder { folder, .. } =>
        println!("{indent}{branch}─ {}/", style(&folder.name).blue().bold()),
      Row::Document { document, .. } => {
        let tags = format_tags(&document.tags);
        println!(
          "{indent}{branch}─ {} {} {}",
          document.name,
          style(short_id(&document.id)).dim(),
          style(tags).cyan()
        );
      },
    }
  }
}

/// Prints numbered flashcards.
fn print_flashcards(cards: &[Flashcard]) {
  for (i, card) in cards.iter().enumerate() {
    println!("{} {}", style(format!("{:>2}.", i + 1)).dim(), style(&card.front).bold());
    println!("    {TREE_LEAF}─ {}", card.back);
  }
}

/// Letter shown before an option.
fn option_label(index: usize) -> char { (b'A' + (index % 26) as u8) as char }

/// Prints quiz questions with the correct option marked.
fn print_quiz(questions: &[QuizQuestion]) {
  for (i, question) in questions.iter().enumerate() {
    println!("{} {}", style(format!("{:>2}.", i + 1)).dim(), style(&question.question).bold());
    for (j, option) in question.options.iter().enumerate() {
      if *option == question.correct_answer {
        println!("    {} {} {}", option_label(j), style(option).green(), style(SUCCESS_PREFIX).green());
      } else {
        println!("    {} {option}", option_label(j));
      }
    }
    println!("    {TREE_LEAF}─ {}", style(&question.explanation).dim());
  }
}

/// Prints the visible face of the current card.
fn print_card(viewer: &FlashcardViewer) {
  let Some(text) = viewer.visible_text() else { return };
  let face = match viewer.face() {
    Face::Front => "front",
    Face::Back => "back",
  };
  println!();
  println!("{} {} {}", style(INFO_PREFIX).cyan(), viewer.progress(), style(format!("({face})")).dim());
  println!("{TREE_VERT}");
  println!("{TREE_LEAF}─ {}", style(text).bold());
}

/// Prints the current question without its options, which the selection shows.
fn print_question(session: &QuizSession) {
  let Some(question) = session.current() else { return };
  println!(
    "{} Question {} of {}",
    style(INFO_PREFIX).cyan(),
    session.index() + 1,
    session.len()
  );
  println!("{TREE_LEAF}─ {}", style(&question.question).bold());
}

/// Prints the feedback under an answered question.
fn print_feedback(feedback: &Feedback<'_>) {
  match feedback {
    Feedback::Explanation(explanation) => println!("{CONTINUE_PREFIX}{}", style(explanation).dim()),
    Feedback::Correct(explanation) => {
      println!("{} Correct", style(SUCCESS_PREFIX).green());
      println!("{CONTINUE_PREFIX}{}", style(explanation).dim());
    },
    Feedback::Incorrect { correct_answer, explanation } => {
      println!("{} Incorrect, the answer is {}", style(ERROR_PREFIX).red(), style(correct_answer).green());
      println!("{CONTINUE_PREFIX}{}", style(explanation).dim());
    },
  }
}
