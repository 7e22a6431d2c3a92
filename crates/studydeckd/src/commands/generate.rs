//! Module for generating study material from a stored document.

use studydeck::{
  generate::{Gateway, GenerationKind},
  view::{Artifact, Dashboard},
};

use super::*;

/// What to generate
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenerateTarget {
  /// Question and answer cards
  Flashcards,
  /// Multiple-choice questions
  Quiz,
  /// A markdown summary
  Summary,
  /// All three at once
  #[default]
  All,
}

impl GenerateTarget {
  /// The kinds this target asks for.
  pub fn kinds(&self) -> Vec<GenerationKind> {
    match self {
      GenerateTarget::Flashcards => vec![GenerationKind::Flashcards],
      GenerateTarget::Quiz => vec![GenerationKind::Quiz],
      GenerateTarget::Summary => vec![GenerationKind::Summary],
      GenerateTarget::All => GenerationKind::ALL.to_vec(),
    }
  }
}

/// Options for [`Commands::Generate`]
#[derive(Args, Clone)]
pub struct GenerateOptions {
  /// Document id, id prefix or name
  pub document: String,

  /// What to generate
  #[arg(value_enum, default_value_t = GenerateTarget::All)]
  pub target: GenerateTarget,
}

/// The text of a document, or an error if there is nothing to generate from.
pub fn document_text(document: &Document) -> Result<&str> {
  document
    .content
    .as_deref()
    .filter(|content| !content.trim().is_empty())
    .ok_or_else(|| StudydeckdError::NoContent(document.name.clone()))
}

/// Runs one generation round for `target` against `gateway`.
///
/// Kinds that were not requested stay [`Artifact::Loading`].
pub async fn run_round<M: CompletionModel>(
  gateway: &Gateway<M>,
  text: &str,
  target: GenerateTarget,
) -> Dashboard {
  let mut dashboard = Dashboard::new();
  let ticket = dashboard.begin(text);
  match target {
    GenerateTarget::Flashcards => {
      dashboard.apply_flashcards(ticket, gateway.flashcards(text).await);
    },
    GenerateTarget::Quiz => {
      dashboard.apply_quiz(ticket, gateway.quiz(text).await);
    },
    GenerateTarget::Summary => {
      dashboard.apply_summary(ticket, gateway.summary(text).await);
    },
    GenerateTarget::All => {
      dashboard.apply_all(ticket, gateway.generate_all(text).await);
    },
  }
  dashboard
}

/// Function for the [`Commands::Generate`] in the CLI.
pub async fn generate<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  generate_options: GenerateOptions,
) -> Result<()> {
  let GenerateOptions { document, target } = generate_options;
  let store = open_store(config)?;
  let document = resolve(store.documents(), &document)?;
  let text = document_text(document)?;

  let gateway = Gateway::new(config.chat_client()?);
  interaction.reply(ResponseContent::Info(&format!(
    "Generating {} for {} with {}",
    target_label(target),
    document.name,
    gateway.model().model()
  )))?;
  let dashboard = run_round(&gateway, text, target).await;

  let mut failed = Vec::new();
  for kind in target.kinds() {
    let outcome = match kind {
      GenerationKind::Flashcards => show_artifact(interaction, kind, dashboard.flashcards(), |cards| {
        ResponseContent::Flashcards(cards)
      })?,
      GenerationKind::Quiz =>
        show_artifact(interaction, kind, dashboard.quiz(), |quiz| ResponseContent::Quiz(quiz))?,
      GenerationKind::Summary => show_artifact(interaction, kind, dashboard.summary(), |summary| {
        ResponseContent::Summary(summary)
      })?,
    };
    if !outcome {
      failed.push(kind);
    }
  }

  if failed.len() == target.kinds().len() {
    return Err(StudydeckdError::Generation(failed));
  }
  Ok(())
}

/// Human readable name of a target.
fn target_label(target: GenerateTarget) -> &'static str {
  match target {
    GenerateTarget::Flashcards => "flashcards",
    GenerateTarget::Quiz => "a quiz",
    GenerateTarget::Summary => "a summary",
    GenerateTarget::All => "flashcards, a quiz and a summary",
  }
}

/// Prints one artifact under a heading. Returns whether it was generated.
fn show_artifact<I: UserInteraction, T>(
  interaction: &I,
  kind: GenerationKind,
  artifact: &Artifact<T>,
  content: impl for<'a> Fn(&'a T) -> ResponseContent<'a>,
) -> Result<bool> {
  match artifact {
    Artifact::Ready(value) => {
      interaction.reply(ResponseContent::Success(&format!("Generated {kind}")))?;
      interaction.reply(content(value))?;
      Ok(true)
    },
    Artifact::Failed(reason) => {
      interaction.reply(ResponseContent::Failure(&format!("Failed to generate {kind}: {reason}")))?;
      Ok(false)
    },
    Artifact::Idle | Artifact::Loading => Ok(false),
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use async_trait::async_trait;

  use super::*;

  /// Answers with canned output and records which prompts it saw.
  struct CannedModel {
    prompts: Mutex<Vec<String>>,
  }

  #[async_trait]
  impl CompletionModel for CannedModel {
    async fn complete(&self, prompt: &str) -> core::result::Result<String, StudyError> {
      self.prompts.lock().unwrap().push(prompt.to_string());
      if prompt.starts_with("Create flashcards") {
        Ok(r#"[{"front": "ATP", "back": "Energy currency"}]"#.to_string())
      } else if prompt.starts_with("Create a quiz") {
        Ok("Sorry, no quiz today".to_string())
      } else {
        Ok("## Summary".to_string())
      }
    }
  }

  fn gateway() -> Gateway<CannedModel> { Gateway::new(CannedModel { prompts: Mutex::default() }) }

  #[tokio::test]
  async fn test_single_kind_round() {
    let gateway = gateway();
    let dashboard = run_round(&gateway, "text", GenerateTarget::Summary).await;
    assert_eq!(dashboard.summary().value().map(String::as_str), Some("## Summary"));
    assert!(dashboard.flashcards().is_loading());
    assert_eq!(gateway.model().prompts.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_full_round() {
    let gateway = gateway();
    let dashboard = run_round(&gateway, "text", GenerateTarget::All).await;
    assert_eq!(dashboard.flashcards().value().map(Vec::len), Some(1));
    assert!(matches!(dashboard.quiz(), Artifact::Failed(_)));
    assert!(!dashboard.is_generating());
    assert_eq!(gateway.model().prompts.lock().unwrap().len(), 3);
  }

  #[test]
  fn test_document_text() {
    assert!(matches!(
      document_text(&Document::pdf("empty.pdf").with_content("  \n")),
      Err(StudydeckdError::NoContent(name)) if name == "empty.pdf"
    ));
    assert!(document_text(&Document::pdf("none.pdf")).is_err());
    assert_eq!(document_text(&Document::pdf("a.pdf").with_content("text")).unwrap(), "text");
  }

  #[test]
  fn test_target_kinds() {
    assert_eq!(GenerateTarget::All.kinds().len(), 3);
    assert_eq!(GenerateTarget::Quiz.kinds(), vec![GenerationKind::Quiz]);
  }
}
