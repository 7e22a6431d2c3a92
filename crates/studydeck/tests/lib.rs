use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use async_trait::async_trait;
use lopdf::{
  content::{Content, Operation},
  dictionary, Object, Stream,
};
use studydeck::{
  document::{Document, Folder},
  error::StudyError,
  prelude::*,
  store::{DocumentStore, SqliteStorage},
};
use tempfile::{tempdir, TempDir};
use tracing_test::traced_test;

mod workflows;

pub type TestResult<T = ()> = anyhow::Result<T>;

/// A store backed by a SQLite file in a fresh temporary directory.
pub fn create_test_store() -> (DocumentStore, TempDir) {
  let dir = tempdir().unwrap();
  let store = DocumentStore::open(SqliteStorage::open(dir.path().join("studydeck.db")).unwrap())
    .unwrap();
  (store, dir)
}

/// Reopens the store kept in `dir` by [`create_test_store`].
pub fn reopen_store(dir: &TempDir) -> DocumentStore {
  DocumentStore::open(SqliteStorage::open(dir.path().join("studydeck.db")).unwrap()).unwrap()
}

/// Builds a PDF with one page per entry of `pages`.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
  let mut pdf = lopdf::Document::with_version("1.5");
  let pages_id = pdf.new_object_id();
  let font_id = pdf.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Helvetica",
    "Encoding" => "WinAnsiEncoding",
  });
  let resources_id = pdf.add_object(dictionary! { "Font" => dictionary! { "F1" => font_id } });

  let mut kids: Vec<Object> = Vec::new();
  for text in pages {
    let content = Content {
      operations: vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 24.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
        Operation::new("Tj", vec![Object::string_literal(*text)]),
        Operation::new("ET", vec![]),
      ],
    };
    let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = pdf.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
      "Resources" => resources_id,
    });
    kids.push(page_id.into());
  }
  pdf.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => pages.len() as i64,
      "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    }),
  );
  let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
  pdf.trailer.set("Root", catalog_id);

  let mut bytes = Vec::new();
  pdf.save_to(&mut bytes).unwrap();
  bytes
}

/// A completion model answering by prompt kind, counting its calls.
#[derive(Default)]
pub struct StubModel {
  pub flashcards: Option<String>,
  pub quiz:       Option<String>,
  pub summary:    Option<String>,
  pub calls:      Arc<AtomicUsize>,
}

impl StubModel {
  /// A model that answers every kind with valid output.
  pub fn valid() -> Self {
    Self {
      flashcards: Some(
        r#"[{"front": "What do mitochondria produce?", "back": "ATP"},
            {"front": "Osmosis", "back": "Diffusion of water"}]"#
          .to_string(),
      ),
      quiz: Some(quiz_json(5)),
      summary: Some("## Overview\nCells make energy.".to_string()),
      calls: Arc::default(),
    }
  }
}

#[async_trait]
impl CompletionModel for StubModel {
  async fn complete(&self, prompt: &str) -> Result<String, StudyError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let answer = if prompt.starts_with("Create flashcards") {
      &self.flashcards
    } else if prompt.starts_with("Create a quiz") {
      &self.quiz
    } else {
      &self.summary
    };
    answer.clone().ok_or_else(|| StudyError::ApiError("503 Service Unavailable".to_string()))
  }
}

/// `n` questions whose correct answer is always `"B"`.
pub fn quiz_json(n: usize) -> String {
  let questions: Vec<serde_json::Value> = (1..=n)
    .map(|i| {
      serde_json::json!({
        "question": format!("Question {i}"),
        "options": ["A", "B", "C", "D"],
        "correctAnswer": "B",
        "explanation": format!("Because of fact {i}.")
      })
    })
    .collect();
  serde_json::to_string(&questions).unwrap()
}
