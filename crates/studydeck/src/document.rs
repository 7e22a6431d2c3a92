//! Durable entities of the study deck: documents and the folders that group them.
//!
//! Documents and folders are the only things that survive a restart. Everything
//! generated from a document (flashcards, quizzes, summaries) is recomputed on
//! demand and lives in [`generate`](crate::generate).
//!
//! Both types serialize with camelCase field names and store their creation
//! time as RFC 3339 text with millisecond precision, e.g.
//!
//! ```json
//! {
//!   "id": "6f2c...",
//!   "name": "lecture-01.pdf",
//!   "type": "pdf",
//!   "tags": ["biology"],
//!   "createdAt": "2024-01-01T09:30:00.123Z",
//!   "folderId": null,
//!   "content": "Cells are the basic unit of life ..."
//! }
//! ```
//!
//! # Examples
//!
//! ```
//! use studydeck::document::{Document, Folder};
//!
//! let folder = Folder::new("Biology");
//! let mut document = Document::pdf("cells.pdf").with_folder(&folder.id);
//!
//! assert!(document.add_tag("exam").unwrap());
//! assert!(!document.add_tag("exam").unwrap());
//! assert_eq!(document.tags, vec!["exam"]);
//! ```

use chrono::SubsecRound;
use uuid::Uuid;

use super::*;

/// Creates a fresh identifier for a document or folder.
pub fn new_id() -> String { Uuid::new_v4().to_string() }

/// The current time truncated to whole milliseconds, the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }

/// The kind of file a document was created from.
///
/// Only PDFs can be uploaded, so this is a fixed tag kept for the storage layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
  /// A PDF upload
  #[default]
  Pdf,
}

impl Display for DocumentType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DocumentType::Pdf => write!(f, "pdf"),
    }
  }
}

/// An uploaded document and, once extracted, its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  /// Unique identifier
  pub id:            String,
  /// Display name, usually the uploaded file name
  pub name:          String,
  /// Kind of source file
  #[serde(rename = "type")]
  pub document_type: DocumentType,
  /// Tags in insertion order, without duplicates
  #[serde(default)]
  pub tags:          Vec<String>,
  /// When the document was added
  #[serde(with = "timestamp")]
  pub created_at:    DateTime<Utc>,
  /// Folder holding the document, `None` for the root
  #[serde(default)]
  pub folder_id:     Option<String>,
  /// Extracted text
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content:       Option<String>,
}

impl Document {
  /// Creates a PDF document at the root with a fresh identifier and no tags.
  pub fn pdf(name: impl Into<String>) -> Self {
    Self {
      id:            new_id(),
      name:          name.into(),
      document_type: DocumentType::Pdf,
      tags:          Vec::new(),
      created_at:    now(),
      folder_id:     None,
      content:       None,
    }
  }

  /// Sets the extracted text.
  pub fn with_content(mut self, content: impl Into<String>) -> Self {
    self.content = Some(content.into());
    self
  }

  /// Places the document in a folder.
  pub fn with_folder(mut self, folder_id: impl Into<String>) -> Self {
    self.folder_id = Some(folder_id.into());
    self
  }

  /// Adds a tag unless the document already carries it.
  ///
  /// Tags are trimmed first. Returns whether the tag set changed.
  ///
  /// # Errors
  ///
  /// Returns [`StudyError::InvalidTag`] if the tag is empty after trimming.
  pub fn add_tag(&mut self, tag: &str) -> Result<bool> {
    let tag = normalize_tag(tag)?;
    if self.tags.contains(&tag) {
      return Ok(false);
    }
    self.tags.push(tag);
    Ok(true)
  }

  /// Removes a tag. Returns whether the tag was present.
  pub fn remove_tag(&mut self, tag: &str) -> bool {
    let before = self.tags.len();
    self.tags.retain(|t| t != tag.trim());
    self.tags.len() != before
  }

  /// Whether the document is directly inside `folder_id` (`None` meaning the root).
  pub fn is_in(&self, folder_id: Option<&str>) -> bool { self.folder_id.as_deref() == folder_id }
}

/// A named node of the folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
  /// Unique identifier
  pub id:        String,
  /// Display name
  pub name:      String,
  /// Parent folder, `None` for a top-level folder
  #[serde(default)]
  pub parent_id: Option<String>,
}

impl Folder {
  /// Creates a top-level folder with a fresh identifier.
  pub fn new(name: impl Into<String>) -> Self {
    Self { id: new_id(), name: name.into(), parent_id: None }
  }

  /// Nests the folder under `parent_id`.
  pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
    self.parent_id = Some(parent_id.into());
    self
  }
}

/// A partial update of a [`Document`].
///
/// Fields left as `None` are not touched.
///
/// ```
/// use studydeck::document::{Document, DocumentUpdate};
///
/// let mut document = Document::pdf("draft.pdf");
/// DocumentUpdate::default().name("final.pdf").tags(["a", "b", "a"]).apply(&mut document).unwrap();
/// assert_eq!(document.name, "final.pdf");
/// assert_eq!(document.tags, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpdate {
  /// New display name
  pub name:    Option<String>,
  /// New extracted text
  pub content: Option<String>,
  /// Replacement tag list, de-duplicated on apply
  pub tags:    Option<Vec<String>>,
}

impl DocumentUpdate {
  /// Renames the document.
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Replaces the extracted text.
  pub fn content(mut self, content: impl Into<String>) -> Self {
    self.content = Some(content.into());
    self
  }

  /// Replaces the tags.
  pub fn tags<I, S>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>, {
    self.tags = Some(tags.into_iter().map(Into::into).collect());
    self
  }

  /// Whether applying the update would change nothing.
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.content.is_none() && self.tags.is_none()
  }

  /// Applies the update to `document`.
  ///
  /// # Errors
  ///
  /// Returns [`StudyError::InvalidTag`] if any replacement tag is empty. The document is
  /// left untouched in that case.
  pub fn apply(&self, document: &mut Document) -> Result<()> {
    let tags = match &self.tags {
      Some(tags) => {
        let mut unique: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
          let tag = normalize_tag(tag)?;
          if !unique.contains(&tag) {
            unique.push(tag);
          }
        }
        Some(unique)
      },
      None => None,
    };

    if let Some(name) = &self.name {
      document.name = name.clone();
    }
    if let Some(content) = &self.content {
      document.content = Some(content.clone());
    }
    if let Some(tags) = tags {
      document.tags = tags;
    }
    Ok(())
  }
}

/// Trims a tag and rejects it when nothing is left.
fn normalize_tag(tag: &str) -> Result<String> {
  let tag = tag.trim();
  if tag.is_empty() {
    return Err(StudyError::InvalidTag);
  }
  Ok(tag.to_string())
}

/// Serde adapter storing timestamps as RFC 3339 text with millisecond precision.
pub mod timestamp {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer};

  /// Writes `value` as e.g. `2024-01-01T09:30:00.123Z`.
  pub fn serialize<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
  ) -> core::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
  }

  /// Reads any RFC 3339 timestamp and converts it to UTC.
  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> core::result::Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
      .map(|date| date.with_timezone(&Utc))
      .map_err(serde::de::Error::custom)
  }
}
