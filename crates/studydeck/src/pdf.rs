//! PDF upload validation and text extraction.
//!
//! An [`Upload`] is the raw file as the user handed it over: a name, the media type it
//! was declared with, and its bytes. [`PDFExtractor`] turns an upload into plain text by
//! walking the pages in order:
//!
//! - text recovered from one page is joined into a single line with spaces
//! - pages are separated by a blank line (`"\n\n"`)
//! - the result is trimmed
//!
//! Extraction is all or nothing. A corrupt or unreadable file produces an error and no
//! partial text.
//!
//! # Examples
//!
//! ```no_run
//! use studydeck::pdf::{PDFExtractor, Upload};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let upload = Upload::from_path("lecture-01.pdf")?;
//! let content = PDFExtractor::new().extract_content(&upload)?;
//!
//! if let Some(title) = &content.metadata.title {
//!   println!("Title: {title}");
//! }
//! println!("{} pages", content.pages.len());
//! println!("{}", content.text());
//! # Ok(())
//! # }
//! ```

use lopdf::{Dictionary, Object};

use super::*;

/// The only media type accepted for extraction.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A file handed over for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
  /// File name, used as the document name
  pub name:       String,
  /// Declared media type, e.g. `application/pdf`
  pub media_type: String,
  /// Raw file contents
  pub bytes:      Vec<u8>,
}

impl Upload {
  /// Creates an upload from its parts.
  pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
    Self { name: name.into(), media_type: media_type.into(), bytes }
  }

  /// Reads a file from disk, guessing its media type from the extension.
  ///
  /// Files with an unknown extension are declared as `application/octet-stream` and will
  /// be rejected by the extractor.
  ///
  /// # Errors
  ///
  /// Returns [`StudyError::Path`] if the file cannot be read.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| path.display().to_string());
    let media_type = mime_guess::from_path(path).first_or_octet_stream().essence_str().to_string();
    trace!("Read {} bytes from {} as {media_type}", bytes.len(), path.display());
    Ok(Self { name, media_type, bytes })
  }

  /// Whether the declared media type is `application/pdf`, ignoring parameters and case.
  pub fn is_pdf(&self) -> bool {
    self
      .media_type
      .split(';')
      .next()
      .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
  }
}

/// Everything recovered from a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PDFContent {
  /// Document information dictionary entries
  pub metadata: PDFMetadata,
  /// Text of each page, in page order
  pub pages:    Vec<PageContent>,
}

impl PDFContent {
  /// The plain text of the whole document: pages separated by blank lines, trimmed.
  pub fn text(&self) -> String {
    self.pages.iter().map(|page| page.text.as_str()).collect::<Vec<_>>().join("\n\n").trim().to_string()
  }
}

/// Entries of the PDF's document information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PDFMetadata {
  /// Document title
  pub title:    Option<String>,
  /// Author
  pub author:   Option<String>,
  /// Subject
  pub subject:  Option<String>,
  /// Keywords, as one string
  pub keywords: Option<String>,
}

/// Text of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
  /// One-based page number
  pub page_number: u32,
  /// The page's text lines joined by single spaces
  pub text:        String,
}

/// Extracts plain text from PDF uploads.
#[derive(Debug, Default, Clone, Copy)]
pub struct PDFExtractor;

impl PDFExtractor {
  /// Creates an extractor.
  pub fn new() -> Self { Self }

  /// Extracts the plain text of an upload.
  ///
  /// # Errors
  ///
  /// - [`StudyError::UnsupportedMediaType`] if the upload is not declared as a PDF
  /// - [`StudyError::Pdf`] if the file cannot be parsed or a page cannot be read
  pub fn extract(&self, upload: &Upload) -> Result<String> {
    Ok(self.extract_content(upload)?.text())
  }

  /// Extracts the metadata and per-page text of an upload.
  ///
  /// # Errors
  ///
  /// Same as [`PDFExtractor::extract`].
  pub fn extract_content(&self, upload: &Upload) -> Result<PDFContent> {
    if !upload.is_pdf() {
      warn!("Rejecting upload \"{}\" declared as {}", upload.name, upload.media_type);
      return Err(StudyError::UnsupportedMediaType(upload.media_type.clone()));
    }

    let pdf = lopdf::Document::load_mem(&upload.bytes)?;
    let metadata = self.extract_metadata(&pdf);

    let mut pages = Vec::new();
    for page_number in pdf.get_pages().into_keys() {
      let raw = pdf.extract_text(&[page_number])?;
      let text = raw.split('\n').collect::<Vec<_>>().join(" ");
      pages.push(PageContent { page_number, text });
    }

    debug!("Extracted {} pages from \"{}\"", pages.len(), upload.name);
    Ok(PDFContent { metadata, pages })
  }

  /// Reads the trailer's `Info` dictionary. Missing or malformed entries are left empty.
  fn extract_metadata(&self, pdf: &lopdf::Document) -> PDFMetadata {
    let info = match pdf.trailer.get(b"Info") {
      Ok(Object::Reference(id)) => pdf.get_object(*id).and_then(Object::as_dict).ok(),
      Ok(Object::Dictionary(dict)) => Some(dict),
      _ => None,
    };
    let Some(info) = info else {
      trace!("PDF has no document information dictionary");
      return PDFMetadata::default();
    };

    PDFMetadata {
      title:    text_entry(info, "Title"),
      author:   text_entry(info, "Author"),
      subject:  text_entry(info, "Subject"),
      keywords: text_entry(info, "Keywords"),
    }
  }
}

/// Decodes a text string entry, honoring a UTF-16BE byte order mark.
fn text_entry(dict: &Dictionary, key: &str) -> Option<String> {
  let bytes = dict.get(key.as_bytes()).ok()?.as_str().ok()?;
  let text = match bytes.strip_prefix(&[0xFE, 0xFF]) {
    Some(utf16) => encoding_rs::UTF_16BE.decode_without_bom_handling(utf16).0.into_owned(),
    None => String::from_utf8_lossy(bytes).into_owned(),
  };
  Some(text).filter(|text| !text.trim().is_empty())
}
