use studydeck::{
  pdf::{PDFExtractor, Upload},
  store::{Add, Query},
};

use super::*;

#[traced_test]
#[test]
fn test_upload_extract_and_reload() -> TestResult {
  let (mut store, dir) = create_test_store();
  let upload = Upload::new("lecture.pdf", "application/pdf", build_pdf(&["Hello", "World"]));

  let text = PDFExtractor::new().extract(&upload)?;
  assert_eq!(text, "Hello \n\nWorld");

  let document = Document::pdf(&upload.name).with_content(text);
  let id = Add::document(document.clone()).execute(&mut store)?;
  drop(store);

  let mut store = reopen_store(&dir);
  let found = Query::by_id(&id).execute(&mut store)?;
  assert_eq!(found, vec![document]);
  assert_eq!(found[0].content.as_deref(), Some("Hello \n\nWorld"));
  Ok(())
}

#[test]
fn test_upload_from_disk() -> TestResult {
  let dir = tempdir()?;
  let path = dir.path().join("notes.pdf");
  std::fs::write(&path, build_pdf(&["Mitochondria"]))?;

  let upload = Upload::from_path(&path)?;
  assert_eq!(upload.media_type, "application/pdf");
  assert_eq!(PDFExtractor::new().extract(&upload)?, "Mitochondria");
  Ok(())
}

#[test]
fn test_rejected_upload_leaves_store_untouched() -> TestResult {
  let (mut store, _dir) = create_test_store();
  let upload = Upload::new("notes.docx", "application/msword", build_pdf(&["Hello"]));

  let result = PDFExtractor::new().extract(&upload);
  assert!(matches!(result, Err(StudyError::UnsupportedMediaType(_))));
  assert!(Query::all().execute(&mut store)?.is_empty());
  Ok(())
}
