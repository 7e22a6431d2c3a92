use studydeck::{
  document::DocumentUpdate,
  store::{Add, Move, OrderField, Query, Remove, Tag, Update},
  view::{Explorer, Row},
};

use super::*;

#[test]
fn test_course_reorganization() -> TestResult {
  let (mut store, dir) = create_test_store();

  let biology = Folder::new("Biology");
  let cells = Folder::new("Cells").with_parent(&biology.id);
  let archive = Folder::new("Archive");
  for folder in [&biology, &cells, &archive] {
    Add::folder(folder.clone()).execute(&mut store)?;
  }

  let membranes = Document::pdf("membranes.pdf").with_folder(&cells.id);
  let genetics = Document::pdf("genetics.pdf").with_folder(&biology.id);
  Add::document(membranes.clone()).execute(&mut store)?;
  Add::document(genetics.clone()).execute(&mut store)?;
  Tag::add(&membranes.id, "exam").execute(&mut store)?;

  // Cycles are refused, legal moves persist
  assert!(matches!(
    Move::folder(&biology.id, Some(&cells.id)).execute(&mut store),
    Err(StudyError::CircularFolder { .. })
  ));
  Move::folder(&cells.id, Some(&archive.id)).execute(&mut store)?;
  Update::folder(&archive.id, "Old courses").execute(&mut store)?;
  Update::document(&genetics.id, DocumentUpdate::default().name("Genetics 101.pdf"))
    .execute(&mut store)?;

  let mut store = {
    drop(store);
    reopen_store(&dir)
  };
  assert_eq!(store.folder(&cells.id).unwrap().parent_id.as_deref(), Some(archive.id.as_str()));
  assert_eq!(store.folder(&archive.id).unwrap().name, "Old courses");
  assert_eq!(store.document(&membranes.id).unwrap().tags, vec!["exam"]);

  let under_archive = Query::under(&archive.id).execute(&mut store)?;
  assert_eq!(under_archive.len(), 1);
  assert_eq!(under_archive[0].id, membranes.id);

  // Removing the archive keeps its documents at the root
  let removal = Remove::folder(&archive.id).execute(&mut store)?;
  assert_eq!(removal.folders.len(), 2);
  assert_eq!(removal.reparented, vec![membranes.id.clone()]);

  let store = reopen_store(&dir);
  assert_eq!(store.folders().len(), 1);
  assert_eq!(store.document(&membranes.id).unwrap().folder_id, None);
  Ok(())
}

#[test]
fn test_explorer_over_store() -> TestResult {
  let (mut store, _dir) = create_test_store();
  let course = Folder::new("Course");
  Add::folder(course.clone()).execute(&mut store)?;
  let notes = Document::pdf("notes.pdf").with_folder(&course.id);
  Add::document(notes.clone()).execute(&mut store)?;
  Add::document(Document::pdf("Syllabus.pdf")).execute(&mut store)?;
  Tag::add(&notes.id, "exam").execute(&mut store)?;

  let mut explorer = Explorer::new();
  explorer.expand_all(&store.tree());
  explorer.toggle_tag("exam");

  let rows = explorer.rows(&store.tree());
  assert_eq!(rows.len(), 2);
  assert!(matches!(rows[0], Row::Folder { depth: 0, expanded: true, .. }));
  assert!(matches!(rows[1], Row::Document { depth: 1, document } if document.id == notes.id));

  let sorted = Query::all().order_by(OrderField::Name).execute(&mut store)?;
  assert_eq!(sorted[0].name, "notes.pdf");
  assert_eq!(store.all_tags(), vec!["exam"]);
  Ok(())
}
