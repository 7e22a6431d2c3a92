//! Read-only queries over the document collection.

use super::*;

/// Represents different ways to select documents.
#[derive(Debug, Clone)]
pub enum QueryCriteria {
  /// Every document
  All,
  /// A single document by identifier
  Id(String),
  /// Documents directly inside a folder (`None` for the root)
  InFolder(Option<String>),
  /// Documents anywhere in a folder's subtree
  Under(String),
  /// Case-insensitive substring match on the name
  Search(String),
  /// Documents carrying at least one of the tags
  Tagged(Vec<String>),
}

impl QueryCriteria {
  /// Whether `document` satisfies the criteria. `subtree` is the folder closure for
  /// [`QueryCriteria::Under`].
  fn matches(&self, document: &Document, subtree: &BTreeSet<String>) -> bool {
    match self {
      QueryCriteria::All => true,
      QueryCriteria::Id(id) => document.id == *id,
      QueryCriteria::InFolder(folder) => document.is_in(folder.as_deref()),
      QueryCriteria::Under(_) =>
        document.folder_id.as_ref().is_some_and(|folder| subtree.contains(folder)),
      QueryCriteria::Search(term) => document.name.to_lowercase().contains(&term.to_lowercase()),
      QueryCriteria::Tagged(tags) => document.tags.iter().any(|tag| tags.contains(tag)),
    }
  }
}

/// Available fields for ordering query results
#[derive(Debug, Clone, Copy)]
pub enum OrderField {
  /// Order by document name, ignoring case
  Name,
  /// Order by creation time
  CreatedAt,
}

/// A query for retrieving documents from the store.
///
/// Results are clones in insertion order unless an ordering is requested.
///
/// ```
/// # use studydeck::{document::*, prelude::*, store::*};
/// # fn main() -> Result<(), StudyError> {
/// let mut store = DocumentStore::open(MemoryStorage::new())?;
/// Add::document(Document::pdf("Cell Biology.pdf")).execute(&mut store)?;
/// Add::document(Document::pdf("Algebra.pdf")).execute(&mut store)?;
///
/// let found = Query::search("bio").execute(&mut store)?;
/// assert_eq!(found.len(), 1);
///
/// let sorted = Query::all().order_by(OrderField::Name).execute(&mut store)?;
/// assert_eq!(sorted[0].name, "Algebra.pdf");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Query {
  /// Which documents to return
  criteria:   QueryCriteria,
  /// Optional result ordering
  order_by:   Option<OrderField>,
  /// Reverse the ordering
  descending: bool,
}

impl Query {
  /// Creates a new query with the given criteria
  pub fn new(criteria: QueryCriteria) -> Self { Self { criteria, order_by: None, descending: false } }

  /// Creates a query that returns all documents
  pub fn all() -> Self { Self::new(QueryCriteria::All) }

  /// Creates a query for one document
  pub fn by_id(id: impl Into<String>) -> Self { Self::new(QueryCriteria::Id(id.into())) }

  /// Creates a query for the documents directly in `folder`
  pub fn in_folder(folder: Option<&str>) -> Self {
    Self::new(QueryCriteria::InFolder(folder.map(str::to_string)))
  }

  /// Creates a query for the documents anywhere below `folder`
  pub fn under(folder: impl Into<String>) -> Self { Self::new(QueryCriteria::Under(folder.into())) }

  /// Creates a case-insensitive name search
  pub fn search(term: impl Into<String>) -> Self { Self::new(QueryCriteria::Search(term.into())) }

  /// Creates a query for documents with any of `tags`
  pub fn tagged<I, S>(tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>, {
    Self::new(QueryCriteria::Tagged(tags.into_iter().map(Into::into).collect()))
  }

  /// Sets the field to order results by
  pub fn order_by(mut self, field: OrderField) -> Self {
    self.order_by = Some(field);
    self
  }

  /// Sets the order to descending (default is ascending)
  pub fn descending(mut self) -> Self {
    self.descending = true;
    self
  }
}

impl StoreInstruction for Query {
  type Output = Vec<Document>;

  fn execute(&self, store: &mut DocumentStore) -> Result<Self::Output> {
    let subtree = match &self.criteria {
      QueryCriteria::Under(folder) => store.tree().descendants(folder),
      _ => BTreeSet::new(),
    };

    let mut documents: Vec<Document> = store
      .documents()
      .iter()
      .filter(|document| self.criteria.matches(document, &subtree))
      .cloned()
      .collect();

    if let Some(field) = self.order_by {
      match field {
        OrderField::Name => documents.sort_by_key(|document| document.name.to_lowercase()),
        OrderField::CreatedAt => documents.sort_by_key(|document| document.created_at),
      }
    }
    if self.descending {
      documents.reverse();
    }

    trace!("Query {:?} matched {} documents", self.criteria, documents.len());
    Ok(documents)
  }
}
