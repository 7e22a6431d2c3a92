//! Browsing the folder tree with search and tag filters.

use super::*;
use crate::store::FolderTree;

/// One line of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row<'a> {
  /// A folder and whether it is expanded
  Folder {
    /// Nesting depth, zero for top-level folders
    depth:    usize,
    /// The folder
    folder:   &'a Folder,
    /// Whether its contents are listed below it
    expanded: bool,
  },
  /// A document
  Document {
    /// Nesting depth, zero for documents at the root
    depth:    usize,
    /// The document
    document: &'a Document,
  },
}

/// Explorer state: which folders are open and which documents pass the filters.
///
/// A document is visible when its name contains the search term, ignoring case, and,
/// if any tags are selected, it carries at least one of them.
///
/// ```
/// use studydeck::{document::Document, view::Explorer};
///
/// let mut cells = Document::pdf("Cell Biology.pdf");
/// cells.add_tag("bio").unwrap();
/// let algebra = Document::pdf("Algebra.pdf");
/// let documents = vec![cells, algebra];
///
/// let mut explorer = Explorer::new();
/// explorer.set_search("CELL");
/// assert_eq!(explorer.visible_documents(&documents).len(), 1);
///
/// explorer.set_search("");
/// explorer.toggle_tag("bio");
/// assert_eq!(explorer.visible_documents(&documents)[0].name, "Cell Biology.pdf");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Explorer {
  /// Identifiers of open folders
  expanded:      BTreeSet<String>,
  /// Case-insensitive name filter
  search:        String,
  /// Tags of which a document needs at least one
  selected_tags: BTreeSet<String>,
}

impl Explorer {
  /// An explorer with everything collapsed and no filters.
  pub fn new() -> Self { Self::default() }

  /// Opens or closes a folder. Returns whether it is now open.
  pub fn toggle_folder(&mut self, folder_id: &str) -> bool {
    if self.expanded.remove(folder_id) {
      false
    } else {
      self.expanded.insert(folder_id.to_string());
      true
    }
  }

  /// Whether a folder is open.
  pub fn is_expanded(&self, folder_id: &str) -> bool { self.expanded.contains(folder_id) }

  /// Opens every folder of `tree`.
  pub fn expand_all(&mut self, tree: &FolderTree<'_>) {
    for node in tree.nodes() {
      self.expand_subtree(&node);
    }
  }

  /// Opens a node and everything below it.
  fn expand_subtree(&mut self, node: &crate::store::TreeNode<'_>) {
    self.expanded.insert(node.folder.id.clone());
    for child in &node.children {
      self.expand_subtree(child);
    }
  }

  /// Opens every ancestor of a folder so that it becomes reachable.
  pub fn reveal(&mut self, tree: &FolderTree<'_>, folder_id: &str) {
    for ancestor in tree.ancestors(folder_id) {
      self.expanded.insert(ancestor.id.clone());
    }
  }

  /// The search term.
  pub fn search(&self) -> &str { &self.search }

  /// Replaces the search term.
  pub fn set_search(&mut self, term: impl Into<String>) { self.search = term.into(); }

  /// Selects or deselects a tag. Returns whether it is now selected.
  pub fn toggle_tag(&mut self, tag: &str) -> bool {
    if self.selected_tags.remove(tag) {
      false
    } else {
      self.selected_tags.insert(tag.to_string());
      true
    }
  }

  /// The selected tags, sorted.
  pub fn selected_tags(&self) -> impl Iterator<Item = &str> {
    self.selected_tags.iter().map(String::as_str)
  }

  /// Clears the search term and tag selection.
  pub fn clear_filters(&mut self) {
    self.search.clear();
    self.selected_tags.clear();
  }

  /// Whether any filter is active.
  pub fn is_filtering(&self) -> bool { !self.search.is_empty() || !self.selected_tags.is_empty() }

  /// Whether `document` passes the filters.
  pub fn matches(&self, document: &Document) -> bool {
    let matches_search = document.name.to_lowercase().contains(&self.search.to_lowercase());
    let matches_tags = self.selected_tags.is_empty()
      || document.tags.iter().any(|tag| self.selected_tags.contains(tag));
    matches_search && matches_tags
  }

  /// The documents passing the filters, in their original order.
  pub fn visible_documents<'a>(&self, documents: &'a [Document]) -> Vec<&'a Document> {
    documents.iter().filter(|document| self.matches(document)).collect()
  }

  /// The tree flattened into display rows.
  ///
  /// Top-level folders come first, each followed by its contents when expanded: child
  /// folders, then documents. Documents at the root come last. Folders are always
  /// listed; documents only when they pass the filters.
  pub fn rows<'a>(&self, tree: &FolderTree<'a>) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    for node in tree.nodes() {
      self.push_node(&node, 0, &mut rows);
    }
    for document in tree.documents_in(None) {
      if self.matches(document) {
        rows.push(Row::Document { depth: 0, document });
      }
    }
    rows
  }

  /// Appends a folder row and, if expanded, its contents.
  fn push_node<'a>(&self, node: &crate::store::TreeNode<'a>, depth: usize, rows: &mut Vec<Row<'a>>) {
    let expanded = self.is_expanded(&node.folder.id);
    rows.push(Row::Folder { depth, folder: node.folder, expanded });
    if !expanded {
      return;
    }
    for child in &node.children {
      self.push_node(child, depth + 1, rows);
    }
    for &document in &node.documents {
      if self.matches(document) {
        rows.push(Row::Document { depth: depth + 1, document });
      }
    }
  }
}
