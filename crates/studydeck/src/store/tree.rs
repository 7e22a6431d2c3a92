//! Folder hierarchy derived from parent pointers.
//!
//! Folders only know their parent. Children, subtrees and ancestor chains are
//! derived on demand by scanning the folder list, which is fine for the handful
//! of folders a single user creates.

use super::*;

/// A borrowed view over the folders and documents of a store.
#[derive(Debug, Clone, Copy)]
pub struct FolderTree<'a> {
  /// All folders
  folders:   &'a [Folder],
  /// All documents
  documents: &'a [Document],
}

/// A folder together with everything directly below it.
#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
  /// The folder itself
  pub folder:    &'a Folder,
  /// Nested folders
  pub children:  Vec<TreeNode<'a>>,
  /// Documents directly inside the folder
  pub documents: Vec<&'a Document>,
}

impl<'a> FolderTree<'a> {
  /// Builds a view over the given collections.
  pub fn new(folders: &'a [Folder], documents: &'a [Document]) -> Self {
    Self { folders, documents }
  }

  /// Folders whose parent is `parent` (`None` meaning top-level).
  pub fn children(&self, parent: Option<&str>) -> Vec<&'a Folder> {
    self.folders.iter().filter(|folder| folder.parent_id.as_deref() == parent).collect()
  }

  /// Documents directly inside `folder` (`None` meaning the root).
  pub fn documents_in(&self, folder: Option<&str>) -> Vec<&'a Document> {
    self.documents.iter().filter(|document| document.is_in(folder)).collect()
  }

  /// Walks parent pointers upward from `folder_id`, nearest ancestor first.
  ///
  /// The folder itself is not included. The walk stops at a missing parent and never
  /// visits a folder twice, so malformed data cannot make it loop.
  pub fn ancestors(&self, folder_id: &str) -> Vec<&'a Folder> {
    let mut ancestors = Vec::new();
    let mut seen = BTreeSet::from([folder_id]);
    let mut current = self.find(folder_id).and_then(|folder| folder.parent_id.as_deref());

    while let Some(id) = current {
      if !seen.insert(id) {
        warn!("Folder hierarchy contains a cycle through \"{id}\"");
        break;
      }
      let Some(folder) = self.find(id) else { break };
      ancestors.push(folder);
      current = folder.parent_id.as_deref();
    }
    ancestors
  }

  /// The chain from the top-level folder down to and including `folder_id`.
  pub fn path(&self, folder_id: &str) -> Vec<&'a Folder> {
    let mut path = self.ancestors(folder_id);
    path.reverse();
    path.extend(self.find(folder_id));
    path
  }

  /// Whether `folder_id` is `ancestor_id` or lies anywhere below it.
  pub fn is_within(&self, folder_id: &str, ancestor_id: &str) -> bool {
    folder_id == ancestor_id
      || self.ancestors(folder_id).iter().any(|folder| folder.id == ancestor_id)
  }

  /// Identifiers of `folder_id` and every folder below it, found depth first.
  ///
  /// The folder itself is included even if it does not exist.
  pub fn descendants(&self, folder_id: &str) -> BTreeSet<String> {
    let mut closure = BTreeSet::new();
    let mut stack = vec![folder_id];
    while let Some(id) = stack.pop() {
      if closure.insert(id.to_string()) {
        stack.extend(self.children(Some(id)).into_iter().map(|child| child.id.as_str()));
      }
    }
    closure
  }

  /// Nested nodes for every top-level folder.
  ///
  /// Folders whose parent no longer exists are shown at the top level.
  pub fn nodes(&self) -> Vec<TreeNode<'a>> {
    self
      .folders
      .iter()
      .filter(|folder| folder.parent_id.as_deref().map_or(true, |parent| self.find(parent).is_none()))
      .map(|folder| self.node(folder))
      .collect()
  }

  /// Builds the node for `folder` and everything below it.
  fn node(&self, folder: &'a Folder) -> TreeNode<'a> {
    TreeNode {
      folder,
      children: self.children(Some(&folder.id)).into_iter().map(|child| self.node(child)).collect(),
      documents: self.documents_in(Some(&folder.id)),
    }
  }

  /// Looks up a folder by identifier.
  fn find(&self, id: &str) -> Option<&'a Folder> {
    self.folders.iter().find(|folder| folder.id == id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn folder(id: &str, parent: Option<&str>) -> Folder {
    Folder { id: id.to_string(), name: id.to_uppercase(), parent_id: parent.map(str::to_string) }
  }

  fn sample() -> Vec<Folder> {
    vec![
      folder("a", None),
      folder("b", Some("a")),
      folder("c", Some("b")),
      folder("d", Some("a")),
      folder("e", None),
    ]
  }

  #[test]
  fn test_descendants_include_self_and_all_levels() {
    let folders = sample();
    let tree = FolderTree::new(&folders, &[]);
    let closure = tree.descendants("a");
    assert_eq!(closure, ["a", "b", "c", "d"].into_iter().map(String::from).collect());
    assert_eq!(tree.descendants("c"), BTreeSet::from(["c".to_string()]));
  }

  #[test]
  fn test_ancestors_and_path() {
    let folders = sample();
    let tree = FolderTree::new(&folders, &[]);
    let ancestors: Vec<_> = tree.ancestors("c").iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ancestors, vec!["b", "a"]);
    let path: Vec<_> = tree.path("c").iter().map(|f| f.name.as_str()).collect();
    assert_eq!(path, vec!["A", "B", "C"]);
    assert!(tree.is_within("c", "a"));
    assert!(tree.is_within("a", "a"));
    assert!(!tree.is_within("a", "c"));
    assert!(!tree.is_within("e", "a"));
  }

  #[traced_test]
  #[test]
  fn test_ancestors_terminate_on_cycle() {
    let folders = vec![folder("x", Some("y")), folder("y", Some("x"))];
    let tree = FolderTree::new(&folders, &[]);
    assert_eq!(tree.ancestors("x").len(), 1);
    assert!(logs_contain("cycle"));
  }

  #[test]
  fn test_nodes_nest_folders_and_documents() {
    let folders = sample();
    let documents = vec![Document::pdf("one.pdf").with_folder("c"), Document::pdf("root.pdf")];
    let tree = FolderTree::new(&folders, &documents);

    let nodes = tree.nodes();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].folder.id, "a");
    assert_eq!(nodes[0].children.len(), 2);
    assert_eq!(nodes[0].children[0].children[0].documents[0].name, "one.pdf");
    assert_eq!(tree.documents_in(None)[0].name, "root.pdf");
  }
}
