//! Module for browsing stored documents.

use studydeck::view::Explorer;

use super::*;

/// Options for [`Commands::List`]
#[derive(Args, Clone)]
pub struct ListOptions {
  /// Only list documents whose name contains this, ignoring case
  #[arg(long, short)]
  pub search: Option<String>,

  /// Only list documents carrying one of these tags, repeatable
  #[arg(long = "tag", short)]
  pub tags: Vec<String>,
}

/// Function for the [`Commands::List`] in the CLI.
pub async fn list<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  list_options: ListOptions,
) -> Result<()> {
  let ListOptions { search, tags } = list_options;
  let store = open_store(config)?;
  let tree = store.tree();

  let mut explorer = Explorer::new();
  explorer.expand_all(&tree);
  if let Some(search) = search {
    explorer.set_search(search);
  }
  for tag in &tags {
    explorer.toggle_tag(tag.trim());
  }

  if store.documents().is_empty() && store.folders().is_empty() {
    return interaction.reply(ResponseContent::Info(
      "No documents yet, add one with `studydeck upload <file>`",
    ));
  }

  let visible = explorer.visible_documents(store.documents()).len();
  if explorer.is_filtering() && visible == 0 {
    return interaction.reply(ResponseContent::Info("No documents match the filters"));
  }

  interaction.reply(ResponseContent::Tree(&explorer.rows(&tree)))?;
  interaction.reply(ResponseContent::Info(&format!(
    "{visible} of {} documents, {} folders",
    store.documents().len(),
    store.folders().len()
  )))?;

  let all_tags = store.all_tags();
  if !all_tags.is_empty() {
    interaction.reply(ResponseContent::Info(&format!("Tags: {}", all_tags.join(", "))))?;
  }
  Ok(())
}

/// Function for the [`Commands::Show`] in the CLI.
pub async fn show<I: UserInteraction>(interaction: &I, config: &Config, key: &str) -> Result<()> {
  let store = open_store(config)?;
  let document = resolve(store.documents(), key)?;
  let path = match &document.folder_id {
    Some(folder_id) => store.tree().path(folder_id),
    None => Vec::new(),
  };
  interaction.reply(ResponseContent::Document { document, path: &path })
}
