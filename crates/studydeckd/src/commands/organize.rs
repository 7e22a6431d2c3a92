//! Module for the folder, document and tag commands.
//!
//! Every argument naming a document or folder accepts its id, a unique id prefix or its
//! name.

use studydeck::{
  document::DocumentUpdate,
  store::{Add, Move, Remove, Tag, Update},
};

use super::*;

/// Folder operations
#[derive(Subcommand, Clone)]
pub enum FolderCommands {
  /// Create a folder
  Add {
    /// Name of the new folder
    name:   String,
    /// Folder to nest it in, top level if omitted
    #[arg(long)]
    parent: Option<String>,
  },

  /// Rename a folder
  Rename {
    /// The folder
    folder: String,
    /// Its new name
    name:   String,
  },

  /// Move a folder under another one
  Move {
    /// The folder to move
    folder: String,
    /// New parent folder, top level if omitted
    #[arg(long)]
    to:     Option<String>,
  },

  /// Remove a folder and everything below it, moving its documents to the root
  Remove {
    /// The folder
    folder: String,
  },
}

/// Document operations
#[derive(Subcommand, Clone)]
pub enum DocCommands {
  /// Move a document into a folder
  Move {
    /// The document
    document: String,
    /// Destination folder, the root if omitted
    #[arg(long)]
    to:       Option<String>,
  },

  /// Rename a document
  Rename {
    /// The document
    document: String,
    /// Its new name
    name:     String,
  },

  /// Delete a document
  Remove {
    /// The document
    document: String,
  },
}

/// Tag operations
#[derive(Subcommand, Clone)]
pub enum TagCommands {
  /// Tag a document
  Add {
    /// The document
    document: String,
    /// The tag
    tag:      String,
  },

  /// Remove a tag from a document
  Remove {
    /// The document
    document: String,
    /// The tag
    tag:      String,
  },
}

/// Function for the [`Commands::Folder`] in the CLI.
pub async fn folder<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  cmd: FolderCommands,
) -> Result<()> {
  let mut store = open_store(config)?;
  match cmd {
    FolderCommands::Add { name, parent } => {
      let parent_id = resolve_folder(&store, parent.as_deref())?;
      let mut new_folder = Folder::new(&name);
      if let Some(parent_id) = parent_id {
        new_folder = new_folder.with_parent(parent_id);
      }
      let id = Add::folder(new_folder).execute(&mut store)?;
      interaction
        .reply(ResponseContent::Success(&format!("Created folder {name} ({})", short_id(&id))))
    },
    FolderCommands::Rename { folder, name } => {
      let target = resolve(store.folders(), &folder)?.id.clone();
      Update::folder(&target, &name).execute(&mut store)?;
      interaction.reply(ResponseContent::Success(&format!("Renamed folder to {name}")))
    },
    FolderCommands::Move { folder, to } => {
      let target = resolve(store.folders(), &folder)?;
      let (target_id, target_name) = (target.id.clone(), target.name.clone());
      let destination = resolve_folder(&store, to.as_deref())?;
      Move::folder(&target_id, destination.as_deref()).execute(&mut store)?;
      interaction.reply(ResponseContent::Success(&format!(
        "Moved {target_name} to {}",
        location_name(&store, destination.as_deref())
      )))
    },
    FolderCommands::Remove { folder } => {
      let target = resolve(store.folders(), &folder)?;
      let (target_id, target_name) = (target.id.clone(), target.name.clone());

      let preview = Remove::folder(&target_id).dry_run().execute(&mut store)?;
      let message = format!(
        "Remove {target_name} and {} folders below it? {} documents will move to the root",
        preview.folders.len().saturating_sub(1),
        preview.reparented.len()
      );
      if !interaction.confirm(&message)? {
        return interaction.reply(ResponseContent::Info("Operation cancelled"));
      }

      let removal = Remove::folder(&target_id).execute(&mut store)?;
      interaction.reply(ResponseContent::Success(&format!(
        "Removed {} folders, moved {} documents to the root",
        removal.folders.len(),
        removal.reparented.len()
      )))
    },
  }
}

/// Function for the [`Commands::Doc`] in the CLI.
pub async fn doc<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  cmd: DocCommands,
) -> Result<()> {
  let mut store = open_store(config)?;
  match cmd {
    DocCommands::Move { document, to } => {
      let target = resolve(store.documents(), &document)?;
      let (target_id, target_name) = (target.id.clone(), target.name.clone());
      let destination = resolve_folder(&store, to.as_deref())?;
      Move::document(&target_id, destination.as_deref()).execute(&mut store)?;
      interaction.reply(ResponseContent::Success(&format!(
        "Moved {target_name} to {}",
        location_name(&store, destination.as_deref())
      )))
    },
    DocCommands::Rename { document, name } => {
      let target = resolve(store.documents(), &document)?.id.clone();
      Update::document(&target, DocumentUpdate::default().name(&name)).execute(&mut store)?;
      interaction.reply(ResponseContent::Success(&format!("Renamed document to {name}")))
    },
    DocCommands::Remove { document } => {
      let target = resolve(store.documents(), &document)?;
      let (target_id, target_name) = (target.id.clone(), target.name.clone());
      if !interaction.confirm(&format!("Delete {target_name}?"))? {
        return interaction.reply(ResponseContent::Info("Operation cancelled"));
      }
      Remove::document(&target_id).execute(&mut store)?;
      interaction.reply(ResponseContent::Success(&format!("Deleted {target_name}")))
    },
  }
}

/// Function for the [`Commands::Tag`] in the CLI.
pub async fn tag<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  cmd: TagCommands,
) -> Result<()> {
  let mut store = open_store(config)?;
  let (document, tag, adding) = match cmd {
    TagCommands::Add { document, tag } => (document, tag, true),
    TagCommands::Remove { document, tag } => (document, tag, false),
  };
  let target = resolve(store.documents(), &document)?;
  let (target_id, target_name) = (target.id.clone(), target.name.clone());
  let tag = tag.trim();

  let instruction = if adding { Tag::add(&target_id, tag) } else { Tag::remove(&target_id, tag) };
  let changed = instruction.execute(&mut store)?;

  match (adding, changed) {
    (true, true) => interaction.reply(ResponseContent::Success(&format!("Tagged {target_name} with #{tag}"))),
    (true, false) => interaction.reply(ResponseContent::Info(&format!("{target_name} already has #{tag}"))),
    (false, true) => interaction.reply(ResponseContent::Success(&format!("Removed #{tag} from {target_name}"))),
    (false, false) => interaction.reply(ResponseContent::Info(&format!("{target_name} does not have #{tag}"))),
  }
}

/// Display name of a destination folder, `None` being the root.
fn location_name(store: &DocumentStore, folder_id: Option<&str>) -> String {
  folder_id
    .and_then(|id| store.folder(id))
    .map_or_else(|| "the root".to_string(), |folder| folder.name.clone())
}
