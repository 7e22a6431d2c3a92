//! Module for abstracting the "clean" functionality to the studydeck database.

use super::*;

/// Function for the [`Commands::Clean`] in the CLI.
///
/// Deletes the database file and any SQLite side files next to it after two
/// confirmations. The configuration file is kept.
pub async fn clean<I: UserInteraction>(interaction: &I, config: &Config) -> Result<()> {
  let path = &config.database_path;
  if !path.exists() {
    return interaction
      .reply(ResponseContent::Warning(&format!("No database found at: {}", path.display())));
  }

  interaction.reply(ResponseContent::Warning(&format!("Database found at: {}", path.display())))?;
  if !interaction.confirm("Are you sure you want to delete this database?")?
    || !interaction.confirm_typed("This cannot be undone.", "DELETE")?
  {
    return interaction.reply(ResponseContent::Info("Operation cancelled"));
  }

  interaction.reply(ResponseContent::Warning(&format!("Removing database: {}", path.display())))?;
  std::fs::remove_file(path)?;

  // Journal and WAL files share the database file name as a prefix
  let pattern = format!("{}*", glob::Pattern::escape(&path.display().to_string()));
  for file in glob::glob(&pattern)?.flatten() {
    debug!("Removing {}", file.display());
    std::fs::remove_file(file)?;
  }
  interaction.reply(ResponseContent::Success("Database files cleaned"))
}
