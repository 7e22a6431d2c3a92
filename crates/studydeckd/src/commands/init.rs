//! Module for setting up a studydeck installation.

use super::*;

/// Options for [`Commands::Init`]
#[derive(Args, Clone)]
pub struct InitOptions {
  /// Base URL of an OpenAI-compatible chat completion service
  #[arg(long)]
  pub host:        Option<String>,
  /// Model to generate with
  #[arg(long)]
  pub model:       Option<String>,
  /// Environment variable that holds the API key
  #[arg(long)]
  pub api_key_env: Option<String>,
}

/// Function for the [`Commands::Init`] in the CLI.
///
/// Asks before using the default database location and before replacing an existing
/// database, then writes the configuration file and creates an empty store.
pub async fn init<I: UserInteraction>(
  interaction: &I,
  config: Config,
  config_path: &Path,
  init_options: InitOptions,
) -> Result<()> {
  let InitOptions { host, model, api_key_env } = init_options;

  // Only ask when neither `--path` nor the configuration chose a location
  if config.database_path == SqliteStorage::default_path()
    && !interaction.confirm(&format!(
      "Would you like to use the default path {:?} for storing the studydeck database?",
      config.database_path,
    ))?
  {
    interaction.reply(ResponseContent::Info(
      "Please pass in your intended database storage path using --path",
    ))?;
    return Ok(());
  }

  if config.database_path.exists() {
    if !interaction.confirm(
      "Database already exists at this location, do you want to overwrite this database?",
    )? {
      interaction.reply(ResponseContent::Info(
        "Please choose a different location for this new studydeck database using --path",
      ))?;
      return Ok(());
    }
    std::fs::remove_file(&config.database_path)?;
  }

  let mut config = config;
  if let Some(host) = host {
    config = config.with_llm_host(host);
  }
  if let Some(model) = model {
    config = config.with_model(model);
  }
  if let Some(api_key_env) = api_key_env {
    config = config.with_api_key_env(api_key_env);
  }

  DocumentStore::open(SqliteStorage::open(&config.database_path)?)?;
  config.save(config_path)?;

  interaction.reply(ResponseContent::Success(&format!(
    "Database initialized successfully\nConfig path: {:?}\nDatabase path: {:?}\nModel: {} at {}",
    config_path, config.database_path, config.llm.model, config.llm.host,
  )))?;

  if config.api_key().is_err() {
    interaction.reply(ResponseContent::Warning(&format!(
      "Set {} before generating study material",
      config.llm.api_key_env
    )))?;
  }
  Ok(())
}
