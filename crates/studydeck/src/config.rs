//! On-disk configuration.
//!
//! The configuration lives at `~/.studydeck/config.toml` and is entirely optional: a
//! missing file yields [`Config::default`]. A full file looks like this:
//!
//! ```toml
//! database_path = "/home/me/.local/share/studydeck/studydeck.db"
//!
//! [llm]
//! host = "https://api.groq.com/openai/v1"
//! model = "llama-3.3-70b-versatile"
//! api_key_env = "GROQ_API_KEY"
//!
//! [server]
//! bind = "127.0.0.1:3000"
//! ```
//!
//! The API key itself is never written to the file, only the name of the environment
//! variable holding it.

use crate::{
  llm::{ChatClient, Model, DEFAULT_API_KEY_ENV, DEFAULT_HOST},
  store::SqliteStorage,
};

use super::*;

/// Default address for the HTTP API.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Settings for the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
  /// Base URL of the OpenAI-compatible service
  pub host:        String,
  /// Model name
  pub model:       String,
  /// Environment variable holding the API key
  pub api_key_env: String,
}

impl Default for LlmConfig {
  fn default() -> Self {
    Self {
      host:        DEFAULT_HOST.to_string(),
      model:       Model::default().to_string(),
      api_key_env: DEFAULT_API_KEY_ENV.to_string(),
    }
  }
}

/// Settings for `studydeck serve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Socket address to listen on
  pub bind: String,
}

impl Default for ServerConfig {
  fn default() -> Self { Self { bind: DEFAULT_BIND.to_string() } }
}

/// Everything configurable about a studydeck installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Where the document store is kept
  pub database_path: PathBuf,
  /// Completion service settings
  pub llm:           LlmConfig,
  /// HTTP API settings
  pub server:        ServerConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_path: SqliteStorage::default_path(),
      llm:           LlmConfig::default(),
      server:        ServerConfig::default(),
    }
  }
}

impl Config {
  /// Returns the default path for the configuration file, `~/.studydeck/config.toml`.
  ///
  /// Falls back to the current directory when no home directory is known.
  pub fn default_path() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".studydeck").join("config.toml")
  }

  /// Loads the configuration at `path`, or the defaults when there is no file.
  ///
  /// # Errors
  ///
  /// Fails if the file exists but cannot be read or is not valid TOML for this type.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      debug!("No configuration at {}, using defaults", path.display());
      return Ok(Self::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    trace!("Loaded configuration from {}", path.display());
    Ok(config)
  }

  /// Writes the configuration to `path`, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    debug!("Saved configuration to {}", path.display());
    Ok(())
  }

  /// Sets the database location.
  pub fn with_database_path(mut self, database_path: &Path) -> Self {
    self.database_path = database_path.to_path_buf();
    self
  }

  /// Sets the completion service host.
  pub fn with_llm_host(mut self, host: impl Into<String>) -> Self {
    self.llm.host = host.into();
    self
  }

  /// Sets the model name.
  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.llm.model = model.into();
    self
  }

  /// Sets the environment variable the API key is read from.
  pub fn with_api_key_env(mut self, api_key_env: impl Into<String>) -> Self {
    self.llm.api_key_env = api_key_env.into();
    self
  }

  /// Sets the HTTP API address.
  pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
    self.server.bind = bind.into();
    self
  }

  /// Reads the API key from the configured environment variable.
  ///
  /// # Errors
  ///
  /// Returns [`StudyError::Config`] when the variable is unset or empty.
  pub fn api_key(&self) -> Result<String> {
    match std::env::var(&self.llm.api_key_env) {
      Ok(key) if !key.trim().is_empty() => Ok(key),
      _ => Err(StudyError::Config(format!(
        "Set {} to the API key of {}",
        self.llm.api_key_env, self.llm.host
      ))),
    }
  }

  /// A chat client for the configured service.
  ///
  /// # Errors
  ///
  /// Fails as [`Config::api_key`] does.
  pub fn chat_client(&self) -> Result<ChatClient> {
    let model = self.llm.model.parse::<Model>().unwrap_or_else(|never| match never {});
    Ok(ChatClient::new().with_host(&self.llm.host).with_model(model).with_api_key(self.api_key()?))
  }
}
