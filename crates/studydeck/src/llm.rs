//! Client implementation for OpenAI-compatible chat completion services.
//!
//! This module talks to hosted models through the `/chat/completions` endpoint that Groq,
//! OpenAI and most self-hosted gateways share. The default host is Groq's and the
//! default model is Llama 3.3 70B.
//!
//! Two layers are provided:
//! - [`ChatRequest`]: a request builder that sends one conversation and returns the raw
//!   [`ChatResponse`]
//! - [`ChatClient`]: a configured client implementing [`CompletionModel`], the seam the
//!   generation gateway depends on
//!
//! # Examples
//!
//! ```no_run
//! use studydeck::llm::{ChatRequest, Model};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = ChatRequest::new()
//!   .with_host("https://api.groq.com/openai/v1")
//!   .with_model(Model::Llama3p3c70b)
//!   .with_api_key(std::env::var("GROQ_API_KEY")?)
//!   .with_message("What is the powerhouse of the cell?");
//!
//! let response = request.send().await?;
//! println!("Response: {}", response.content().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use std::str::FromStr;

use serde::Serializer;

use super::*;

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "https://api.groq.com/openai/v1";

/// Environment variable the API key is read from by default.
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Anything that can turn a prompt into a completion.
///
/// The generation gateway only depends on this trait, so tests and alternative backends
/// can stand in for the hosted model.
#[async_trait]
pub trait CompletionModel: Send + Sync {
  /// Sends `prompt` as a single user message and returns the model's answer.
  async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Available models for use with the chat completion service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Model {
  /// Llama 3.3 70B, served as `llama-3.3-70b-versatile`
  #[default]
  Llama3p3c70b,
  /// Any other model name the service understands
  Custom(String),
}

impl Display for Model {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Model::Llama3p3c70b => write!(f, "llama-3.3-70b-versatile"),
      Model::Custom(name) => write!(f, "{name}"),
    }
  }
}

impl FromStr for Model {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
    Ok(match s {
      "llama-3.3-70b-versatile" => Model::Llama3p3c70b,
      other => Model::Custom(other.to_string()),
    })
  }
}

impl Serialize for Model {
  fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Message structure for chat interactions.
///
/// ```
/// use studydeck::llm::Message;
///
/// let message = Message::user("What is the speed of light?");
/// assert_eq!(message.role, "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  /// The role of the message sender: `system`, `user` or `assistant`.
  pub role: String,

  /// The text of the message.
  pub content: String,
}

impl Message {
  /// A message from the user.
  pub fn user(content: impl Into<String>) -> Self {
    Self { role: "user".to_string(), content: content.into() }
  }

  /// A system instruction.
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: "system".to_string(), content: content.into() }
  }
}

/// Sampling options sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Options {
  /// Temperature for controlling randomness in generation
  pub temperature: f64,
  /// Top-p (nucleus) sampling parameter
  pub top_p:       f64,
  /// Maximum number of tokens to generate
  pub max_tokens:  u64,
}

impl Default for Options {
  fn default() -> Self { Self { temperature: 0.7, top_p: 1.0, max_tokens: 4096 } }
}

/// Request builder for chat completions.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ChatRequest {
  /// The model to use. Sending without one is an error.
  pub model: Option<Model>,

  /// Conversation messages, in order. Must not be empty when sending.
  pub messages: Vec<Message>,

  /// Whether to stream the response. Always false, streaming is not supported.
  pub stream: bool,

  /// Sampling parameters, flattened into the request body.
  #[serde(flatten)]
  pub options: Options,

  /// Base URL of the service, without the endpoint path. Skipped during serialization.
  #[serde(skip)]
  pub host: Option<String>,

  /// Bearer token. Skipped during serialization.
  #[serde(skip)]
  pub api_key: Option<String>,
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
  /// Position among the returned choices
  #[serde(default)]
  pub index:         u32,
  /// The generated message
  pub message:       Message,
  /// Why generation stopped
  #[serde(default)]
  pub finish_reason: Option<String>,
}

/// Response body of a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
  /// Service-assigned identifier
  #[serde(default)]
  pub id:      Option<String>,
  /// Name of the model that answered
  #[serde(default)]
  pub model:   String,
  /// Generated choices
  #[serde(default)]
  pub choices: Vec<Choice>,
}

impl ChatResponse {
  /// Text of the first choice, if there is one.
  pub fn content(&self) -> Option<&str> {
    self.choices.first().map(|choice| choice.message.content.as_str())
  }
}

impl ChatRequest {
  /// Creates a new request with builder-style API with default settings.
  pub fn new() -> Self { Self::default() }

  /// Sets the base URL of the service, e.g. `https://api.groq.com/openai/v1`.
  pub fn with_host(mut self, host: impl Into<String>) -> Self {
    self.host = Some(host.into());
    self
  }

  /// Sets the model to use for the request.
  pub fn with_model(mut self, model: Model) -> Self {
    self.model.replace(model);
    self
  }

  /// Sets the bearer token.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  /// Replaces the sampling options.
  pub fn with_options(mut self, options: Options) -> Self {
    self.options = options;
    self
  }

  /// Adds a system instruction to the conversation.
  pub fn with_system(mut self, content: &str) -> Self {
    self.messages.push(Message::system(content));
    self
  }

  /// Adds a user message to the conversation.
  pub fn with_message(mut self, content: &str) -> Self {
    self.messages.push(Message::user(content));
    self
  }

  /// The full endpoint URL, falling back to [`DEFAULT_HOST`].
  pub fn endpoint(&self) -> String {
    let host = self.host.as_deref().unwrap_or_else(|| {
      warn!("No host set, using {DEFAULT_HOST}");
      DEFAULT_HOST
    });
    format!("{}/chat/completions", host.trim_end_matches('/'))
  }

  /// Sends the request with a one-off HTTP client.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - No model is specified
  /// - No messages are provided
  /// - The network request fails
  /// - The service answers with a non-success status
  /// - The response cannot be parsed
  pub async fn send(&self) -> Result<ChatResponse> { self.send_with(&reqwest::Client::new()).await }

  /// Sends the request with an existing HTTP client. Errors as for [`ChatRequest::send`].
  pub async fn send_with(&self, client: &reqwest::Client) -> Result<ChatResponse> {
    if self.model.is_none() {
      return Err(StudyError::LLMMissingModel);
    }
    if self.messages.is_empty() {
      return Err(StudyError::LLMMissingMessage);
    }

    let url = self.endpoint();
    let mut request = client.post(&url).json(self);
    match &self.api_key {
      Some(key) => request = request.bearer_auth(key),
      None => warn!("No API key set, sending unauthenticated request"),
    }

    debug!("Sending {} messages to {url}", self.messages.len());
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      error!("Completion request to {url} failed with {status}");
      return Err(StudyError::ApiError(format!("{status}: {body}")));
    }

    let chat: ChatResponse = response.json().await?;
    trace!("Received {} choices from {}", chat.choices.len(), chat.model);
    Ok(chat)
  }
}

/// A configured chat completion client.
///
/// ```no_run
/// use studydeck::{llm::ChatClient, prelude::*};
///
/// # async fn example() -> Result<(), StudyError> {
/// let client = ChatClient::new().with_api_key("gsk_...");
/// let answer = client.complete("Name three organelles.").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient {
  /// Base URL of the service
  host:    String,
  /// Model every completion uses
  model:   Model,
  /// Bearer token, if any
  api_key: Option<String>,
  /// Sampling options
  options: Options,
  /// Shared connection pool
  http:    reqwest::Client,
}

impl Default for ChatClient {
  fn default() -> Self {
    Self {
      host:    DEFAULT_HOST.to_string(),
      model:   Model::default(),
      api_key: None,
      options: Options::default(),
      http:    reqwest::Client::new(),
    }
  }
}

impl ChatClient {
  /// Creates a client for the default host and model.
  pub fn new() -> Self { Self::default() }

  /// Sets the base URL of the service.
  pub fn with_host(mut self, host: impl Into<String>) -> Self {
    self.host = host.into();
    self
  }

  /// Sets the model.
  pub fn with_model(mut self, model: Model) -> Self {
    self.model = model;
    self
  }

  /// Sets the bearer token.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  /// Sets the sampling options.
  pub fn with_options(mut self, options: Options) -> Self {
    self.options = options;
    self
  }

  /// The model completions are requested from.
  pub fn model(&self) -> &Model { &self.model }

  /// The request a completion of `prompt` would send.
  fn request(&self, prompt: &str) -> ChatRequest {
    let request = ChatRequest::new()
      .with_host(&self.host)
      .with_model(self.model.clone())
      .with_options(self.options)
      .with_message(prompt);
    match &self.api_key {
      Some(key) => request.with_api_key(key),
      None => request,
    }
  }
}

#[async_trait]
impl CompletionModel for ChatClient {
  async fn complete(&self, prompt: &str) -> Result<String> {
    let response = self.request(prompt).send_with(&self.http).await?;
    response
      .content()
      .map(str::to_string)
      .ok_or_else(|| StudyError::ApiError("Response contained no choices".to_string()))
  }
}
