//! Module for serving the generation API.

use studydeck::{api, generate::Gateway};

use super::*;

/// Options for [`Commands::Serve`]
#[derive(Args, Clone)]
pub struct ServeOptions {
  /// Address to listen on, overriding `server.bind` of the configuration
  #[arg(long)]
  pub bind: Option<String>,

  /// Directory to write a daily rolling log file to
  #[arg(long)]
  pub log_dir: Option<PathBuf>,
}

/// Function for the [`Commands::Serve`] in the CLI.
///
/// Runs until interrupted with Ctrl-C.
pub async fn serve<I: UserInteraction>(
  interaction: &I,
  config: Config,
  serve_options: ServeOptions,
) -> Result<()> {
  let ServeOptions { bind, log_dir } = serve_options;
  let config = match bind {
    Some(bind) => config.with_bind(bind),
    None => config,
  };

  let gateway = Gateway::new(config.chat_client()?);
  let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
  let addr = listener.local_addr()?;

  interaction.reply(ResponseContent::Success(&format!(
    "Serving the generation API on http://{addr} with {}",
    gateway.model().model()
  )))?;
  if let Some(log_dir) = log_dir {
    interaction.reply(ResponseContent::Info(&format!("Logging to {}", log_dir.display())))?;
  }
  interaction.reply(ResponseContent::Info("Press Ctrl-C to stop"))?;

  api::serve(listener, gateway).await?;
  interaction.reply(ResponseContent::Info("Server stopped"))
}
