//! Module for the "upload" command: PDF in, stored document out.

use studydeck::{
  pdf::{PDFExtractor, Upload},
  store::Add,
};

use super::*;

/// Options for [`Commands::Upload`]
#[derive(Args, Clone)]
pub struct UploadOptions {
  /// The PDF file to upload
  pub file: PathBuf,

  /// Folder to place the document in, by id, id prefix or name
  #[arg(long)]
  pub folder: Option<String>,

  /// Tag to add to the document, repeatable
  #[arg(long = "tag", short)]
  pub tags: Vec<String>,

  /// Name to store the document under instead of the file name
  #[arg(long)]
  pub name: Option<String>,
}

/// Function for the [`Commands::Upload`] in the CLI.
pub async fn upload<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  upload_options: UploadOptions,
) -> Result<()> {
  let UploadOptions { file, folder, tags, name } = upload_options;
  let mut store = open_store(config)?;
  let folder_id = resolve_folder(&store, folder.as_deref())?;

  let upload = Upload::from_path(&file)?;
  let name = name.unwrap_or_else(|| upload.name.clone());
  if store.documents().iter().any(|document| document.name == name)
    && !interaction.confirm(&format!("A document named \"{name}\" already exists. Upload anyway?"))?
  {
    interaction.reply(ResponseContent::Info("Upload cancelled"))?;
    return Ok(());
  }

  interaction.reply(ResponseContent::Info(&format!("Extracting text from {}", file.display())))?;
  let content = PDFExtractor::new().extract_content(&upload)?;
  let text = content.text();
  if text.is_empty() {
    interaction.reply(ResponseContent::Warning(
      "No text could be extracted, generation will not be possible for this document",
    ))?;
  }
  if let Some(title) = &content.metadata.title {
    interaction.reply(ResponseContent::Info(&format!("Title: {title}")))?;
  }

  let mut document = Document::pdf(&name).with_content(text);
  if let Some(folder_id) = folder_id {
    document = document.with_folder(folder_id);
  }
  for tag in &tags {
    document.add_tag(tag)?;
  }
  let id = Add::document(document).execute(&mut store)?;

  interaction.reply(ResponseContent::Success(&format!(
    "Uploaded {name} ({} pages) as {}",
    content.pages.len(),
    short_id(&id)
  )))?;
  Ok(())
}
