use std::path::PathBuf;

use pdf::LopdfDecoder;
use pdfoutline_core::process_document;

use crate::config::Config;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Path to the PDF file
    pub path: PathBuf,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::load(global.config.as_deref())?;
    let path = app.path;

    let outcome =
        tokio::task::spawn_blocking(move || process_document(&LopdfDecoder, &path, &config.outline))
            .await?;

    if let Some(cause) = outcome.cause() {
        log::warn!("degraded outline: {cause}");
    }

    println!("{}", serde_json::to_string_pretty(outcome.outline())?);
    Ok(())
}
