use std::path::{Path, PathBuf};

use pdf::LopdfDecoder;
use pdfoutline_core::pipeline::{inspect, DecodedDocument, DocumentDecoder, Inspection};
use pdfoutline_core::OutlineConfig;

use crate::config::Config;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Path to the PDF file
    pub path: PathBuf,
}

/// Decode `path` and run the pipeline stages up to classification.
///
/// Unlike `outline`, a document that cannot be decoded is an error here.
fn inspect_file(path: &Path, config: &OutlineConfig) -> Result<Inspection> {
    let document = LopdfDecoder
        .open(path)
        .wrap_err_with(|| f!("Failed to open {}", path.display()))?;
    let pages = document.pages();
    document.close();

    let pages = pages.wrap_err_with(|| f!("Failed to extract text from {}", path.display()))?;
    Ok(inspect(&pages, config))
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::load(global.config.as_deref())?;
    let path = app.path;

    let inspection =
        tokio::task::spawn_blocking(move || inspect_file(&path, &config.outline)).await??;

    println!("{}", serde_json::to_string_pretty(&inspection)?);
    Ok(())
}
