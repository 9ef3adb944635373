use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use pdf::LopdfDecoder;
use pdfoutline_core::pipeline::document_identifier;
use pdfoutline_core::{process_document, Outline};
use serde::Serialize;

use crate::config::{BatchConfig, Config};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Directory containing the documents to outline
    #[arg(short, long, default_value = "dataset")]
    pub input: PathBuf,

    /// Directory where one JSON outline per document is written
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Number of documents processed at the same time
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Degraded,
    Failed,
}

/// What happened to one input document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    pub headings: usize,
}

impl DocumentReport {
    fn failed(source: PathBuf, cause: String) -> Self {
        Self {
            source,
            output: None,
            status: Status::Failed,
            cause: Some(cause),
            headings: 0,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    pub ok: usize,
    pub degraded: usize,
    pub failed: usize,
}

impl BatchReport {
    fn from_documents(documents: Vec<DocumentReport>) -> Self {
        let count = |status| documents.iter().filter(|d| d.status == status).count();
        Self {
            ok: count(Status::Ok),
            degraded: count(Status::Degraded),
            failed: count(Status::Failed),
            documents,
        }
    }
}

/// List the documents directly inside `input`, sorted by file name.
pub fn discover(input: &Path, batch: &BatchConfig) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Err(Error::InputNotFound(input.to_path_buf()).into());
    }

    let mut files = Vec::new();
    let entries = std::fs::read_dir(input)
        .wrap_err_with(|| f!("Failed to list input directory {}", input.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && batch.matches(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Outline one document and write its JSON record.
///
/// Decoding problems are already folded into a degraded outline by the
/// pipeline, so the only failure left here is persistence.
pub fn process_one(path: &Path, output_dir: &Path, config: &Config) -> DocumentReport {
    let identifier = document_identifier(path);
    let outcome = process_document(&LopdfDecoder, path, &config.outline);

    if let Some(cause) = outcome.cause() {
        log::warn!("{identifier}: degraded outline: {cause}");
    }

    let target = config.batch.output_path(output_dir, &identifier);
    match persist(outcome.outline(), &target) {
        Ok(()) => DocumentReport {
            source: path.to_path_buf(),
            output: Some(target),
            status: if outcome.is_degraded() {
                Status::Degraded
            } else {
                Status::Ok
            },
            cause: outcome.cause().map(str::to_string),
            headings: outcome.outline().outline.len(),
        },
        Err(err) => {
            log::error!("{identifier}: {err}");
            DocumentReport::failed(path.to_path_buf(), err.to_string())
        }
    }
}

fn persist(outline: &Outline, target: &Path) -> Result<(), Error> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::Persist {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(outline)?;
    std::fs::write(target, json).map_err(|source| Error::Persist {
        path: target.to_path_buf(),
        source,
    })
}

/// Process `files` on the blocking pool, `jobs` at a time, keeping input order.
pub async fn process_all(
    files: Vec<PathBuf>,
    output_dir: &Path,
    jobs: usize,
    config: Arc<Config>,
    progress: Option<&ProgressBar>,
) -> BatchReport {
    let documents: Vec<DocumentReport> = futures::stream::iter(files)
        .map(|path| {
            let config = Arc::clone(&config);
            let output_dir = output_dir.to_path_buf();
            async move {
                let source = path.clone();
                tokio::task::spawn_blocking(move || process_one(&path, &output_dir, &config))
                    .await
                    .unwrap_or_else(|err| {
                        log::error!("{}: worker failed: {err}", source.display());
                        DocumentReport::failed(source, err.to_string())
                    })
            }
        })
        .buffered(jobs.max(1))
        .inspect(|report| {
            if let Some(bar) = progress {
                bar.set_message(report.source.display().to_string());
                bar.inc(1);
            }
        })
        .collect()
        .await;

    BatchReport::from_documents(documents)
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
    )?);
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(bar)
}

fn print_report(report: &BatchReport, output_dir: &Path) {
    for document in &report.documents {
        let status = match document.status {
            Status::Ok => "ok".green(),
            Status::Degraded => "degraded".yellow(),
            Status::Failed => "failed".red(),
        };
        println!(
            "{} {} ({} headings)",
            status.bold(),
            document.source.display(),
            document.headings
        );
        if let Some(cause) = &document.cause {
            println!("  {}", cause.dimmed());
        }
    }

    println!(
        "\nProcessed {} document(s): {} ok, {} degraded, {} failed. Outputs in {}",
        report.documents.len().to_string().bold(),
        report.ok.to_string().green(),
        report.degraded.to_string().yellow(),
        report.failed.to_string().red(),
        output_dir.display()
    );
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Arc::new(Config::load(global.config.as_deref())?);
    let files = discover(&app.input, &config.batch)?;

    if files.is_empty() {
        log::warn!("no documents found in {}", app.input.display());
    } else if global.verbose {
        eprintln!(
            "Processing {} document(s) from {}",
            files.len(),
            app.input.display()
        );
    }

    let progress = if !app.json && !files.is_empty() && std::io::stderr().is_terminal() {
        Some(progress_bar(files.len())?)
    } else {
        None
    };

    let report = process_all(files, &app.output, app.jobs, config, progress.as_ref()).await;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    if app.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &app.output);
    }

    Ok(())
}
