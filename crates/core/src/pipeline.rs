//! Per-document orchestration.
//!
//! [`build_outline`] is the pure pipeline over already decoded pages.
//! [`process_document`] wraps it with the decoder lifecycle and turns every
//! failure into a degraded [`Outline`], so callers processing many documents
//! never have to unwind.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{classify, Classification};
use crate::config::OutlineConfig;
use crate::fragment::{PageText, TextFragment};
use crate::levels::{assign_levels, dedup_headings};
use crate::merge::{merge_lines, MergedLine};
use crate::outline::Outline;
use crate::stats::{analyze, FontStatistics};
use crate::title::{fallback_title, select_title};

/// Number of leading fragments sampled by [`detect_document_kind`].
const KIND_SAMPLE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Decoder boundary
// ---------------------------------------------------------------------------

/// Opens documents. Implemented by the PDF backend; tests use in-memory fakes.
pub trait DocumentDecoder {
    type Document: DecodedDocument;
    type Error: std::error::Error;

    fn open(&self, path: &Path) -> Result<Self::Document, Self::Error>;
}

/// An open document handle.
pub trait DecodedDocument {
    type Error: std::error::Error;

    /// Decode page geometry and text fragments for every page, in page order.
    fn pages(&self) -> Result<Vec<PageText>, Self::Error>;

    /// Release the underlying resources.
    fn close(self);
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of processing one document. Both variants carry an outline that
/// can be persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentOutcome {
    Success { outline: Outline },
    Degraded { outline: Outline, cause: String },
}

impl DocumentOutcome {
    pub fn outline(&self) -> &Outline {
        match self {
            DocumentOutcome::Success { outline } | DocumentOutcome::Degraded { outline, .. } => {
                outline
            }
        }
    }

    pub fn into_outline(self) -> Outline {
        match self {
            DocumentOutcome::Success { outline } | DocumentOutcome::Degraded { outline, .. } => {
                outline
            }
        }
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            DocumentOutcome::Success { .. } => None,
            DocumentOutcome::Degraded { cause, .. } => Some(cause),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, DocumentOutcome::Degraded { .. })
    }
}

// ---------------------------------------------------------------------------
// Document kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Form,
    Standard,
}

/// Guess whether the document is a fillable form from its opening text.
pub fn detect_document_kind<'a>(fragments: impl IntoIterator<Item = &'a TextFragment>) -> DocumentKind {
    let sample = fragments
        .into_iter()
        .take(KIND_SAMPLE_SIZE)
        .map(|f| f.text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if ["form", "application"].iter().any(|w| sample.contains(w)) {
        DocumentKind::Form
    } else {
        DocumentKind::Standard
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Name used for a document in titles, logs and output file names.
pub fn document_identifier(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn all_fragments(pages: &[PageText]) -> Vec<TextFragment> {
    pages
        .iter()
        .flat_map(|p| p.fragments.iter().cloned())
        .collect()
}

/// Infer the outline of decoded pages.
///
/// The title comes from the first page, falling back to `identifier`.
/// Headings run through merge, statistics, classification, level assignment
/// and deduplication, in that order.
pub fn build_outline(pages: &[PageText], identifier: &str, config: &OutlineConfig) -> Outline {
    let fragments = all_fragments(pages);
    let lines = merge_lines(&fragments, config);
    let stats = analyze(&lines, config);

    let title = select_title(&lines, config).unwrap_or_else(|| fallback_title(identifier));

    let candidates: Vec<&MergedLine> = lines
        .iter()
        .filter(|line| classify(line, &stats, config).is_candidate())
        .collect();
    log::debug!(
        "{identifier}: {} fragments, {} lines, {} candidates",
        fragments.len(),
        lines.len(),
        candidates.len()
    );

    let headings = assign_levels(&candidates, &stats);
    let outline = dedup_headings(headings, config);

    Outline { title, outline }
}

/// Decode and outline one document.
///
/// The decoder handle is closed as soon as the pages are extracted, on the
/// success and the failure path alike. Decoder errors and panics, whether
/// raised by the decoder or during analysis, yield a degraded outline titled
/// with the document identifier.
pub fn process_document<D: DocumentDecoder>(
    decoder: &D,
    path: &Path,
    config: &OutlineConfig,
) -> DocumentOutcome {
    let identifier = document_identifier(path);

    let pages = match decode_pages(decoder, path) {
        Ok(pages) => pages,
        Err(cause) => {
            return DocumentOutcome::Degraded {
                outline: Outline::degraded(&identifier),
                cause,
            }
        }
    };

    log::debug!(
        "{identifier}: document kind {:?}",
        detect_document_kind(pages.iter().flat_map(|p| p.fragments.iter()))
    );

    match panic::catch_unwind(AssertUnwindSafe(|| {
        build_outline(&pages, &identifier, config)
    })) {
        Ok(outline) => DocumentOutcome::Success { outline },
        Err(payload) => DocumentOutcome::Degraded {
            outline: Outline::degraded(&identifier),
            cause: panic_message("analysis", payload.as_ref()),
        },
    }
}

/// Open, extract and close. Decoders may panic on malformed input, so both
/// calls run under `catch_unwind`; the handle is closed even if extraction
/// panicked.
fn decode_pages<D: DocumentDecoder>(decoder: &D, path: &Path) -> Result<Vec<PageText>, String> {
    let document = panic::catch_unwind(AssertUnwindSafe(|| decoder.open(path)))
        .map_err(|payload| panic_message("decoder", payload.as_ref()))?
        .map_err(|e| e.to_string())?;

    let pages = panic::catch_unwind(AssertUnwindSafe(|| document.pages()));
    document.close();

    match pages {
        Ok(pages) => pages.map_err(|e| e.to_string()),
        Err(payload) => Err(panic_message("decoder", payload.as_ref())),
    }
}

fn panic_message(stage: &str, payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("{stage} panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("{stage} panicked: {s}")
    } else {
        format!("{stage} panicked")
    }
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

/// A merged line together with the classifier's verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectedLine {
    #[serde(flatten)]
    pub line: MergedLine,
    pub classification: Classification,
}

/// Intermediate pipeline state for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub kind: DocumentKind,
    pub statistics: FontStatistics,
    pub lines: Vec<InspectedLine>,
}

/// Expose every intermediate stage of the pipeline, for debugging a corpus.
pub fn inspect(pages: &[PageText], config: &OutlineConfig) -> Inspection {
    let fragments = all_fragments(pages);
    let lines = merge_lines(&fragments, config);
    let statistics = analyze(&lines, config);

    let lines = lines
        .into_iter()
        .map(|line| {
            let classification = classify(&line, &statistics, config);
            InspectedLine {
                line,
                classification,
            }
        })
        .collect();

    Inspection {
        kind: detect_document_kind(&fragments),
        statistics,
        lines,
    }
}
