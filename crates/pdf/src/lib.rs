//! PDF decoding for the outline pipeline.
//!
//! Wraps `lopdf` behind the [`DocumentDecoder`] seam from `pdfoutline_core`:
//! [`LopdfDecoder`] opens files, [`PdfDocument`] yields one
//! [`PageText`] per page with the text fragments found in its content stream.

use std::path::Path;

use pdfoutline_core::fragment::PageText;
use pdfoutline_core::pipeline::{DecodedDocument, DocumentDecoder};
use thiserror::Error;

use parser::backend::LopdfBackend;

pub mod parser;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Opens PDF files with `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfDecoder;

impl DocumentDecoder for LopdfDecoder {
    type Document = PdfDocument;
    type Error = PdfError;

    fn open(&self, path: &Path) -> Result<PdfDocument, PdfError> {
        let backend = LopdfBackend::load_path(path)?;
        log::trace!("opened {} ({} pages)", path.display(), backend.page_count());
        Ok(PdfDocument { backend })
    }
}

/// An open PDF document.
pub struct PdfDocument {
    backend: LopdfBackend,
}

impl PdfDocument {
    /// Open a document already held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        Ok(PdfDocument {
            backend: LopdfBackend::load_bytes(bytes)?,
        })
    }

    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }
}

impl DecodedDocument for PdfDocument {
    type Error = PdfError;

    fn pages(&self) -> Result<Vec<PageText>, PdfError> {
        parser::extract::extract_all_pages(&self.backend)
    }

    fn close(self) {
        log::trace!("closing document ({} pages)", self.backend.page_count());
        drop(self.backend);
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions
// ---------------------------------------------------------------------------

/// Decode every page of an in-memory PDF.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<PageText>, PdfError> {
    let document = PdfDocument::from_bytes(bytes)?;
    let pages = document.pages();
    document.close();
    pages
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
