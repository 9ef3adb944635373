//! Core library for pdfoutline
//!
//! This crate implements the **Functional Core** of the pdfoutline application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The workspace is split in three crates:
//!
//! - **`pdfoutline_core`** (this crate): the outline-inference pipeline, free of I/O
//! - **`pdf`**: the document decoder that turns PDF files into positioned text fragments
//! - **`pdfoutline`**: batch discovery, persistence and reporting (the Imperative Shell)
//!
//! The only boundary this crate has with the outside world is the
//! [`pipeline::DocumentDecoder`] trait. Everything else takes data in and
//! returns new data.
//!
//! # Pipeline
//!
//! ```text
//! TextFragment[]  ->  MergedLine[]  ->  FontStatistics  ->  candidates  ->  Heading[]  ->  Outline
//!                     merge             stats               classify        levels
//!                                                                           title
//! ```
//!
//! # Module Organization
//!
//! - [`fragment`]: decoder output (pages and text fragments)
//! - [`config`]: tunable thresholds shared by every stage
//! - [`merge`]: fragment -> visual line clustering
//! - [`stats`]: body size and significant heading sizes
//! - [`classify`]: heading candidate rule cascade
//! - [`levels`]: size -> heading level mapping and deduplication
//! - [`title`]: document title selection and filename fallback
//! - [`outline`]: output records
//! - [`pipeline`]: per-document orchestration over a decoder
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use pdfoutline_core::{build_outline, OutlineConfig, PageText};
//!
//! let pages: Vec<PageText> = decode_somehow();
//! let outline = build_outline(&pages, "annual_report", &OutlineConfig::default());
//! println!("{}", outline.title);
//! ```

pub mod classify;
pub mod config;
pub mod fragment;
pub mod levels;
pub mod merge;
pub mod outline;
pub mod pipeline;
pub mod stats;
pub mod text;
pub mod title;

pub use classify::{Classification, Rule};
pub use config::{ConfigError, OutlineConfig};
pub use fragment::{BBox, PageText, TextFragment};
pub use merge::MergedLine;
pub use outline::{Heading, HeadingLevel, Outline};
pub use pipeline::{build_outline, process_document, DocumentOutcome};
pub use stats::FontStatistics;
