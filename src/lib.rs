// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Derma Report
//!
//! Print-ready dermatology diagnosis reports as PDF.
//!
//! ## Core Features
//!
//! - **Text Measurement**: Base-14 Helvetica metrics, greedy word wrap with hard breaks
//! - **Dynamic Layout**: boxes sized from measured content, never clipped
//! - **Pagination**: every section breaks the page before crossing the footer area
//! - **Confidence Display**: one threshold classifier for the gauge and the likelihood chart
//! - **Deterministic Output**: identical records produce identical bytes
//! - **Export**: save to a file or return an `application/pdf` blob for sharing
//!
//! ## Architecture
//!
//! - [`writer`]: low-level PDF object model, content streams, fonts, images
//! - [`text`]: millimetre measurement and wrapping
//! - [`report`]: canvas, section builders, assembler and export adapter
//!
//! ## Quick Start
//!
//! ```ignore
//! use derma_report::report::{ExportAdapter, FileDownloadSink, ReportConfig, ReportInput};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = ReportInput::from_json(&std::fs::read_to_string("record.json")?)?;
//! let adapter = ExportAdapter::new(ReportConfig::default());
//! let path = adapter.save(Some(&input), true, &FileDownloadSink::new("reports"))?;
//! println!("saved {}", path.display());
//! # Ok(())
//! # }
//! ```

// Error handling
pub mod error;

// Core PDF object types
pub mod object;

// PDF writing
pub mod writer;

// Measurement and wrapping
pub mod text;

// Report layout and export
pub mod report;

pub use error::{Error, Result};
pub use report::{DocumentAssembler, ExportAdapter, ReportConfig, ReportInput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
