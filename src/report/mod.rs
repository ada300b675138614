//! Dermatology report layout and export.
//!
//! ```text
//! ReportInput ──► DocumentAssembler ──► section builders ──► Canvas
//!                        │                                      │
//!                        ▼                                      ▼
//!                  ExportAdapter ◄──────── PDF bytes ◄──── PdfWriter
//! ```
//!
//! Section builders measure before they draw and advance a shared
//! vertical cursor. The assembler owns page breaks through
//! [`Canvas::ensure_space`] and stamps footers once the page count is
//! known.

pub mod assembler;
pub mod canvas;
pub mod confidence;
pub mod export;
pub mod field;
pub mod input;
pub mod layout;
pub mod sections;

pub use assembler::{AssembledReport, DocumentAssembler};
pub use canvas::{Canvas, DrawCommand, Rect, TextStyle};
pub use confidence::{Bar, BarStyle, ConfidenceLevel, LabelPlacement};
pub use export::{
    report_filename, DownloadSink, ExportAdapter, ExportMode, ExportOptions, ExportOutput,
    FileDownloadSink, LogNotifier, Notifier, PdfBlob, ShareError, ShareOutcome, ShareSink,
    PDF_MIME_TYPE,
};
pub use field::{FieldRenderer, MeasuredField};
pub use input::{ImageRef, PatientInfo, ReportInput, SkinCondition, TreatmentCatalog, NOT_AVAILABLE};
pub use layout::{Palette, ReportConfig};
