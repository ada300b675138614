//! PDF writing module for generating report files.
//!
//! ## Architecture
//!
//! ```text
//! drawing calls (points, bottom-left origin)
//!     ↓
//! [PageBuilder] (per-page drawing surface)
//!     ↓
//! [ContentStreamBuilder] (operations → content stream bytes)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use derma_report::writer::{Color, FontSpec, PdfWriter};
//!
//! let mut writer = PdfWriter::new();
//! let mut page = writer.add_a4_page();
//! page.add_text("Hello, World!", 72.0, 720.0, &FontSpec::regular(12.0), Color::black());
//! page.finish();
//! let bytes = writer.finish()?;
//! ```

mod content_stream;
mod font_manager;
mod image_handler;
mod object_serializer;
mod pdf_writer;

pub use content_stream::{Color, ContentStreamBuilder, ContentStreamOp};
pub use font_manager::{
    encode_win_ansi, win_ansi_code, FontInfo, FontManager, FontSpec, FontWeight, HELVETICA,
    HELVETICA_BOLD, HELVETICA_BOLD_OBLIQUE, HELVETICA_OBLIQUE,
};
pub use image_handler::{ColorSpace, ImageData, ImageError, ImageFormat};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{ImageId, PageBuilder, PdfWriter, PdfWriterConfig};
