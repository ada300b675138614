//! Section builders.
//!
//! Every builder has the same shape: it takes the canvas, the shared
//! context, the record and the current cursor, draws its block and
//! returns the cursor below it. Each one measures its content before
//! drawing anything, and breaks the page itself when the block would
//! cross the footer area.

pub mod diagnosis;
pub mod disclaimer;
pub mod footer;
pub mod gauge;
pub mod header;
pub mod info_block;
pub mod likelihood;
pub mod lists;
pub mod table;

use super::canvas::{Canvas, Rect, TextStyle};
use super::input::ReportInput;
use super::layout::{ReportConfig, BAR_HEIGHT, CONTENT_WIDTH, MARGIN_X};
use crate::writer::FontSpec;

/// Read-only state shared by all builders.
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    /// Report configuration
    pub config: &'a ReportConfig,
    /// Whether the record's image should be embedded
    pub embed_image: bool,
}

/// Signature every section builder follows.
pub type SectionBuilder = fn(&mut Canvas, &SectionContext<'_>, &ReportInput, f32) -> f32;

/// Cursor advance of a section header bar.
pub const SECTION_HEADER_ADVANCE: f32 = 12.0;

/// Draw a grey full-width bar with a bold title; returns the cursor
/// below it.
pub fn section_header(canvas: &mut Canvas, ctx: &SectionContext<'_>, title: &str, y: f32) -> f32 {
    let palette = &ctx.config.palette;
    canvas.fill_rect(Rect::new(MARGIN_X, y, CONTENT_WIDTH, BAR_HEIGHT), palette.section_bar);
    canvas.text(
        title,
        MARGIN_X + 2.0,
        y + 5.5,
        TextStyle::new(FontSpec::bold(12.0), palette.section_title),
    );
    y + SECTION_HEADER_ADVANCE
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::super::input::{PatientInfo, ReportInput};
    use super::super::layout::{CONTENT_BOTTOM, PAGE_HEIGHT, PAGE_WIDTH, TOP_MARGIN};
    use super::Canvas;

    pub fn canvas() -> Canvas {
        Canvas::new(PAGE_WIDTH, PAGE_HEIGHT, TOP_MARGIN, CONTENT_BOTTOM)
    }

    pub fn record() -> ReportInput {
        ReportInput {
            predicted_label: "Acne".to_string(),
            confidence_score: 0.91,
            timestamp: "2024-03-09 14:05".to_string(),
            report_id: "R-1001".to_string(),
            patient: PatientInfo {
                name: Some("Jane Doe".to_string()),
                age: Some("34".to_string()),
                gender: Some("Female".to_string()),
                contact: Some("555-0100".to_string()),
                blood_group: Some("O+".to_string()),
                allergies: Some("None".to_string()),
                dermatologist_label: Some("Dr. Lee".to_string()),
            },
            treatment_items: vec![],
            prevention_items: vec![],
            resource_items: vec![],
            reviewer_comment: None,
            image: None,
            all_probabilities: None,
        }
    }
}
