//! Runs the section builders top to bottom and serializes the result.

use super::canvas::Canvas;
use super::input::ReportInput;
use super::layout::{ReportConfig, CONTENT_BOTTOM, PAGE_HEIGHT, PAGE_WIDTH, TOP_MARGIN};
use super::sections::{
    diagnosis, disclaimer, footer, gauge, header, info_block, likelihood, lists, table,
    SectionBuilder, SectionContext,
};
use crate::error::Result;

/// Body sections in print order.
const SECTIONS: &[(&str, SectionBuilder)] = &[
    ("header", header::draw),
    ("info block", info_block::draw),
    ("diagnosis", diagnosis::draw),
    ("confidence gauge", gauge::draw),
    ("likelihood chart", likelihood::draw),
    ("treatment table", table::draw),
    ("prevention", lists::draw_prevention),
    ("resources", lists::draw_resources),
    ("reviewer note", lists::draw_reviewer),
    ("disclaimer", disclaimer::draw),
];

/// A serialized report.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledReport {
    /// Complete PDF file
    pub bytes: Vec<u8>,
    /// Pages in the document
    pub page_count: usize,
}

/// Builds report documents from records.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    config: ReportConfig,
}

impl DocumentAssembler {
    /// Create an assembler with `config`.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Lay out every page without serializing.
    ///
    /// The record is validated first; an invalid record never reaches
    /// the canvas.
    pub fn layout(&self, input: &ReportInput, embed_image: bool) -> Result<Canvas> {
        input.validate()?;

        let ctx = SectionContext {
            config: &self.config,
            embed_image,
        };
        let mut canvas = Canvas::new(PAGE_WIDTH, PAGE_HEIGHT, TOP_MARGIN, CONTENT_BOTTOM);
        let mut y = TOP_MARGIN;
        for (name, build) in SECTIONS {
            y = build(&mut canvas, &ctx, input, y);
            log::debug!("Laid out {} (cursor {:.1} on page {})", name, y, canvas.page_count());
        }
        footer::draw_footers(&mut canvas, &self.config, input);
        Ok(canvas)
    }

    /// Lay out and serialize a report.
    pub fn assemble(&self, input: &ReportInput, embed_image: bool) -> Result<AssembledReport> {
        log::info!("Assembling report {} ({})", input.report_id, input.predicted_label);
        let canvas = self.layout(input, embed_image)?;
        let bytes = canvas.render(self.config.writer_config(input.predicted_label.trim()))?;
        log::info!(
            "Assembled report {}: {} pages, {} bytes",
            input.report_id,
            canvas.page_count(),
            bytes.len()
        );
        Ok(AssembledReport {
            bytes,
            page_count: canvas.page_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::sections::test_support::record;
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_single_page_report() {
        let report = DocumentAssembler::default().assemble(&record(), false).unwrap();
        assert_eq!(report.page_count, 1);
        assert!(report.bytes.starts_with(b"%PDF-1.7"));
        assert!(report.bytes.ends_with(b"%%EOF"));
    }

    #[test]
    fn test_missing_label_aborts_before_layout() {
        let mut input = record();
        input.predicted_label = "   ".to_string();
        let err = DocumentAssembler::default().layout(&input, false).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let mut input = record();
        input.confidence_score = 1.2;
        let err = DocumentAssembler::default().assemble(&input, false).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let assembler = DocumentAssembler::default();
        let mut input = record();
        input.treatment_items = vec!["Topical retinoid".to_string()];
        let a = assembler.assemble(&input, true).unwrap();
        let b = assembler.assemble(&input, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_long_record_paginates() {
        let mut input = record();
        input.treatment_items = (0..80).map(|i| format!("Treatment step {}", i)).collect();
        let canvas = DocumentAssembler::default().layout(&input, false).unwrap();
        assert!(canvas.page_count() > 1);
        let last = canvas.page_count() - 1;
        let label = footer::page_label(last, canvas.page_count());
        assert!(canvas.commands(last).iter().any(|c| matches!(
            c,
            crate::report::canvas::DrawCommand::Text { text, .. } if *text == label
        )));
    }
}
