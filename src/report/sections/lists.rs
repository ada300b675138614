//! Numbered lists and the reviewer note.
//!
//! These blocks are drawn line by line. Only the first line is kept
//! together with the section header; every later line breaks the page
//! on its own when it would cross into the footer area.

use super::{section_header, SectionContext, SECTION_HEADER_ADVANCE};
use crate::report::canvas::{Canvas, TextStyle};
use crate::report::input::ReportInput;
use crate::report::layout::{body_font, BODY_LINE_HEIGHT, CONTENT_WIDTH, MARGIN_X, SECTION_GAP};
use crate::text::{line_height, wrap, WrapResult};
use crate::writer::FontSpec;

/// Prevention section title.
pub const PREVENTION_TITLE: &str = "PREVENTION GUIDELINES";
/// Resources section title.
pub const RESOURCES_TITLE: &str = "HELPFUL RESOURCES";
/// Reviewer section title.
pub const REVIEWER_TITLE: &str = "DERMATOLOGIST REVIEW";

/// Offset of an item's text from its number.
pub const ITEM_INDENT: f32 = 6.0;
/// Width item text wraps within.
pub const ITEM_WIDTH: f32 = CONTENT_WIDTH - 2.0 - ITEM_INDENT;

/// Wrap every item of a numbered list.
pub fn measure_items(items: &[String]) -> Vec<WrapResult> {
    items
        .iter()
        .map(|item| wrap(item, ITEM_WIDTH, &body_font()))
        .collect()
}

fn numbered_list(
    canvas: &mut Canvas,
    ctx: &SectionContext<'_>,
    title: &str,
    items: &[String],
    y: f32,
) -> f32 {
    if items.is_empty() {
        return y;
    }
    let style = TextStyle::new(body_font(), ctx.config.palette.text);
    let wrapped = measure_items(items);

    let mut y = canvas.ensure_space(y, SECTION_HEADER_ADVANCE + BODY_LINE_HEIGHT, title);
    y = section_header(canvas, ctx, title, y);

    for (index, item) in wrapped.iter().enumerate() {
        for (line_no, line) in item.iter().enumerate() {
            y = canvas.ensure_space(y, BODY_LINE_HEIGHT, title);
            let baseline = y + BODY_LINE_HEIGHT * 0.75;
            if line_no == 0 {
                canvas.text(&format!("{}.", index + 1), MARGIN_X + 2.0, baseline, style);
            }
            canvas.text(line, MARGIN_X + 2.0 + ITEM_INDENT, baseline, style);
            y += BODY_LINE_HEIGHT;
        }
    }

    y + SECTION_GAP
}

/// Draw the prevention list at `y`; nothing when the list is empty.
pub fn draw_prevention(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    numbered_list(canvas, ctx, PREVENTION_TITLE, &input.prevention_items, y)
}

/// Draw the resource list at `y`; nothing when the list is empty.
pub fn draw_resources(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    numbered_list(canvas, ctx, RESOURCES_TITLE, &input.resource_items, y)
}

/// Draw the reviewer's comment at `y`; nothing when there is none.
pub fn draw_reviewer(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    let Some(note) = input.reviewer_note() else {
        return y;
    };
    let font = FontSpec::regular(10.0);
    let advance = line_height(&font);
    let lines = wrap(note, CONTENT_WIDTH - 4.0, &font);
    let style = TextStyle::new(font, ctx.config.palette.text);

    let mut y = canvas.ensure_space(y, SECTION_HEADER_ADVANCE + advance, REVIEWER_TITLE);
    y = section_header(canvas, ctx, REVIEWER_TITLE, y);
    for line in lines.iter() {
        y = canvas.ensure_space(y, advance, REVIEWER_TITLE);
        canvas.text(line, MARGIN_X + 2.0, y + advance * 0.75, style);
        y += advance;
    }

    y + SECTION_GAP
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{canvas, record};
    use super::*;
    use crate::report::canvas::DrawCommand;
    use crate::report::layout::{ReportConfig, CONTENT_BOTTOM, TOP_MARGIN};

    fn texts(canvas: &Canvas, page: usize) -> Vec<String> {
        canvas
            .commands(page)
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_lists_are_skipped() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut canvas = canvas();
        let input = record();
        assert_eq!(draw_prevention(&mut canvas, &ctx, &input, 120.0), 120.0);
        assert_eq!(draw_resources(&mut canvas, &ctx, &input, 120.0), 120.0);
        assert_eq!(draw_reviewer(&mut canvas, &ctx, &input, 120.0), 120.0);
        assert!(canvas.commands(0).is_empty());
    }

    #[test]
    fn test_items_are_numbered() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut input = record();
        input.prevention_items = vec!["Wash twice daily".to_string(), "Avoid picking".to_string()];
        let mut canvas = canvas();
        let y = draw_prevention(&mut canvas, &ctx, &input, 100.0);
        assert_eq!(y, 100.0 + SECTION_HEADER_ADVANCE + 2.0 * BODY_LINE_HEIGHT + SECTION_GAP);

        let texts = texts(&canvas, 0);
        assert_eq!(
            texts,
            vec![PREVENTION_TITLE, "1.", "Wash twice daily", "2.", "Avoid picking"]
        );
    }

    #[test]
    fn test_list_continues_on_next_page() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut input = record();
        input.resource_items = (1..=10).map(|i| format!("Resource {}", i)).collect();
        let mut canvas = canvas();
        draw_resources(&mut canvas, &ctx, &input, CONTENT_BOTTOM - 30.0);

        assert_eq!(canvas.page_count(), 2);
        let second = texts(&canvas, 1);
        assert!(!second.contains(&RESOURCES_TITLE.to_string()));
        assert!(second.contains(&"Resource 10".to_string()));
        let first_baseline = canvas
            .commands(1)
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { y, .. } => Some(*y),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_baseline, TOP_MARGIN + BODY_LINE_HEIGHT * 0.75);
    }

    #[test]
    fn test_header_not_left_alone() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut input = record();
        input.prevention_items = vec!["Use sunscreen".to_string()];
        let mut canvas = canvas();
        draw_prevention(&mut canvas, &ctx, &input, CONTENT_BOTTOM - SECTION_HEADER_ADVANCE - 1.0);

        assert!(canvas.commands(0).is_empty());
        assert_eq!(texts(&canvas, 1)[0], PREVENTION_TITLE);
    }

    #[test]
    fn test_reviewer_note() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut input = record();
        input.reviewer_comment = Some("  Agree with the assessment. Follow up in six weeks.  ".to_string());
        let mut canvas = canvas();
        draw_reviewer(&mut canvas, &ctx, &input, 100.0);

        let texts = texts(&canvas, 0);
        assert_eq!(texts[0], REVIEWER_TITLE);
        assert_eq!(texts[1], "Agree with the assessment. Follow up in six weeks.");
    }
}
