//! Title banner across the top of the first page.

use super::SectionContext;
use crate::report::canvas::{Canvas, Rect, TextStyle};
use crate::report::input::ReportInput;
use crate::report::layout::{CONTENT_WIDTH, MARGIN_X};
use crate::text::{text_width, wrap};
use crate::writer::FontSpec;

/// Banner height for a single-line title.
pub const BANNER_MIN_HEIGHT: f32 = 16.0;
/// Narrowest the title may wrap to before the report tag moves below it.
pub const MIN_TITLE_WIDTH: f32 = CONTENT_WIDTH / 2.0;
const TITLE_LINE_HEIGHT: f32 = 7.0;
const TAG_LINE_HEIGHT: f32 = 4.5;
const INNER_WIDTH: f32 = CONTENT_WIDTH - 8.0;
const GAP_BELOW: f32 = 6.0;

/// Draw the banner at `y`.
pub fn draw(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    let palette = &ctx.config.palette;
    let title_font = FontSpec::bold(16.0);
    let sub_font = FontSpec::regular(9.0);

    let report_tag = format!("Report {}", input.report_id.trim());
    let tag_width = text_width(&report_tag, &sub_font);
    let beside_width = CONTENT_WIDTH - 12.0 - tag_width;
    let tag_beside = beside_width >= MIN_TITLE_WIDTH;

    let title_width = if tag_beside { beside_width } else { INNER_WIDTH };
    let title_lines = wrap(&ctx.config.title, title_width, &title_font);
    let tag_lines = (!tag_beside).then(|| wrap(&report_tag, INNER_WIDTH, &sub_font));
    let tag_height = tag_lines
        .as_ref()
        .map_or(0.0, |lines| lines.height(TAG_LINE_HEIGHT));
    let title_extra = (title_lines.line_count() - 1) as f32 * TITLE_LINE_HEIGHT;
    let height = BANNER_MIN_HEIGHT + title_extra + tag_height;

    canvas.fill_rect(Rect::new(MARGIN_X, y, CONTENT_WIDTH, height), palette.header);

    let title_style = TextStyle::new(title_font, palette.header_text);
    for (i, line) in title_lines.iter().enumerate() {
        canvas.text(line, MARGIN_X + 4.0, y + 7.5 + i as f32 * TITLE_LINE_HEIGHT, title_style);
    }

    let sub_style = TextStyle::new(sub_font, palette.header_text);
    canvas.text(&ctx.config.branding, MARGIN_X + 4.0, y + height - 3.0, sub_style);
    match tag_lines {
        None => canvas.text(
            &report_tag,
            MARGIN_X + CONTENT_WIDTH - 4.0 - tag_width,
            y + 7.5,
            sub_style,
        ),
        Some(lines) => {
            // Under the title, above the branding line
            let first = y + 7.5 + title_extra + 5.0;
            for (i, line) in lines.iter().enumerate() {
                canvas.text(line, MARGIN_X + 4.0, first + i as f32 * TAG_LINE_HEIGHT, sub_style);
            }
        },
    }

    y + height + GAP_BELOW
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{canvas, record};
    use super::*;
    use crate::report::canvas::DrawCommand;
    use crate::report::layout::ReportConfig;

    fn texts(canvas: &Canvas) -> Vec<String> {
        canvas
            .commands(0)
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_banner() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut canvas = canvas();
        let y = draw(&mut canvas, &ctx, &record(), 20.0);
        assert_eq!(y, 20.0 + BANNER_MIN_HEIGHT + 6.0);

        let texts = texts(&canvas);
        assert!(texts.contains(&"DERMATOLOGY ANALYSIS REPORT".to_string()));
        assert!(texts.contains(&"FacialDerma AI".to_string()));
        assert!(texts.contains(&"Report R-1001".to_string()));
    }

    #[test]
    fn test_long_title_grows_banner() {
        let config = ReportConfig::default()
            .with_title("COMPREHENSIVE DERMATOLOGICAL ASSESSMENT AND TREATMENT PLANNING SUMMARY");
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut canvas = canvas();
        let y = draw(&mut canvas, &ctx, &record(), 20.0);
        assert!(y > 20.0 + BANNER_MIN_HEIGHT + 6.0);
    }

    #[test]
    fn test_long_report_id_moves_below_title() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut input = record();
        input.report_id = "X".repeat(120);
        let mut canvas = canvas();
        let y = draw(&mut canvas, &ctx, &input, 20.0);

        let banner = canvas
            .commands(0)
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert!(banner.height < 30.0, "banner {} tall", banner.height);
        assert_eq!(y, banner.bottom() + 6.0);

        let commands = canvas.commands(0);
        let title = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { text, .. } if text == "DERMATOLOGY ANALYSIS REPORT"))
            .count();
        assert_eq!(title, 1);
        for command in commands {
            if let DrawCommand::Text { text, x, y, style } = command {
                assert!(*y < banner.bottom());
                assert!(*x + text_width(text, &style.font) <= banner.right() + 1e-3);
            }
        }
    }
}
