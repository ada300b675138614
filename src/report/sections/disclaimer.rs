//! Disclaimer box closing the report body.

use super::SectionContext;
use crate::report::canvas::{Canvas, Rect, TextStyle};
use crate::report::input::ReportInput;
use crate::report::layout::{BOX_PADDING, CONTENT_WIDTH, MARGIN_X, SECTION_GAP};
use crate::text::{wrap, WrapResult};
use crate::writer::FontSpec;

/// Advance per disclaimer line.
pub const LINE_HEIGHT: f32 = 4.0;

fn font() -> FontSpec {
    FontSpec::regular(8.0).italic()
}

/// Wrap the disclaimer and return it with the box height.
pub fn measure(text: &str) -> (WrapResult, f32) {
    let lines = wrap(text, CONTENT_WIDTH - 2.0 * BOX_PADDING, &font());
    let height = 2.0 * BOX_PADDING + lines.height(LINE_HEIGHT);
    (lines, height)
}

/// Draw the disclaimer box at `y`.
pub fn draw(canvas: &mut Canvas, ctx: &SectionContext<'_>, _input: &ReportInput, y: f32) -> f32 {
    let palette = &ctx.config.palette;
    let text = ctx.config.disclaimer.trim();
    if text.is_empty() {
        return y;
    }
    let (lines, height) = measure(text);
    let y = canvas.ensure_space(y, height, "disclaimer");

    let frame = Rect::new(MARGIN_X, y, CONTENT_WIDTH, height);
    canvas.fill_rect(frame, palette.disclaimer_fill);
    canvas.stroke_rect(frame, palette.disclaimer_border, 0.4);

    let style = TextStyle::new(font(), palette.disclaimer_text);
    let mut baseline = y + BOX_PADDING + LINE_HEIGHT * 0.75;
    for line in lines.iter() {
        canvas.text(line, MARGIN_X + BOX_PADDING, baseline, style);
        baseline += LINE_HEIGHT;
    }

    frame.bottom() + SECTION_GAP
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{canvas, record};
    use super::*;
    use crate::report::canvas::DrawCommand;
    use crate::report::layout::{ReportConfig, CONTENT_BOTTOM, DEFAULT_DISCLAIMER};

    #[test]
    fn test_box_wraps_text() {
        let (lines, height) = measure(DEFAULT_DISCLAIMER);
        assert!(lines.line_count() > 1);
        assert_eq!(height, 2.0 * BOX_PADDING + lines.line_count() as f32 * LINE_HEIGHT);
    }

    #[test]
    fn test_draws_box_and_text() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut canvas = canvas();
        let y = draw(&mut canvas, &ctx, &record(), 100.0);
        let (lines, height) = measure(DEFAULT_DISCLAIMER);
        assert_eq!(y, 100.0 + height + SECTION_GAP);

        let commands = canvas.commands(0);
        assert!(matches!(commands[0], DrawCommand::FillRect { color, .. } if color == config.palette.disclaimer_fill));
        assert!(matches!(commands[1], DrawCommand::StrokeRect { color, .. } if color == config.palette.disclaimer_border));
        assert_eq!(commands.len(), 2 + lines.line_count());
    }

    #[test]
    fn test_moves_to_next_page_whole() {
        let config = ReportConfig::default();
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut canvas = canvas();
        draw(&mut canvas, &ctx, &record(), CONTENT_BOTTOM - 5.0);
        assert_eq!(canvas.page_count(), 2);
        assert!(canvas.commands(0).is_empty());
    }

    #[test]
    fn test_blank_disclaimer_skipped() {
        let config = ReportConfig::default().with_disclaimer("  ");
        let ctx = SectionContext {
            config: &config,
            embed_image: false,
        };
        let mut canvas = canvas();
        assert_eq!(draw(&mut canvas, &ctx, &record(), 100.0), 100.0);
    }
}
