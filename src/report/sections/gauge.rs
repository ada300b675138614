//! Confidence gauge: a bar with the percentage beside it and one line
//! of interpretation underneath.

use super::{section_header, SectionContext, SECTION_HEADER_ADVANCE};
use crate::report::canvas::{Canvas, Rect, TextStyle};
use crate::report::confidence::{Bar, BarStyle, LabelPlacement};
use crate::report::input::ReportInput;
use crate::report::layout::{body_font, BODY_LINE_HEIGHT, CONTENT_WIDTH, MARGIN_X, SECTION_GAP};
use crate::text::wrap;
use crate::writer::FontSpec;

/// Section title.
pub const TITLE: &str = "CONFIDENCE SCORE";
/// Track height.
pub const GAUGE_HEIGHT: f32 = 6.0;
/// Track width; leaves room for the label on the right.
pub const GAUGE_WIDTH: f32 = CONTENT_WIDTH - 30.0;

/// Gauge bar for `score` with its track top at `y`.
pub fn gauge_bar(score: f64, y: f32) -> Bar {
    Bar::layout(
        score,
        Rect::new(MARGIN_X + 2.0, y, GAUGE_WIDTH, GAUGE_HEIGHT),
        LabelPlacement::Beside,
        BarStyle {
            decimals: 2,
            min_fraction: 0.0,
            label_gap: 5.0,
        },
    )
}

/// Draw the gauge section at `y`.
pub fn draw(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    let palette = &ctx.config.palette;
    let level_bar = gauge_bar(input.confidence_score, 0.0);
    let note = format!("* {}", level_bar.level.interpretation());
    let note_lines = wrap(&note, CONTENT_WIDTH - 4.0, &body_font());

    let needed = SECTION_HEADER_ADVANCE + GAUGE_HEIGHT + 6.0 + note_lines.height(BODY_LINE_HEIGHT);
    let y = canvas.ensure_space(y, needed, "confidence gauge");
    let y = section_header(canvas, ctx, TITLE, y);

    let bar = gauge_bar(input.confidence_score, y);
    bar.draw(canvas, palette, FontSpec::bold(10.0));

    let mut y = y + GAUGE_HEIGHT + 6.0;
    let style = TextStyle::new(body_font(), palette.text);
    for line in note_lines.iter() {
        canvas.text(line, MARGIN_X + 2.0, y, style);
        y += BODY_LINE_HEIGHT;
    }

    y + SECTION_GAP
}
