//! Disease likelihood chart: one bar per condition the classifier
//! scored, most likely first.

use super::{section_header, SectionContext, SECTION_HEADER_ADVANCE};
use crate::report::canvas::{Canvas, Rect, TextStyle};
use crate::report::confidence::{Bar, BarStyle, LabelPlacement};
use crate::report::input::ReportInput;
use crate::report::layout::{CONTENT_WIDTH, MARGIN_X, SECTION_GAP};
use crate::text::wrap;
use crate::writer::FontSpec;

/// Section title.
pub const TITLE: &str = "DISEASE LIKELIHOOD ANALYSIS";
/// Width of the condition name column.
pub const LABEL_COLUMN_WIDTH: f32 = 40.0;
/// Smallest visible bar, as a fraction of the track.
pub const MIN_BAR_FRACTION: f64 = 0.03;

const BAR_HEIGHT: f32 = 5.0;
const LABEL_LINE_HEIGHT: f32 = 4.0;
const ROW_GAP: f32 = 2.0;
const BESIDE_LABEL_ROOM: f32 = 18.0;

/// One measured chart row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    /// Wrapped condition name
    pub label_lines: Vec<String>,
    /// Probability in `[0, 1]`
    pub probability: f64,
    /// Whether this is the diagnosed condition
    pub predicted: bool,
    /// Row advance
    pub height: f32,
}

fn label_font(predicted: bool) -> FontSpec {
    if predicted {
        FontSpec::bold(8.0)
    } else {
        FontSpec::regular(8.0)
    }
}

/// Measure all rows, sorted by descending probability. Draws nothing.
pub fn measure(input: &ReportInput) -> Vec<ChartRow> {
    let predicted_label = input.predicted_label.trim().to_lowercase();
    input
        .ranked_probabilities()
        .into_iter()
        .map(|(label, probability)| {
            let predicted = label.trim().to_lowercase() == predicted_label;
            let lines = wrap(label, LABEL_COLUMN_WIDTH - 2.0, &label_font(predicted));
            let height = (lines.line_count() as f32 * LABEL_LINE_HEIGHT).max(BAR_HEIGHT) + ROW_GAP;
            ChartRow {
                label_lines: lines.lines,
                probability,
                predicted,
                height,
            }
        })
        .collect()
}

/// Bar for a row whose top is at `y`.
pub fn row_bar(probability: f64, y: f32) -> Bar {
    let track_x = MARGIN_X + LABEL_COLUMN_WIDTH + 2.0;
    let track_width = CONTENT_WIDTH - LABEL_COLUMN_WIDTH - 2.0 - BESIDE_LABEL_ROOM;
    Bar::layout(
        probability,
        Rect::new(track_x, y, track_width, BAR_HEIGHT),
        LabelPlacement::for_fraction(probability),
        BarStyle {
            decimals: 1,
            min_fraction: MIN_BAR_FRACTION,
            label_gap: 2.0,
        },
    )
}

/// Draw the chart at `y`. Without probabilities nothing is drawn.
pub fn draw(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    let rows = measure(input);
    let Some(first) = rows.first() else {
        return y;
    };
    let palette = &ctx.config.palette;

    let y = canvas.ensure_space(y, SECTION_HEADER_ADVANCE + first.height, "likelihood chart");
    let mut y = section_header(canvas, ctx, TITLE, y);

    for row in &rows {
        y = canvas.ensure_space(y, row.height, "likelihood row");
        let color = if row.predicted { palette.text } else { palette.muted };
        let style = TextStyle::new(label_font(row.predicted), color);
        for (i, line) in row.label_lines.iter().enumerate() {
            canvas.text(line, MARGIN_X + 2.0, y + 3.6 + i as f32 * LABEL_LINE_HEIGHT, style);
        }
        row_bar(row.probability, y).draw(canvas, palette, FontSpec::bold(7.0));
        y += row.height;
    }

    y + SECTION_GAP
}
