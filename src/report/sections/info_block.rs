//! Two-column block: report details on the left, patient demographics
//! on the right.
//!
//! Both boxes are drawn at the same height, the taller of the two
//! measured columns. All fields are wrapped first, the borders are
//! drawn next, and the text goes on top last.

use std::ops::Range;

use super::SectionContext;
use crate::report::canvas::{Canvas, Rect, TextStyle};
use crate::report::field::{FieldRenderer, MeasuredField};
use crate::report::input::{ReportInput, NOT_AVAILABLE};
use crate::report::layout::{
    body_font, key_font, Palette, BAR_HEIGHT, BOX_PADDING, COLUMN_GAP, COLUMN_WIDTH, FIELD_GAP,
    FIELD_LINE_HEIGHT, FIELD_VALUE_WIDTH, KEY_COLUMN_WIDTH, MARGIN_X, SECTION_GAP,
};
use crate::writer::FontSpec;

/// Left column heading.
pub const LEFT_TITLE: &str = "REPORT DETAILS";
/// Right column heading.
pub const RIGHT_TITLE: &str = "PATIENT DEMOGRAPHICS";

/// Left edge of the left column.
pub const LEFT_X: f32 = MARGIN_X;
/// Left edge of the right column.
pub const RIGHT_X: f32 = MARGIN_X + COLUMN_WIDTH + COLUMN_GAP;

/// Measured block, before anything is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoBlockLayout {
    /// Report detail fields
    pub left: Vec<MeasuredField>,
    /// Patient fields
    pub right: Vec<MeasuredField>,
    /// Content height of the left column
    pub left_height: f32,
    /// Content height of the right column
    pub right_height: f32,
    /// Height shared by both boxes, padding included
    pub box_height: f32,
}

/// Field renderer used in both columns.
pub fn field_renderer(palette: &Palette) -> FieldRenderer {
    FieldRenderer {
        key_column_width: KEY_COLUMN_WIDTH,
        value_max_width: FIELD_VALUE_WIDTH,
        line_height: FIELD_LINE_HEIGHT,
        key_style: TextStyle::new(key_font(), palette.text),
        value_style: TextStyle::new(body_font(), palette.text),
    }
}

fn or_na(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Report detail rows, in display order.
pub fn left_fields(input: &ReportInput) -> Vec<(&'static str, String)> {
    vec![
        ("Report ID", or_na(&input.report_id)),
        ("Date", or_na(&input.timestamp)),
        ("Method", "AI Deep Learning Model".to_string()),
        ("Status", "Completed".to_string()),
    ]
}

/// Patient rows, in display order. Absent values read `"N/A"`.
pub fn right_fields(input: &ReportInput) -> Vec<(&'static str, String)> {
    let patient = &input.patient;
    vec![
        ("Name", patient.name().to_string()),
        ("Age/Gender", patient.age_gender()),
        ("Contact", patient.contact().to_string()),
        ("Blood Group", patient.blood_group().to_string()),
        ("Dermatologist", patient.dermatologist().to_string()),
        ("Allergies", patient.allergies().to_string()),
    ]
}

fn column_height(renderer: &FieldRenderer, fields: &[MeasuredField]) -> f32 {
    let lines: f32 = fields.iter().map(|f| renderer.height(f)).sum();
    lines + FIELD_GAP * fields.len().saturating_sub(1) as f32
}

/// Wrap every field and size the boxes. Draws nothing.
pub fn measure(input: &ReportInput, renderer: &FieldRenderer) -> InfoBlockLayout {
    let measure_all = |fields: Vec<(&'static str, String)>| -> Vec<MeasuredField> {
        fields
            .iter()
            .map(|(key, value)| renderer.measure(key, value))
            .collect()
    };
    let left = measure_all(left_fields(input));
    let right = measure_all(right_fields(input));
    let left_height = column_height(renderer, &left);
    let right_height = column_height(renderer, &right);
    let box_height = 2.0 * BOX_PADDING + left_height.max(right_height);

    InfoBlockLayout {
        left,
        right,
        left_height,
        right_height,
        box_height,
    }
}

/// Offset of each field's first line from the top of its column.
fn field_offsets(renderer: &FieldRenderer, fields: &[MeasuredField]) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(fields.len());
    let mut top = 0.0;
    for field in fields {
        offsets.push(top);
        top += renderer.height(field) + FIELD_GAP;
    }
    offsets
}

/// Lines of one field placed in a box segment.
struct Run<'a> {
    x: f32,
    field: &'a MeasuredField,
    lines: Range<usize>,
    offset: f32,
}

/// Draw the block with its heading bars at `y`.
///
/// A block taller than a page is continued on the next one. Both
/// columns break at the same content offset so the two boxes keep
/// matching heights, and the heading bars repeat above every segment.
pub fn draw(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    let palette = &ctx.config.palette;
    let renderer = field_renderer(palette);
    let layout = measure(input, &renderer);
    let lh = renderer.line_height;

    let whole = BAR_HEIGHT + layout.box_height;
    let needed = if whole <= canvas.bottom_limit() - canvas.top_margin() {
        whole
    } else {
        BAR_HEIGHT + 2.0 * BOX_PADDING + lh
    };
    let mut y = canvas.ensure_space(y, needed, "info block");

    let columns = [
        (LEFT_X, &layout.left, field_offsets(&renderer, &layout.left)),
        (RIGHT_X, &layout.right, field_offsets(&renderer, &layout.right)),
    ];
    let heading = TextStyle::new(FontSpec::bold(11.0), palette.header_text);
    let mut segment_start = 0.0_f32;

    loop {
        for (x, title) in [(LEFT_X, LEFT_TITLE), (RIGHT_X, RIGHT_TITLE)] {
            canvas.fill_rect(Rect::new(x, y, COLUMN_WIDTH, BAR_HEIGHT), palette.header);
            canvas.text(title, x + BOX_PADDING, y + 5.5, heading);
        }
        let box_top = y + BAR_HEIGHT;
        let room = (canvas.bottom_limit() - box_top - 2.0 * BOX_PADDING).max(lh);
        let segment_end = segment_start + room;

        let mut runs = Vec::new();
        let mut content_end = segment_start;
        let mut next_start: Option<f32> = None;
        for (x, fields, offsets) in &columns {
            for (field, &offset) in fields.iter().zip(offsets) {
                let line_top = |j: usize| offset + j as f32 * lh;
                let count = field.lines_consumed();
                let Some(first) = (0..count).find(|&j| line_top(j) >= segment_start) else {
                    continue;
                };
                let mut last = first;
                while last < count && line_top(last) + lh <= segment_end {
                    last += 1;
                }
                if last > first {
                    content_end = content_end.max(line_top(last - 1) + lh);
                    runs.push(Run {
                        x: *x,
                        field,
                        lines: first..last,
                        offset: line_top(first),
                    });
                }
                if last < count {
                    let pending = line_top(last);
                    next_start = Some(next_start.map_or(pending, |n: f32| n.min(pending)));
                }
            }
        }

        let box_height = if segment_start == 0.0 && next_start.is_none() {
            layout.box_height
        } else {
            2.0 * BOX_PADDING + (content_end - segment_start)
        };
        for x in [LEFT_X, RIGHT_X] {
            canvas.stroke_rect(Rect::new(x, box_top, COLUMN_WIDTH, box_height), palette.border, 0.3);
        }
        for run in runs {
            let top = box_top + BOX_PADDING + (run.offset - segment_start);
            renderer.draw_lines(canvas, run.field, run.lines, run.x + BOX_PADDING, top);
        }

        match next_start {
            Some(start) => {
                segment_start = start;
                y = canvas.new_page();
                log::debug!("Info block continues on page {}", canvas.page_count());
            },
            None => return box_top + box_height + SECTION_GAP,
        }
    }
}
