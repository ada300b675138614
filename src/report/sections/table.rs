//! Treatment recommendation table.
//!
//! Two columns, `#` and the recommendation, on a grid with alternating
//! row tint. The section is moved to a new page when its header, the
//! table header row and the first data row do not fit together, so a
//! table header never ends a page. After any later break the header
//! row is repeated. A row is only split across pages when it is taller
//! than a whole page.

use super::{section_header, SectionContext, SECTION_HEADER_ADVANCE};
use crate::report::canvas::{Canvas, Rect, TextStyle};
use crate::report::input::ReportInput;
use crate::report::layout::{body_font, Palette, CONTENT_WIDTH, MARGIN_X, SECTION_GAP};
use crate::text::{wrap, WrapResult};
use crate::writer::FontSpec;

/// Section title.
pub const TITLE: &str = "TREATMENT RECOMMENDATIONS";
/// Width of the `#` column.
pub const INDEX_COLUMN_WIDTH: f32 = 12.0;
/// Inner cell padding.
pub const CELL_PADDING: f32 = 2.0;
/// Height of the header row.
pub const HEADER_ROW_HEIGHT: f32 = 8.0;
/// Advance per wrapped line inside a row.
pub const ROW_LINE_HEIGHT: f32 = 4.5;
/// Width recommendation text wraps within.
pub const TEXT_WIDTH: f32 = CONTENT_WIDTH - INDEX_COLUMN_WIDTH - 2.0 * CELL_PADDING;

const GRID_LINE_WIDTH: f32 = 0.2;

/// Measured table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// Wrapped text of every row
    pub rows: Vec<WrapResult>,
}

impl TableLayout {
    /// Height of a row with `lines` lines.
    pub fn row_height(lines: usize) -> f32 {
        lines as f32 * ROW_LINE_HEIGHT + 2.0 * CELL_PADDING
    }

    /// Height of every data row.
    pub fn row_heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.rows.iter().map(|r| Self::row_height(r.line_count()))
    }

    /// Header row plus all data rows, ignoring page breaks.
    pub fn total_height(&self) -> f32 {
        HEADER_ROW_HEIGHT + self.row_heights().sum::<f32>()
    }
}

/// Wrap every recommendation. Draws nothing.
pub fn measure(items: &[String]) -> TableLayout {
    TableLayout {
        rows: items
            .iter()
            .map(|item| wrap(item, TEXT_WIDTH, &body_font()))
            .collect(),
    }
}

fn draw_header_row(canvas: &mut Canvas, palette: &Palette, y: f32) -> f32 {
    canvas.fill_rect(Rect::new(MARGIN_X, y, CONTENT_WIDTH, HEADER_ROW_HEIGHT), palette.header);
    let style = TextStyle::new(FontSpec::bold(10.0), palette.header_text);
    canvas.text("#", MARGIN_X + CELL_PADDING, y + 5.5, style);
    canvas.text(
        "Recommendation",
        MARGIN_X + INDEX_COLUMN_WIDTH + CELL_PADDING,
        y + 5.5,
        style,
    );
    y + HEADER_ROW_HEIGHT
}

fn draw_row_segment(
    canvas: &mut Canvas,
    palette: &Palette,
    index: Option<usize>,
    lines: &[String],
    tinted: bool,
    y: f32,
) -> f32 {
    let height = TableLayout::row_height(lines.len());
    let row = Rect::new(MARGIN_X, y, CONTENT_WIDTH, height);
    if tinted {
        canvas.fill_rect(row, palette.tint);
    }
    canvas.stroke_rect(
        Rect::new(MARGIN_X, y, INDEX_COLUMN_WIDTH, height),
        palette.border,
        GRID_LINE_WIDTH,
    );
    canvas.stroke_rect(
        Rect::new(MARGIN_X + INDEX_COLUMN_WIDTH, y, CONTENT_WIDTH - INDEX_COLUMN_WIDTH, height),
        palette.border,
        GRID_LINE_WIDTH,
    );

    let style = TextStyle::new(body_font(), palette.text);
    let first_baseline = y + CELL_PADDING + ROW_LINE_HEIGHT * 0.75;
    if let Some(index) = index {
        canvas.text(&(index + 1).to_string(), MARGIN_X + CELL_PADDING, first_baseline, style);
    }
    for (i, line) in lines.iter().enumerate() {
        canvas.text(
            line,
            MARGIN_X + INDEX_COLUMN_WIDTH + CELL_PADDING,
            first_baseline + i as f32 * ROW_LINE_HEIGHT,
            style,
        );
    }
    y + height
}

/// Room below a repeated header row on a fresh page.
fn page_room(canvas: &Canvas) -> f32 {
    canvas.bottom_limit() - canvas.top_margin() - HEADER_ROW_HEIGHT
}

/// Row lines that fit above the page bottom when starting at `y`.
fn lines_that_fit(canvas: &Canvas, y: f32) -> usize {
    let room = canvas.bottom_limit() - y - 2.0 * CELL_PADDING;
    if room < ROW_LINE_HEIGHT {
        0
    } else {
        (room / ROW_LINE_HEIGHT).floor() as usize
    }
}

/// Draw the section at `y`.
pub fn draw(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    let palette = &ctx.config.palette;
    let layout = measure(&input.treatment_items);
    // A row taller than a page starts where it is and gets split
    let first_row = match layout.row_heights().next() {
        Some(h) if h <= page_room(canvas) => h,
        Some(_) => TableLayout::row_height(1),
        None => 0.0,
    };

    let y = canvas.ensure_space(
        y,
        SECTION_HEADER_ADVANCE + HEADER_ROW_HEIGHT + first_row,
        "treatment table",
    );
    let y = section_header(canvas, ctx, TITLE, y);
    let mut y = draw_header_row(canvas, palette, y);
    let mut fresh_page = false;

    for (index, row) in layout.rows.iter().enumerate() {
        let lines = &row.lines;
        let mut start = 0;
        while start < lines.len() {
            let remaining = lines.len() - start;
            let fit = lines_that_fit(canvas, y);
            let fits_on_fresh_page = TableLayout::row_height(remaining) <= page_room(canvas);

            if !fresh_page && (fit == 0 || (fit < remaining && fits_on_fresh_page)) {
                y = canvas.new_page();
                log::debug!("Treatment table continues on page {}", canvas.page_count());
                y = draw_header_row(canvas, palette, y);
                fresh_page = true;
                continue;
            }

            let take = remaining.min(fit.max(1));
            let label = if start == 0 { Some(index) } else { None };
            y = draw_row_segment(
                canvas,
                palette,
                label,
                &lines[start..start + take],
                index % 2 == 1,
                y,
            );
            fresh_page = false;
            start += take;
        }
    }

    y + SECTION_GAP
}
