//! Diagnosis highlight box.
//!
//! The condition name is set large and wrapped to the box; the box grows
//! with the number of lines instead of clipping. With an embedded image
//! the name moves right of a 55 mm picture.

use super::{section_header, SectionContext, SECTION_HEADER_ADVANCE};
use crate::report::canvas::{Canvas, Rect, TextStyle};
use crate::report::input::ReportInput;
use crate::report::layout::{BOX_PADDING, CONTENT_WIDTH, IMAGE_BOX, MARGIN_X, SECTION_GAP};
use crate::text::{line_height, wrap, WrapResult};
use crate::writer::{FontSpec, ImageData};

/// Section title.
pub const TITLE: &str = "ANALYSIS & DIAGNOSIS RESULTS";
/// Caption above the condition name.
pub const CAPTION: &str = "Primary AI-Detected Condition:";

const CAPTION_ADVANCE: f32 = 8.0;
const IMAGE_GAP: f32 = 8.0;

fn name_font() -> FontSpec {
    FontSpec::bold(16.0)
}

fn caption_font() -> FontSpec {
    FontSpec::regular(10.0)
}

/// Measured box.
#[derive(Debug, Clone)]
pub struct DiagnosisLayout {
    /// Decoded image and its fitted size
    pub image: Option<(ImageData, f32, f32)>,
    /// Left edge of the caption and name
    pub text_x: f32,
    /// Wrapped, upper-cased condition name
    pub name: WrapResult,
    /// Box height including padding
    pub height: f32,
}

fn decode_image(input: &ReportInput, embed_image: bool) -> Option<ImageData> {
    if !embed_image {
        return None;
    }
    let image_ref = input.image.as_ref()?;
    match image_ref.decode() {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("Report {}: image not embedded: {}", input.report_id, e);
            None
        },
    }
}

/// Decode the image and wrap the name. Draws nothing.
pub fn measure(input: &ReportInput, embed_image: bool) -> DiagnosisLayout {
    let image = decode_image(input, embed_image).map(|image| {
        let (w, h) = image.fit_to_box(IMAGE_BOX, IMAGE_BOX);
        (image, w, h)
    });

    let inner_x = MARGIN_X + BOX_PADDING;
    let text_x = if image.is_some() {
        inner_x + IMAGE_BOX + IMAGE_GAP
    } else {
        inner_x
    };
    let text_width = MARGIN_X + CONTENT_WIDTH - BOX_PADDING - text_x;

    let name = wrap(&input.predicted_label.trim().to_uppercase(), text_width, &name_font());
    let text_height = CAPTION_ADVANCE + name.height(line_height(&name_font()));
    let content = if image.is_some() {
        text_height.max(IMAGE_BOX)
    } else {
        text_height
    };

    DiagnosisLayout {
        image,
        text_x,
        name,
        height: content + 2.0 * BOX_PADDING,
    }
}

/// Height of a box segment holding `lines` name lines.
fn segment_height(lines: usize, leading: bool, with_image: bool) -> f32 {
    let caption = if leading { CAPTION_ADVANCE } else { 0.0 };
    let text = caption + lines as f32 * line_height(&name_font());
    let content = if with_image { text.max(IMAGE_BOX) } else { text };
    content + 2.0 * BOX_PADDING
}

/// Draw the section header and the box at `y`.
///
/// A name too long for one page is continued in a further box on the
/// next page; the caption and image stay with the first one.
pub fn draw(canvas: &mut Canvas, ctx: &SectionContext<'_>, input: &ReportInput, y: f32) -> f32 {
    let palette = &ctx.config.palette;
    let mut layout = measure(input, ctx.embed_image);
    let with_image = layout.image.is_some();

    let whole = SECTION_HEADER_ADVANCE + layout.height;
    let needed = if whole <= canvas.bottom_limit() - canvas.top_margin() {
        whole
    } else {
        SECTION_HEADER_ADVANCE + segment_height(1, true, with_image)
    };
    let y = canvas.ensure_space(y, needed, "diagnosis");
    let mut top = section_header(canvas, ctx, TITLE, y);

    let lh = line_height(&name_font());
    let name_style = TextStyle::new(name_font(), palette.header);
    let lines = &layout.name.lines;
    let mut start = 0;

    loop {
        let leading = start == 0;
        let caption = if leading { CAPTION_ADVANCE } else { 0.0 };
        let room = canvas.bottom_limit() - top - 2.0 * BOX_PADDING - caption;
        let fit = ((room / lh).floor().max(1.0) as usize).min(lines.len() - start);
        let height = if leading && fit == lines.len() {
            layout.height
        } else {
            segment_height(fit, leading, leading && with_image)
        };

        let frame = Rect::new(MARGIN_X, top, CONTENT_WIDTH, height);
        canvas.fill_rect(frame, palette.tint);
        canvas.stroke_rect(frame, palette.border, 0.3);

        let inner_top = top + BOX_PADDING;
        if leading {
            if let Some((image, w, h)) = layout.image.take() {
                let x = MARGIN_X + BOX_PADDING + (IMAGE_BOX - w) / 2.0;
                let y = inner_top + (IMAGE_BOX - h) / 2.0;
                canvas.image(image, Rect::new(x, y, w, h));
            }
            canvas.text(
                CAPTION,
                layout.text_x,
                inner_top + 3.5,
                TextStyle::new(caption_font(), palette.text),
            );
        }

        for (i, line) in lines[start..start + fit].iter().enumerate() {
            let baseline = inner_top + caption + i as f32 * lh + lh * 0.8;
            canvas.text(line, layout.text_x, baseline, name_style);
        }
        start += fit;

        if start >= lines.len() {
            return frame.bottom() + SECTION_GAP;
        }
        top = canvas.new_page();
        log::debug!("Diagnosis box continues on page {}", canvas.page_count());
    }
}
