//! Footer stamped onto every page once the body is laid out.
//!
//! The page count is only known after the last section, so footers are
//! a second pass over the finished canvas rather than a section builder.

use crate::report::canvas::{Canvas, TextStyle};
use crate::report::input::ReportInput;
use crate::report::layout::{ReportConfig, CONTENT_WIDTH, FOOTER_MARGIN, MARGIN_X, PAGE_HEIGHT, PAGE_WIDTH};
use crate::text::text_width;
use crate::writer::FontSpec;

/// Footer baseline.
pub const FOOTER_BASELINE: f32 = PAGE_HEIGHT - FOOTER_MARGIN;
/// Distance of the separator rule above the baseline.
pub const RULE_OFFSET: f32 = 4.5;

fn font() -> FontSpec {
    FontSpec::regular(8.0).italic()
}

/// Centre line of the footer.
pub fn footer_text(config: &ReportConfig, input: &ReportInput) -> String {
    let generated = config
        .generated_at
        .as_deref()
        .unwrap_or(input.timestamp.as_str());
    format!("Generated by {} | {}", config.branding, generated)
}

/// "Page i of n", 1-based.
pub fn page_label(index: usize, total: usize) -> String {
    format!("Page {} of {}", index + 1, total)
}

/// Draw the footer on every page of `canvas`.
pub fn draw_footers(canvas: &mut Canvas, config: &ReportConfig, input: &ReportInput) {
    let palette = &config.palette;
    let style = TextStyle::new(font(), palette.muted);
    let text = footer_text(config, input);
    let text_x = (PAGE_WIDTH - text_width(&text, &style.font)) / 2.0;
    let total = canvas.page_count();

    for page in 0..total {
        if !canvas.select_page(page) {
            break;
        }
        let rule_y = FOOTER_BASELINE - RULE_OFFSET;
        canvas.line((MARGIN_X, rule_y), (MARGIN_X + CONTENT_WIDTH, rule_y), palette.border, 0.2);
        canvas.text(&text, text_x, FOOTER_BASELINE, style);

        let label = page_label(page, total);
        let label_x = MARGIN_X + CONTENT_WIDTH - text_width(&label, &style.font);
        canvas.text(&label, label_x, FOOTER_BASELINE, style);
    }
    log::debug!("Stamped footers on {} pages", total);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{canvas, record};
    use super::*;
    use crate::report::canvas::DrawCommand;

    #[test]
    fn test_footer_text_uses_record_timestamp() {
        let config = ReportConfig::default();
        assert_eq!(
            footer_text(&config, &record()),
            "Generated by FacialDerma AI | 2024-03-09 14:05"
        );
        let config = config.with_generated_at("2024-03-10 09:00");
        assert_eq!(
            footer_text(&config, &record()),
            "Generated by FacialDerma AI | 2024-03-10 09:00"
        );
    }

    #[test]
    fn test_every_page_gets_a_label() {
        let config = ReportConfig::default();
        let mut canvas = canvas();
        canvas.new_page();
        canvas.new_page();
        draw_footers(&mut canvas, &config, &record());

        for page in 0..3 {
            let expected = page_label(page, 3);
            let label = canvas.commands(page).iter().find_map(|c| match c {
                DrawCommand::Text { text, x, y, .. } if *text == expected => Some((*x, *y)),
                _ => None,
            });
            let (x, y) = label.unwrap();
            assert_eq!(y, FOOTER_BASELINE);
            assert!(x + text_width(&expected, &font()) <= MARGIN_X + CONTENT_WIDTH + 1e-3);
        }
        assert_eq!(page_label(0, 3), "Page 1 of 3");
    }

    #[test]
    fn test_footer_below_content_area() {
        let config = ReportConfig::default();
        let mut canvas = canvas();
        draw_footers(&mut canvas, &config, &record());
        for command in canvas.commands(0) {
            if let DrawCommand::Line { from, .. } = command {
                assert!(from.1 > canvas.bottom_limit());
            }
        }
    }
}
