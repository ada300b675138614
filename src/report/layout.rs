//! Page geometry, colours and report-level configuration.
//!
//! All lengths are millimetres with the origin at the top-left corner
//! of the page.

use crate::writer::{Color, FontSpec, PdfWriterConfig};

/// A4 width.
pub const PAGE_WIDTH: f32 = 210.0;
/// A4 height.
pub const PAGE_HEIGHT: f32 = 297.0;
/// Left and right page margin.
pub const MARGIN_X: f32 = 15.0;
/// Where content starts on every page.
pub const TOP_MARGIN: f32 = 20.0;
/// Space kept free at the bottom of every page for the footer.
pub const RESERVED_FOOTER_HEIGHT: f32 = 25.0;
/// Footer baseline distance from the bottom edge.
pub const FOOTER_MARGIN: f32 = 12.0;
/// Printable width between the margins.
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
/// Lowest y content may reach.
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - RESERVED_FOOTER_HEIGHT;

/// Width of each info-block column.
pub const COLUMN_WIDTH: f32 = CONTENT_WIDTH / 2.0 - 5.0;
/// Gap between the two info-block columns.
pub const COLUMN_GAP: f32 = 10.0;
/// Inner padding of boxes.
pub const BOX_PADDING: f32 = 4.0;
/// Height of the dark column heading bars and section header bars.
pub const BAR_HEIGHT: f32 = 8.0;
/// Vertical space after a finished section.
pub const SECTION_GAP: f32 = 8.0;

/// Width reserved for a field key before its value starts.
pub const KEY_COLUMN_WIDTH: f32 = 28.0;
/// Advance per wrapped field line.
pub const FIELD_LINE_HEIGHT: f32 = 5.0;
/// Extra space between consecutive fields.
pub const FIELD_GAP: f32 = 1.0;
/// Maximum width of a field value inside an info column.
pub const FIELD_VALUE_WIDTH: f32 = COLUMN_WIDTH - 2.0 * BOX_PADDING - KEY_COLUMN_WIDTH;

/// Advance per line in lists and notes.
pub const BODY_LINE_HEIGHT: f32 = 5.0;

/// Side length of the box the lesion image is fitted into.
pub const IMAGE_BOX: f32 = 55.0;

/// Body text face.
pub fn body_font() -> FontSpec {
    FontSpec::regular(9.0)
}

/// Field key face.
pub fn key_font() -> FontSpec {
    FontSpec::bold(9.0)
}

/// Fixed text at the bottom of every report.
pub const DEFAULT_DISCLAIMER: &str = "Disclaimer: Facial Derma AI uses automated image analysis to \
detect potential skin conditions. While we strive for accuracy, the predictions may contain errors \
and should not replace professional medical advice, diagnosis, or treatment. Always consult a \
certified dermatologist for proper evaluation.";

/// Report colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Banner and column heading fill
    pub header: Color,
    /// Text on dark fills
    pub header_text: Color,
    /// Section header bar fill
    pub section_bar: Color,
    /// Section header title
    pub section_title: Color,
    /// Regular text
    pub text: Color,
    /// Footer and secondary text
    pub muted: Color,
    /// Box borders and table grid
    pub border: Color,
    /// Alternate table row and diagnosis box fill
    pub tint: Color,
    /// Empty part of a bar
    pub track: Color,
    /// High confidence
    pub high: Color,
    /// Moderate confidence
    pub moderate: Color,
    /// Low confidence
    pub low: Color,
    /// Disclaimer box fill
    pub disclaimer_fill: Color,
    /// Disclaimer box border
    pub disclaimer_border: Color,
    /// Disclaimer text
    pub disclaimer_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            header: Color::rgb8(30, 41, 59),
            header_text: Color::white(),
            section_bar: Color::rgb8(230, 230, 230),
            section_title: Color::rgb8(70, 70, 70),
            text: Color::black(),
            muted: Color::rgb8(120, 120, 120),
            border: Color::rgb8(203, 213, 225),
            tint: Color::rgb8(241, 245, 249),
            track: Color::rgb8(200, 200, 200),
            high: Color::rgb8(20, 160, 20),
            moderate: Color::rgb8(251, 191, 36),
            low: Color::rgb8(239, 68, 68),
            disclaimer_fill: Color::rgb8(255, 251, 235),
            disclaimer_border: Color::rgb8(245, 158, 11),
            disclaimer_text: Color::rgb8(146, 64, 14),
        }
    }
}

/// Report configuration.
///
/// Geometry is fixed; this only covers wording, metadata and output
/// encoding.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Banner title and PDF `/Title`
    pub title: String,
    /// PDF `/Author`
    pub author: Option<String>,
    /// PDF `/Creator`
    pub creator: String,
    /// Flate-compress page content
    pub compress: bool,
    /// Product name shown in the footer
    pub branding: String,
    /// Disclaimer box text
    pub disclaimer: String,
    /// Footer time string; the record's timestamp when unset
    pub generated_at: Option<String>,
    /// PDF `/CreationDate`; omitted when unset so output stays reproducible
    pub creation_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Colours
    pub palette: Palette,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "DERMATOLOGY ANALYSIS REPORT".to_string(),
            author: None,
            creator: "FacialDerma AI".to_string(),
            compress: false,
            branding: "FacialDerma AI".to_string(),
            disclaimer: DEFAULT_DISCLAIMER.to_string(),
            generated_at: None,
            creation_date: None,
            palette: Palette::default(),
        }
    }
}

impl ReportConfig {
    /// Set the banner and document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the footer product name.
    pub fn with_branding(mut self, branding: impl Into<String>) -> Self {
        self.branding = branding.into();
        self
    }

    /// Replace the disclaimer text.
    pub fn with_disclaimer(mut self, disclaimer: impl Into<String>) -> Self {
        self.disclaimer = disclaimer.into();
        self
    }

    /// Override the footer time string.
    pub fn with_generated_at(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = Some(generated_at.into());
        self
    }

    /// Stamp the document with a creation date.
    pub fn with_creation_date(mut self, date: chrono::DateTime<chrono::Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Replace the colour palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Writer settings derived from this configuration.
    pub fn writer_config(&self, subject: &str) -> PdfWriterConfig {
        let mut config = PdfWriterConfig::default()
            .with_title(self.title.clone())
            .with_subject(subject)
            .with_creator(self.creator.clone())
            .with_compress(self.compress);
        if let Some(author) = &self.author {
            config = config.with_author(author.clone());
        }
        if let Some(date) = self.creation_date {
            config = config.with_creation_date(date);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        assert_eq!(CONTENT_WIDTH, 180.0);
        assert_eq!(COLUMN_WIDTH, 85.0);
        assert_eq!(MARGIN_X + COLUMN_WIDTH + COLUMN_GAP + COLUMN_WIDTH, PAGE_WIDTH - MARGIN_X);
        assert_eq!(FIELD_VALUE_WIDTH, 49.0);
        assert!(CONTENT_BOTTOM < PAGE_HEIGHT - FOOTER_MARGIN);
    }

    #[test]
    fn test_config_builders() {
        let config = ReportConfig::default()
            .with_branding("Clinic")
            .with_generated_at("10:00")
            .with_compress(true);
        assert_eq!(config.branding, "Clinic");
        assert_eq!(config.generated_at.as_deref(), Some("10:00"));

        let writer = config.writer_config("Acne");
        assert!(writer.compress);
        assert_eq!(writer.subject.as_deref(), Some("Acne"));
        assert_eq!(writer.title.as_deref(), Some("DERMATOLOGY ANALYSIS REPORT"));
        assert!(writer.creation_date.is_none());
    }

    #[test]
    fn test_creation_date_reaches_writer() {
        use chrono::TimeZone;
        let date = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let writer = ReportConfig::default().with_creation_date(date).writer_config("Acne");
        assert_eq!(writer.creation_date, Some(date));
    }
}
