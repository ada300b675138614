//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.
//!
//! Object numbering is fixed (catalog, page tree, fonts, images, pages,
//! info) so the same drawing calls always produce the same bytes.

use super::content_stream::{Color, ContentStreamBuilder};
use super::font_manager::{encode_win_ansi, FontManager, FontSpec};
use super::image_handler::ImageData;
use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::BTreeSet;
use std::io::Write;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Creation timestamp written to the Info dictionary
    pub creation_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether to compress streams
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            subject: None,
            creator: Some("derma_report".to_string()),
            creation_date: None,
            compress: false,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Stamp the Info dictionary with a creation date.
    ///
    /// Leave unset when output must be reproducible.
    pub fn with_creation_date(mut self, date: chrono::DateTime<chrono::Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, content streams are compressed using FlateDecode.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Handle to an image registered with [`PdfWriter::add_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(usize);

impl ImageId {
    /// Resource name used in page XObject dictionaries.
    pub fn resource_name(&self) -> String {
        format!("Im{}", self.0 + 1)
    }
}

/// A page being built.
///
/// Coordinates are PDF user space: points, origin at the bottom-left.
pub struct PageBuilder<'a> {
    writer: &'a mut PdfWriter,
    page_index: usize,
}

impl<'a> PageBuilder<'a> {
    fn page(&mut self) -> &mut PageData {
        &mut self.writer.pages[self.page_index]
    }

    /// Add text with its baseline starting at `(x, y)`.
    pub fn add_text(&mut self, text: &str, x: f32, y: f32, font: &FontSpec, color: Color) -> &mut Self {
        let resource = FontManager::resource_name(font.info());
        self.page()
            .content_builder
            .begin_text()
            .fill_color(color)
            .set_font(&resource, font.size)
            .text(text, x, y);
        self
    }

    /// Fill a rectangle whose lower-left corner is `(x, y)`.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) -> &mut Self {
        self.page()
            .content_builder
            .end_text()
            .fill_color(color)
            .rect(x, y, width, height)
            .fill();
        self
    }

    /// Stroke a rectangle outline.
    pub fn stroke_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        line_width: f32,
    ) -> &mut Self {
        self.page()
            .content_builder
            .end_text()
            .stroke_color(color)
            .set_line_width(line_width)
            .rect(x, y, width, height)
            .stroke();
        self
    }

    /// Stroke a straight line segment.
    pub fn draw_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        line_width: f32,
    ) -> &mut Self {
        self.page()
            .content_builder
            .end_text()
            .stroke_color(color)
            .set_line_width(line_width)
            .move_to(from.0, from.1)
            .line_to(to.0, to.1)
            .stroke();
        self
    }

    /// Paint a registered image into the given box.
    pub fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        let page = self.page();
        page.images.insert(image);
        page.content_builder
            .draw_image(&image.resource_name(), x, y, width, height);
        self
    }

    /// Finish building this page and return to the writer.
    pub fn finish(self) -> &'a mut PdfWriter {
        let page = &mut self.writer.pages[self.page_index];
        page.content_builder.end_text();
        self.writer
    }
}

/// Internal page data.
struct PageData {
    width: f32,
    height: f32,
    content_builder: ContentStreamBuilder,
    images: BTreeSet<ImageId>,
}

/// PDF document writer.
///
/// Builds a complete PDF document with pages, fonts, images and content.
pub struct PdfWriter {
    config: PdfWriterConfig,
    fonts: FontManager,
    pages: Vec<PageData>,
    images: Vec<ImageData>,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            fonts: FontManager::new(),
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Add a page with the given dimensions in points.
    pub fn add_page(&mut self, width: f32, height: f32) -> PageBuilder<'_> {
        let page_index = self.pages.len();
        self.pages.push(PageData {
            width,
            height,
            content_builder: ContentStreamBuilder::new(),
            images: BTreeSet::new(),
        });
        PageBuilder {
            writer: self,
            page_index,
        }
    }

    /// Add an A4 sized page (210mm x 297mm).
    pub fn add_a4_page(&mut self) -> PageBuilder<'_> {
        self.add_page(595.28, 841.89)
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Register an image so pages can paint it.
    pub fn add_image(&mut self, image: ImageData) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    fn info_dict(&self) -> Object {
        let text = |s: &str| Object::String(encode_win_ansi(s));
        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", text(title)));
        }
        if let Some(author) = &self.config.author {
            info_entries.push(("Author", text(author)));
        }
        if let Some(subject) = &self.config.subject {
            info_entries.push(("Subject", text(subject)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", text(creator)));
        }
        info_entries.push(("Producer", text("derma_report")));
        if let Some(date) = &self.config.creation_date {
            let stamp = date.format("D:%Y%m%d%H%M%SZ").to_string();
            info_entries.push(("CreationDate", text(&stamp)));
        }
        ObjectSerializer::dict(info_entries)
    }

    /// Build the complete PDF document.
    pub fn finish(self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::compact();
        let mut objects: Vec<(u32, Object)> = Vec::new();
        let mut next_id = 1u32;
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            id
        };

        let catalog_id = alloc();
        let pages_id = alloc();

        // Fonts, in registration order
        let mut font_resources = Dictionary::new();
        for name in self.fonts.font_names() {
            let font_id = alloc();
            objects.push((
                font_id,
                ObjectSerializer::dict(vec![
                    ("Type", ObjectSerializer::name("Font")),
                    ("Subtype", ObjectSerializer::name("Type1")),
                    ("BaseFont", ObjectSerializer::name(name)),
                    ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
                ]),
            ));
            font_resources.insert(name.replace('-', ""), Object::Reference(ObjectRef::new(font_id, 0)));
        }

        // Image XObjects, each followed by its soft mask when present
        let mut image_refs: Vec<ObjectRef> = Vec::with_capacity(self.images.len());
        for image in &self.images {
            let image_id = alloc();
            let mut dict = image.build_xobject_dict();
            if let (Some(mask_dict), Some(mask_data)) =
                (image.build_soft_mask_dict(), image.soft_mask.as_ref())
            {
                let mask_id = alloc();
                dict.insert("SMask".to_string(), Object::Reference(ObjectRef::new(mask_id, 0)));
                objects.push((
                    mask_id,
                    Object::Stream {
                        dict: mask_dict,
                        data: bytes::Bytes::from(mask_data.clone()),
                    },
                ));
            }
            objects.push((
                image_id,
                Object::Stream {
                    dict,
                    data: bytes::Bytes::from(image.data.clone()),
                },
            ));
            image_refs.push(ObjectRef::new(image_id, 0));
        }

        let mut page_refs: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page_data in &self.pages {
            let page_id = alloc();
            let content_id = alloc();

            let raw_content = page_data.content_builder.build()?;
            let mut content_dict = Dictionary::new();
            let content_bytes = if self.config.compress {
                content_dict.insert("Filter".to_string(), ObjectSerializer::name("FlateDecode"));
                compress_data(&raw_content)?
            } else {
                raw_content
            };
            content_dict.insert(
                "Length".to_string(),
                ObjectSerializer::integer(content_bytes.len() as i64),
            );

            let mut resources = vec![("Font", Object::Dictionary(font_resources.clone()))];
            if !page_data.images.is_empty() {
                let xobjects: Dictionary = page_data
                    .images
                    .iter()
                    .filter_map(|id| {
                        image_refs
                            .get(id.0)
                            .map(|r| (id.resource_name(), Object::Reference(*r)))
                    })
                    .collect();
                resources.push(("XObject", Object::Dictionary(xobjects)));
            }

            let page_obj = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Page")),
                ("Parent", ObjectSerializer::reference(pages_id, 0)),
                (
                    "MediaBox",
                    ObjectSerializer::rect(0.0, 0.0, page_data.width as f64, page_data.height as f64),
                ),
                ("Contents", ObjectSerializer::reference(content_id, 0)),
                ("Resources", ObjectSerializer::dict(resources)),
            ]);

            page_refs.push(Object::Reference(ObjectRef::new(page_id, 0)));
            objects.push((page_id, page_obj));
            objects.push((
                content_id,
                Object::Stream {
                    dict: content_dict,
                    data: bytes::Bytes::from(content_bytes),
                },
            ));
        }

        let info_id = alloc();
        let size = next_id;

        objects.push((
            pages_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Pages")),
                ("Kids", Object::Array(page_refs)),
                ("Count", ObjectSerializer::integer(self.pages.len() as i64)),
            ]),
        ));
        objects.push((
            catalog_id,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Catalog")),
                ("Pages", ObjectSerializer::reference(pages_id, 0)),
            ]),
        ));
        objects.push((info_id, self.info_dict()));
        objects.sort_by_key(|(id, _)| *id);

        let mut output = Vec::new();

        // PDF Header
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref_offsets: Vec<usize> = Vec::with_capacity(objects.len());
        for (id, obj) in &objects {
            xref_offsets.push(output.len());
            output.extend_from_slice(&serializer.serialize_indirect(*id, 0, obj)?);
        }

        // Write xref table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", size)?;
        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        for offset in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(size as i64)),
            ("Root", ObjectSerializer::reference(catalog_id, 0)),
            ("Info", ObjectSerializer::reference(info_id, 0)),
        ]);

        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&trailer)?);
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        log::debug!(
            "Wrote PDF: {} pages, {} images, {} bytes",
            self.pages.len(),
            self.images.len(),
            output.len()
        );

        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).to_string()
    }

    #[test]
    fn test_create_empty_pdf() {
        let mut writer = PdfWriter::new();
        writer.add_a4_page().finish();
        let bytes = writer.finish().unwrap();

        let content = as_text(&bytes);
        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/Type /Page "));
        assert!(content.contains("[0 0 595.28 841.89]"));
        assert!(content.ends_with("%%EOF"));
    }

    #[test]
    fn test_pdf_with_text() {
        let mut writer = PdfWriter::new();
        {
            let mut page = writer.add_a4_page();
            page.add_text("Hello, World!", 72.0, 720.0, &FontSpec::regular(12.0), Color::black());
            page.add_text("Bold line", 72.0, 700.0, &FontSpec::bold(12.0), Color::black());
            page.finish();
        }

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/BaseFont /Helvetica"));
        assert!(content.contains("/BaseFont /Helvetica-Bold"));
        assert!(content.contains("/Helvetica 12 Tf"));
        assert!(content.contains("/HelveticaBold 12 Tf"));
        assert!(content.contains("(Hello, World!) Tj"));
        assert!(content.contains("ET"));
    }

    #[test]
    fn test_graphics_end_text_object() {
        let mut writer = PdfWriter::new();
        {
            let mut page = writer.add_a4_page();
            page.add_text("A", 10.0, 10.0, &FontSpec::regular(10.0), Color::black());
            page.fill_rect(0.0, 0.0, 20.0, 20.0, Color::new(0.9, 0.9, 0.9));
            page.finish();
        }
        let content = as_text(&writer.finish().unwrap());
        let et = content.find("ET").unwrap();
        let re = content.find(" re").unwrap();
        assert!(et < re);
    }

    #[test]
    fn test_pdf_with_metadata() {
        let config = PdfWriterConfig::default()
            .with_title("Dermatology Report")
            .with_author("Clinic");

        let mut writer = PdfWriter::with_config(config);
        writer.add_a4_page().finish();

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/Title (Dermatology Report)"));
        assert!(content.contains("/Author (Clinic)"));
        assert!(!content.contains("/CreationDate"));
    }

    #[test]
    fn test_creation_date() {
        use chrono::TimeZone;
        let date = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let mut writer = PdfWriter::with_config(PdfWriterConfig::default().with_creation_date(date));
        writer.add_a4_page().finish();
        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/CreationDate (D:20240309140500Z)"));
    }

    #[test]
    fn test_multiple_pages() {
        let mut writer = PdfWriter::new();
        writer.add_a4_page().finish();
        writer.add_page(612.0, 792.0).finish();
        assert_eq!(writer.page_count(), 2);

        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/Count 2"));
        assert!(content.contains("[0 0 612 792]"));
    }

    #[test]
    fn test_deterministic_output() {
        let build = || {
            let mut writer = PdfWriter::new();
            {
                let mut page = writer.add_a4_page();
                page.add_text("Same bytes", 50.0, 50.0, &FontSpec::regular(9.0), Color::black());
                page.finish();
            }
            writer.finish().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_compressed_content() {
        let mut writer = PdfWriter::with_config(PdfWriterConfig::default().with_compress(true));
        {
            let mut page = writer.add_a4_page();
            page.add_text("Compressed", 50.0, 50.0, &FontSpec::regular(9.0), Color::black());
            page.finish();
        }
        let content = as_text(&writer.finish().unwrap());
        assert!(content.contains("/Filter /FlateDecode"));
        assert!(!content.contains("(Compressed) Tj"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut writer = PdfWriter::new();
        writer.add_a4_page().finish();
        let bytes = writer.finish().unwrap();
        let content = as_text(&bytes);

        let xref = content.find("xref\n").unwrap();
        let entries: Vec<usize> = content[xref..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert!(!entries.is_empty());
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(content[*offset..].starts_with(&expected));
        }
    }

    #[test]
    fn test_image_resources_only_on_using_page() {
        let mut writer = PdfWriter::new();
        let image = writer.add_image(ImageData {
            width: 2,
            height: 2,
            bits_per_component: 8,
            color_space: super::super::image_handler::ColorSpace::DeviceRGB,
            format: super::super::image_handler::ImageFormat::Jpeg,
            data: vec![0xFF, 0xD8, 0xFF, 0xD9],
            soft_mask: None,
        });
        {
            let mut page = writer.add_a4_page();
            page.draw_image(image, 10.0, 10.0, 50.0, 50.0);
            page.finish();
        }
        writer.add_a4_page().finish();

        let content = as_text(&writer.finish().unwrap());
        assert_eq!(content.matches("/XObject << /Im1").count(), 1);
        assert!(content.contains("/Im1 Do"));
        assert!(content.contains("/Subtype /Image"));
    }
}
