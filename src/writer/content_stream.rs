//! PDF content stream builder.
//!
//! Builds PDF content streams containing graphics and text operators
//! according to PDF specification ISO 32000-1:2008 Section 8-9.
//!
//! Coordinates here are PDF user space: points, origin at the bottom-left.

use super::font_manager::encode_win_ansi;
use super::object_serializer::write_real;
use crate::error::Result;
use std::io::Write;

/// RGB color with channels in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create a black color.
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create a white color.
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show text (Tj) - literal string, WinAnsi encoded on output
    ShowText(String),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Set stroke color RGB (RG)
    SetStrokeColorRGB(f32, f32, f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Stroke (S)
    Stroke,
    /// Fill (f)
    Fill,
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// Builder for PDF content streams.
///
/// Creates the byte sequence for a PDF content stream from operations.
#[derive(Debug, Default, Clone)]
pub struct ContentStreamBuilder {
    /// Operations in the stream
    operations: Vec<ContentStreamOp>,
    /// Current font resource name
    current_font: Option<String>,
    /// Current font size
    current_font_size: f32,
    /// Whether we're in a text object
    in_text_object: bool,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Operations recorded so far.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text_object {
            self.op(ContentStreamOp::BeginText);
            self.in_text_object = true;
        }
        self
    }

    /// End a text object.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text_object {
            self.op(ContentStreamOp::EndText);
            self.in_text_object = false;
        }
        self
    }

    /// Set font for text operations.
    ///
    /// `Tf` is only emitted when the font or size actually changes.
    pub fn set_font(&mut self, resource_name: &str, size: f32) -> &mut Self {
        if self.current_font.as_deref() != Some(resource_name) || self.current_font_size != size {
            self.op(ContentStreamOp::SetFont(resource_name.to_string(), size));
            self.current_font = Some(resource_name.to_string());
            self.current_font_size = size;
        }
        self
    }

    /// Add text with its baseline starting at a position.
    pub fn text(&mut self, text: &str, x: f32, y: f32) -> &mut Self {
        self.begin_text();
        self.op(ContentStreamOp::SetTextMatrix(1.0, 0.0, 0.0, 1.0, x, y));
        self.op(ContentStreamOp::ShowText(text.to_string()));
        self
    }

    /// Set fill color.
    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        self.op(ContentStreamOp::SetFillColorRGB(color.r, color.g, color.b))
    }

    /// Set stroke color.
    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        self.op(ContentStreamOp::SetStrokeColorRGB(color.r, color.g, color.b))
    }

    /// Set line width.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    /// Move to a point (start a new subpath).
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::MoveTo(x, y))
    }

    /// Draw a line to a point.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::LineTo(x, y))
    }

    /// Draw a rectangle. `(x, y)` is the lower-left corner.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Stroke)
    }

    /// Fill the current path.
    pub fn fill(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Fill)
    }

    /// Save the current graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore the previous graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Draw an image XObject at the specified position and size.
    ///
    /// # Arguments
    /// * `resource_id` - The XObject resource ID (e.g., "Im1")
    /// * `x` - X position (left edge)
    /// * `y` - Y position (bottom edge)
    /// * `width` - Display width
    /// * `height` - Display height
    pub fn draw_image(
        &mut self,
        resource_id: &str,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> &mut Self {
        self.end_text();
        self.op(ContentStreamOp::SaveState);
        self.op(ContentStreamOp::Transform(width, 0.0, 0.0, height, x, y));
        self.op(ContentStreamOp::PaintXObject(resource_id.to_string()));
        self.op(ContentStreamOp::RestoreState);
        self
    }

    /// Build the content stream to bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();

        for op in &self.operations {
            self.write_op(&mut buf, op)?;
            writeln!(buf)?;
        }
        if self.in_text_object {
            writeln!(buf, "ET")?;
        }

        Ok(buf)
    }

    /// Write a single operation to the buffer.
    fn write_op<W: Write>(&self, w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
        match op {
            ContentStreamOp::SaveState => write!(w, "q"),
            ContentStreamOp::RestoreState => write!(w, "Q"),
            ContentStreamOp::Transform(a, b, c, d, e, f) => {
                write_numbers(w, &[*a, *b, *c, *d, *e, *f])?;
                write!(w, " cm")
            },
            ContentStreamOp::BeginText => write!(w, "BT"),
            ContentStreamOp::EndText => write!(w, "ET"),
            ContentStreamOp::SetFont(name, size) => {
                write!(w, "/{} ", name)?;
                write_real(w, *size as f64)?;
                write!(w, " Tf")
            },
            ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
                write_numbers(w, &[*a, *b, *c, *d, *e, *f])?;
                write!(w, " Tm")
            },
            ContentStreamOp::ShowText(text) => {
                write!(w, "(")?;
                write_escaped_string(w, text)?;
                write!(w, ") Tj")
            },
            ContentStreamOp::SetFillColorRGB(r, g, b) => {
                write_numbers(w, &[*r, *g, *b])?;
                write!(w, " rg")
            },
            ContentStreamOp::SetStrokeColorRGB(r, g, b) => {
                write_numbers(w, &[*r, *g, *b])?;
                write!(w, " RG")
            },
            ContentStreamOp::SetLineWidth(width) => {
                write_real(w, *width as f64)?;
                write!(w, " w")
            },
            ContentStreamOp::MoveTo(x, y) => {
                write_numbers(w, &[*x, *y])?;
                write!(w, " m")
            },
            ContentStreamOp::LineTo(x, y) => {
                write_numbers(w, &[*x, *y])?;
                write!(w, " l")
            },
            ContentStreamOp::Rectangle(x, y, w_val, h) => {
                write_numbers(w, &[*x, *y, *w_val, *h])?;
                write!(w, " re")
            },
            ContentStreamOp::Stroke => write!(w, "S"),
            ContentStreamOp::Fill => write!(w, "f"),
            ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
        }
    }
}

/// Write space-separated numbers.
fn write_numbers<W: Write>(w: &mut W, values: &[f32]) -> std::io::Result<()> {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(w, " ")?;
        }
        write_real(w, *v as f64)?;
    }
    Ok(())
}

/// Write text as an escaped WinAnsi literal string body.
fn write_escaped_string<W: Write>(w: &mut W, text: &str) -> std::io::Result<()> {
    for byte in encode_win_ansi(text) {
        match byte {
            b'(' => write!(w, "\\(")?,
            b')' => write!(w, "\\)")?,
            b'\\' => write!(w, "\\\\")?,
            0x20..=0x7E => w.write_all(&[byte])?,
            _ => write!(w, "\\{:03o}", byte)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(builder: &ContentStreamBuilder) -> String {
        String::from_utf8(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_simple_text() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .begin_text()
            .set_font("Helvetica", 12.0)
            .text("Hello", 72.0, 720.0)
            .end_text();

        let content = render(&builder);
        assert!(content.contains("BT"));
        assert!(content.contains("/Helvetica 12 Tf"));
        assert!(content.contains("1 0 0 1 72 720 Tm"));
        assert!(content.contains("(Hello) Tj"));
        assert!(content.contains("ET"));
    }

    #[test]
    fn test_font_change_is_deduplicated() {
        let mut builder = ContentStreamBuilder::new();
        builder.set_font("Helvetica", 9.0).set_font("Helvetica", 9.0);
        builder.set_font("HelveticaBold", 9.0);
        let fonts = builder
            .operations()
            .iter()
            .filter(|op| matches!(op, ContentStreamOp::SetFont(..)))
            .count();
        assert_eq!(fonts, 2);
    }

    #[test]
    fn test_rectangle() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .fill_color(Color::rgb8(30, 41, 59))
            .rect(42.5, 100.0, 240.95, 22.68)
            .fill();
        let content = render(&builder);
        assert!(content.contains("42.5 100 240.95 22.68 re"));
        assert!(content.contains("\nf\n"));
        assert!(content.contains(" rg"));
    }

    #[test]
    fn test_path_operations() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .set_line_width(0.5)
            .stroke_color(Color::black())
            .move_to(0.0, 0.0)
            .line_to(100.0, 0.0)
            .stroke();
        let content = render(&builder);
        assert!(content.contains("0.5 w"));
        assert!(content.contains("0 0 0 RG"));
        assert!(content.contains("0 0 m"));
        assert!(content.contains("100 0 l"));
        assert!(content.contains("S"));
    }

    #[test]
    fn test_escaped_text() {
        let mut builder = ContentStreamBuilder::new();
        builder.text("Eczema (atopic) \\ café", 0.0, 0.0);
        let content = render(&builder);
        assert!(content.contains("(Eczema \\(atopic\\) \\\\ caf\\351) Tj"));
    }

    #[test]
    fn test_unclosed_text_object_is_closed() {
        let mut builder = ContentStreamBuilder::new();
        builder.text("open", 0.0, 0.0);
        assert!(render(&builder).trim_end().ends_with("ET"));
    }

    #[test]
    fn test_draw_image() {
        let mut builder = ContentStreamBuilder::new();
        builder.draw_image("Im1", 10.0, 20.0, 150.0, 150.0);
        let content = render(&builder);
        assert!(content.contains("q\n150 0 0 150 10 20 cm\n/Im1 Do\nQ"));
    }

    #[test]
    fn test_color_rgb8() {
        let c = Color::rgb8(255, 0, 51);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!(c.g.abs() < 1e-6);
        assert!((c.b - 0.2).abs() < 1e-6);
    }
}
