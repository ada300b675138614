//! Command-list drawing surface.
//!
//! Coordinates are millimetres from the top-left corner of the page.
//! Drawing only appends commands; nothing reads canvas state back, so
//! layout can be measured completely before a single command is issued.
//! [`Canvas::render`] converts the command lists into PDF pages.

use crate::error::Result;
use crate::text::mm_to_pt;
use crate::writer::{Color, FontSpec, ImageData, ImageId, PdfWriter, PdfWriterConfig};

/// Axis-aligned rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// How a text run is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Face and size
    pub font: FontSpec,
    /// Fill colour
    pub color: Color,
}

impl TextStyle {
    /// Create a style.
    pub fn new(font: FontSpec, color: Color) -> Self {
        Self { font, color }
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle
    FillRect {
        /// Area
        rect: Rect,
        /// Fill colour
        color: Color,
    },
    /// Rectangle outline
    StrokeRect {
        /// Area
        rect: Rect,
        /// Line colour
        color: Color,
        /// Line width
        line_width: f32,
    },
    /// Straight line
    Line {
        /// Start point
        from: (f32, f32),
        /// End point
        to: (f32, f32),
        /// Line colour
        color: Color,
        /// Line width
        line_width: f32,
    },
    /// Text run; `y` is the baseline
    Text {
        /// The run
        text: String,
        /// Left edge
        x: f32,
        /// Baseline
        y: f32,
        /// Face, size and colour
        style: TextStyle,
    },
    /// Image painted into a box
    Image {
        /// Index into the canvas image list
        image: usize,
        /// Target area
        rect: Rect,
    },
}

/// A paginated drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f32,
    height: f32,
    top_margin: f32,
    bottom_limit: f32,
    pages: Vec<Vec<DrawCommand>>,
    current: usize,
    images: Vec<ImageData>,
}

impl Canvas {
    /// Create a canvas with one empty page.
    ///
    /// `top_margin` is where the cursor lands after a page break and
    /// `bottom_limit` is the lowest y content may reach.
    pub fn new(width: f32, height: f32, top_margin: f32, bottom_limit: f32) -> Self {
        Self {
            width,
            height,
            top_margin,
            bottom_limit,
            pages: vec![Vec::new()],
            current: 0,
            images: Vec::new(),
        }
    }

    /// Page width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Page height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Where the cursor lands after a page break.
    pub fn top_margin(&self) -> f32 {
        self.top_margin
    }

    /// Lowest y content may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.bottom_limit
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the page receiving commands.
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Commands recorded on a page.
    pub fn commands(&self, page: usize) -> &[DrawCommand] {
        self.pages.get(page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Images referenced by [`DrawCommand::Image`].
    pub fn images(&self) -> &[ImageData] {
        &self.images
    }

    fn push(&mut self, command: DrawCommand) {
        self.pages[self.current].push(command);
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::FillRect { rect, color });
    }

    /// Outline a rectangle.
    pub fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    /// Draw a line.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, line_width: f32) {
        self.push(DrawCommand::Line {
            from,
            to,
            color,
            line_width,
        });
    }

    /// Draw a text run with its baseline at `y`.
    pub fn text(&mut self, run: &str, x: f32, y: f32, style: TextStyle) {
        if run.is_empty() {
            return;
        }
        self.push(DrawCommand::Text {
            text: run.to_string(),
            x,
            y,
            style,
        });
    }

    /// Paint an image into `rect`.
    pub fn image(&mut self, image: ImageData, rect: Rect) {
        self.images.push(image);
        let index = self.images.len() - 1;
        self.push(DrawCommand::Image { image: index, rect });
    }

    /// Start a new page and return the reset cursor.
    pub fn new_page(&mut self) -> f32 {
        self.pages.push(Vec::new());
        self.current = self.pages.len() - 1;
        self.top_margin
    }

    /// Break to a new page unless `needed` fits below `y`.
    ///
    /// Returns the cursor to continue from.
    pub fn ensure_space(&mut self, y: f32, needed: f32, reason: &str) -> f32 {
        if y + needed <= self.bottom_limit {
            return y;
        }
        let y = self.new_page();
        log::debug!("Page break before {} (page {})", reason, self.pages.len());
        y
    }

    /// Direct further commands to an existing page.
    ///
    /// Returns `false` and leaves the target unchanged if there is no
    /// such page.
    pub fn select_page(&mut self, page: usize) -> bool {
        if page < self.pages.len() {
            self.current = page;
            true
        } else {
            false
        }
    }

    /// Render every page to PDF bytes.
    pub fn render(&self, config: PdfWriterConfig) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::with_config(config);
        let image_ids: Vec<ImageId> = self
            .images
            .iter()
            .map(|image| writer.add_image(image.clone()))
            .collect();

        let page_height = self.height;
        let flip = |y: f32| mm_to_pt(page_height - y);

        for commands in &self.pages {
            let mut page = writer.add_page(mm_to_pt(self.width), mm_to_pt(self.height));
            for command in commands {
                match command {
                    DrawCommand::FillRect { rect, color } => {
                        page.fill_rect(
                            mm_to_pt(rect.x),
                            flip(rect.bottom()),
                            mm_to_pt(rect.width),
                            mm_to_pt(rect.height),
                            *color,
                        );
                    },
                    DrawCommand::StrokeRect {
                        rect,
                        color,
                        line_width,
                    } => {
                        page.stroke_rect(
                            mm_to_pt(rect.x),
                            flip(rect.bottom()),
                            mm_to_pt(rect.width),
                            mm_to_pt(rect.height),
                            *color,
                            mm_to_pt(*line_width),
                        );
                    },
                    DrawCommand::Line {
                        from,
                        to,
                        color,
                        line_width,
                    } => {
                        page.draw_line(
                            (mm_to_pt(from.0), flip(from.1)),
                            (mm_to_pt(to.0), flip(to.1)),
                            *color,
                            mm_to_pt(*line_width),
                        );
                    },
                    DrawCommand::Text { text, x, y, style } => {
                        page.add_text(text, mm_to_pt(*x), flip(*y), &style.font, style.color);
                    },
                    DrawCommand::Image { image, rect } => {
                        if let Some(id) = image_ids.get(*image) {
                            page.draw_image(
                                *id,
                                mm_to_pt(rect.x),
                                flip(rect.bottom()),
                                mm_to_pt(rect.width),
                                mm_to_pt(rect.height),
                            );
                        }
                    },
                }
            }
            page.finish();
        }

        writer.finish()
    }
}
