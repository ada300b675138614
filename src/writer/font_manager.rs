//! Font management for PDF generation.
//!
//! Reports are set in the Helvetica family of the PDF Base-14 fonts, so
//! no font program is embedded. This module carries the standard AFM
//! advance widths needed for accurate text measurement and the WinAnsi
//! encoding used when the text is written into a content stream.

/// Font weight classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    /// Normal weight
    #[default]
    Normal,
    /// Bold weight
    Bold,
}

/// Information about a Base-14 font face.
#[derive(Debug)]
pub struct FontInfo {
    /// PostScript name (e.g., "Helvetica-Bold")
    pub name: &'static str,
    /// Font weight
    pub weight: FontWeight,
    /// Whether the face is oblique
    pub italic: bool,
    /// Advance widths for codes 32..=126 in 1/1000 em
    widths: &'static [u16; 95],
    /// Width used for WinAnsi codes above 127 without a dedicated entry
    fallback_width: u16,
    /// Ascender height (above baseline)
    pub ascender: f32,
    /// Descender depth (below baseline, negative)
    pub descender: f32,
    /// Cap height (height of capital letters)
    pub cap_height: f32,
}

/// Helvetica advance widths, space through tilde.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

/// Helvetica-Bold advance widths, space through tilde.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,      // 'p'..'~'
];

/// Helvetica regular.
pub static HELVETICA: FontInfo = FontInfo {
    name: "Helvetica",
    weight: FontWeight::Normal,
    italic: false,
    widths: &HELVETICA_WIDTHS,
    fallback_width: 556,
    ascender: 718.0,
    descender: -207.0,
    cap_height: 718.0,
};

/// Helvetica bold.
pub static HELVETICA_BOLD: FontInfo = FontInfo {
    name: "Helvetica-Bold",
    weight: FontWeight::Bold,
    italic: false,
    widths: &HELVETICA_BOLD_WIDTHS,
    fallback_width: 611,
    ascender: 718.0,
    descender: -207.0,
    cap_height: 718.0,
};

/// Helvetica oblique. Obliques share the upright advance widths.
pub static HELVETICA_OBLIQUE: FontInfo = FontInfo {
    name: "Helvetica-Oblique",
    weight: FontWeight::Normal,
    italic: true,
    widths: &HELVETICA_WIDTHS,
    fallback_width: 556,
    ascender: 718.0,
    descender: -207.0,
    cap_height: 718.0,
};

/// Helvetica bold oblique.
pub static HELVETICA_BOLD_OBLIQUE: FontInfo = FontInfo {
    name: "Helvetica-BoldOblique",
    weight: FontWeight::Bold,
    italic: true,
    widths: &HELVETICA_BOLD_WIDTHS,
    fallback_width: 611,
    ascender: 718.0,
    descender: -207.0,
    cap_height: 718.0,
};

impl FontInfo {
    /// Calculate the width of text in this font.
    ///
    /// Returns width in points for the given font size.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.code_width(win_ansi_code(c)) as u32).sum();
        units as f32 * font_size / 1000.0
    }

    /// Get the width of a single character in font units (1/1000 of em).
    pub fn char_width(&self, ch: char) -> f32 {
        self.code_width(win_ansi_code(ch)) as f32
    }

    /// Width of a WinAnsi code.
    fn code_width(&self, code: u8) -> u16 {
        match code {
            32..=126 => self.widths[(code - 32) as usize],
            0x85 | 0x89 | 0x97 => 1000,
            0x95 => 350,
            0x91 | 0x92 => self.widths[(b'\'' - 32) as usize] + 31,
            0x93 | 0x94 => self.widths[(b'"' - 32) as usize] - 22,
            0xA0 => 278,
            0xB0 => 400,
            0xB7 => 278,
            0xD7 => 584,
            _ => self.fallback_width,
        }
    }

    /// Get the line height for this font at the given size.
    pub fn line_height(&self, font_size: f32) -> f32 {
        (self.ascender - self.descender) * font_size / 1000.0
    }
}

/// Font manager for PDF generation.
///
/// Knows the faces of the built-in family and resolves them by name
/// or by weight/slant.
#[derive(Debug, Clone)]
pub struct FontManager {
    fonts: Vec<&'static FontInfo>,
}

impl FontManager {
    /// Create a font manager with the Helvetica family registered.
    pub fn new() -> Self {
        Self {
            fonts: vec![
                &HELVETICA,
                &HELVETICA_BOLD,
                &HELVETICA_OBLIQUE,
                &HELVETICA_BOLD_OBLIQUE,
            ],
        }
    }

    /// Get font info by name.
    pub fn get_font(&self, name: &str) -> Option<&'static FontInfo> {
        self.fonts.iter().copied().find(|f| f.name == name)
    }

    /// Get font info, falling back to Helvetica if not found.
    pub fn get_font_or_default(&self, name: &str) -> &'static FontInfo {
        self.get_font(name).unwrap_or(&HELVETICA)
    }

    /// Calculate the width of a string in the given font at the given size.
    ///
    /// Returns width in points.
    pub fn text_width(&self, text: &str, font_name: &str, font_size: f32) -> f32 {
        self.get_font_or_default(font_name).text_width(text, font_size)
    }

    /// Names of all registered faces, in registration order.
    pub fn font_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fonts.iter().map(|f| f.name)
    }

    /// Select the face for the given weight and slant.
    pub fn select_font(weight: FontWeight, italic: bool) -> &'static FontInfo {
        match (weight, italic) {
            (FontWeight::Normal, false) => &HELVETICA,
            (FontWeight::Bold, false) => &HELVETICA_BOLD,
            (FontWeight::Normal, true) => &HELVETICA_OBLIQUE,
            (FontWeight::Bold, true) => &HELVETICA_BOLD_OBLIQUE,
        }
    }

    /// Resource name used for a face inside page resource dictionaries.
    pub fn resource_name(font: &FontInfo) -> String {
        font.name.replace('-', "")
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A face plus a size in points: everything text measurement depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Font weight
    pub weight: FontWeight,
    /// Oblique face
    pub italic: bool,
    /// Size in points
    pub size: f32,
}

impl FontSpec {
    /// Regular weight at the given size.
    pub fn regular(size: f32) -> Self {
        Self {
            weight: FontWeight::Normal,
            italic: false,
            size,
        }
    }

    /// Bold weight at the given size.
    pub fn bold(size: f32) -> Self {
        Self {
            weight: FontWeight::Bold,
            italic: false,
            size,
        }
    }

    /// Same face, oblique.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Resolve the face.
    pub fn info(&self) -> &'static FontInfo {
        FontManager::select_font(self.weight, self.italic)
    }

    /// Width of `text` in points.
    pub fn width_pt(&self, text: &str) -> f32 {
        self.info().text_width(text, self.size)
    }
}

/// Map a character to its WinAnsiEncoding code.
///
/// Characters with no WinAnsi code become `?`; control characters
/// become a space.
pub fn win_ansi_code(ch: char) -> u8 {
    match ch {
        '\u{20}'..='\u{7E}' => ch as u8,
        '\t' | '\n' | '\r' => b' ',
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

/// Encode a string as WinAnsi bytes.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_manager_creation() {
        let manager = FontManager::new();
        assert!(manager.get_font("Helvetica").is_some());
        assert!(manager.get_font("Helvetica-Bold").is_some());
        assert!(manager.get_font("Times-Roman").is_none());
        assert_eq!(manager.font_names().count(), 4);
    }

    #[test]
    fn test_text_width_calculation() {
        let manager = FontManager::new();

        // "Hello" = H(722) e(556) l(222) l(222) o(556) = 2278 units
        let width = manager.text_width("Hello", "Helvetica", 10.0);
        assert!((width - 22.78).abs() < 0.001);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = FontSpec::regular(12.0).width_pt("Seborrheic keratosis");
        let bold = FontSpec::bold(12.0).width_pt("Seborrheic keratosis");
        assert!(bold > regular);
    }

    #[test]
    fn test_proportional_variance() {
        let font = &HELVETICA;
        assert!(font.char_width('i') < font.char_width('W'));
    }

    #[test]
    fn test_font_selection() {
        assert_eq!(FontManager::select_font(FontWeight::Normal, false).name, "Helvetica");
        assert_eq!(FontManager::select_font(FontWeight::Bold, false).name, "Helvetica-Bold");
        assert_eq!(FontManager::select_font(FontWeight::Normal, true).name, "Helvetica-Oblique");
        assert_eq!(
            FontManager::select_font(FontWeight::Bold, true).name,
            "Helvetica-BoldOblique"
        );
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(FontManager::resource_name(&HELVETICA_BOLD), "HelveticaBold");
    }

    #[test]
    fn test_unknown_font_falls_back() {
        let manager = FontManager::new();
        assert_eq!(manager.get_font_or_default("Comic Sans").name, "Helvetica");
    }

    #[test]
    fn test_line_height() {
        // (718 + 207) * 12 / 1000 = 11.1 points
        let line_height = HELVETICA.line_height(12.0);
        assert!((line_height - 11.1).abs() < 0.001);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Abc"), b"Abc".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("—"), vec![0x97]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn test_non_ascii_widths() {
        assert_eq!(HELVETICA.char_width('—'), 1000.0);
        assert_eq!(HELVETICA.char_width('é'), 556.0);
        // Unmappable characters measure like the '?' they are written as
        assert_eq!(HELVETICA.char_width('日'), HELVETICA.char_width('?'));
    }
}
