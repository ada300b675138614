//! Text measurement and line wrapping.
//!
//! Widths are reported in page units (millimetres) so layout code never
//! has to think about points.

mod wrap;

pub use wrap::{wrap, WrapResult};

use crate::writer::FontSpec;

/// Points per millimetre (72 pt per inch, 25.4 mm per inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimetres to points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Convert points to millimetres.
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

/// Width of `text` set in `font`, in millimetres.
pub fn text_width(text: &str, font: &FontSpec) -> f32 {
    pt_to_mm(font.width_pt(text))
}

/// Distance between baselines for `font`, in millimetres.
///
/// Uses a 1.15 leading factor over the nominal size.
pub fn line_height(font: &FontSpec) -> f32 {
    pt_to_mm(font.size * 1.15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
        assert!((pt_to_mm(72.0) - 25.4).abs() < 1e-4);
        assert!((pt_to_mm(mm_to_pt(15.0)) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_text_width_mm() {
        // "Hello" at 10pt is 22.78pt
        let width = text_width("Hello", &FontSpec::regular(10.0));
        assert!((width - 22.78 / PT_PER_MM).abs() < 1e-4);
        assert_eq!(text_width("", &FontSpec::bold(16.0)), 0.0);
    }

    #[test]
    fn test_line_height_scales_with_size() {
        let small = line_height(&FontSpec::regular(9.0));
        let large = line_height(&FontSpec::regular(18.0));
        assert!((large - 2.0 * small).abs() < 1e-4);
    }
}
