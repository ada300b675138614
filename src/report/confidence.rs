//! Confidence classification and horizontal bars.
//!
//! The printable gauge and the likelihood chart share one classifier
//! and one bar geometry; they differ only in where the percentage label
//! goes.

use super::canvas::{Canvas, Rect, TextStyle};
use super::layout::Palette;
use crate::text::{pt_to_mm, text_width};
use crate::writer::{Color, FontSpec};

/// How much trust the classifier output deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    /// `score >= 0.85`
    High,
    /// `0.60 <= score < 0.85`
    Moderate,
    /// `score < 0.60`
    Low,
}

impl ConfidenceLevel {
    /// Lower bound of [`ConfidenceLevel::High`].
    pub const HIGH_THRESHOLD: f64 = 0.85;
    /// Lower bound of [`ConfidenceLevel::Moderate`].
    pub const MODERATE_THRESHOLD: f64 = 0.60;

    /// Classify a score. Both thresholds are inclusive.
    pub fn classify(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if score >= Self::MODERATE_THRESHOLD {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::Low
        }
    }

    /// Bar colour for this level.
    pub fn color(&self, palette: &Palette) -> Color {
        match self {
            ConfidenceLevel::High => palette.high,
            ConfidenceLevel::Moderate => palette.moderate,
            ConfidenceLevel::Low => palette.low,
        }
    }

    /// Sentence printed under the gauge.
    pub fn interpretation(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High confidence.",
            ConfidenceLevel::Moderate => "Moderate confidence, clinical review recommended.",
            ConfidenceLevel::Low => "Low confidence, consultation strongly advised.",
        }
    }
}

/// Where a bar's percentage label goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    /// Inside the filled part, in the header text colour
    Inside,
    /// Right of the track, in the level colour
    Beside,
}

impl LabelPlacement {
    /// Smallest fraction whose label fits inside the bar.
    pub const INSIDE_MIN_FRACTION: f64 = 0.20;

    /// Inside for wide bars, beside otherwise.
    pub fn for_fraction(fraction: f64) -> Self {
        if fraction >= Self::INSIDE_MIN_FRACTION {
            LabelPlacement::Inside
        } else {
            LabelPlacement::Beside
        }
    }
}

/// A fully resolved bar, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Background track
    pub track: Rect,
    /// Filled portion
    pub fill: Rect,
    /// Threshold class of the value
    pub level: ConfidenceLevel,
    /// Percentage text
    pub label: String,
    /// Label placement
    pub placement: LabelPlacement,
    /// Distance between the label and the bar edge it hangs off
    pub label_gap: f32,
}

/// Options for [`Bar::layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarStyle {
    /// Digits after the decimal point in the label
    pub decimals: usize,
    /// Smallest visible fill, as a fraction of the track
    pub min_fraction: f64,
    /// Space between track and a label placed beside it
    pub label_gap: f32,
}

impl Bar {
    /// Resolve geometry for `value` in `[0, 1]` on `track`.
    pub fn layout(value: f64, track: Rect, placement: LabelPlacement, style: BarStyle) -> Self {
        let clamped = value.clamp(0.0, 1.0);
        let shown = clamped.max(style.min_fraction);
        let fill = Rect::new(track.x, track.y, track.width * shown as f32, track.height);
        Self {
            track,
            fill,
            level: ConfidenceLevel::classify(value),
            label: format!("{:.*}%", style.decimals, clamped * 100.0),
            placement,
            label_gap: style.label_gap,
        }
    }

    /// Draw track, fill and label.
    pub fn draw(&self, canvas: &mut Canvas, palette: &Palette, font: FontSpec) {
        let color = self.level.color(palette);
        canvas.fill_rect(self.track, palette.track);
        canvas.fill_rect(self.fill, color);

        let baseline = self.track.y + self.track.height * 0.5 + pt_to_mm(font.size * 0.35);
        match self.placement {
            LabelPlacement::Beside => {
                canvas.text(
                    &self.label,
                    self.track.right() + self.label_gap,
                    baseline,
                    TextStyle::new(font, color),
                );
            },
            LabelPlacement::Inside => {
                let width = text_width(&self.label, &font);
                let x = self.fill.x + ((self.fill.width - width) / 2.0).max(self.label_gap);
                canvas.text(&self.label, x, baseline, TextStyle::new(font, palette.header_text));
            },
        }
    }
}
