//! "Key: value" rows with wrapped values.
//!
//! Measuring and drawing are separate steps: a box must know how tall
//! its fields are before its border is drawn underneath them.

use std::ops::Range;

use super::canvas::{Canvas, TextStyle};
use crate::text::{wrap, WrapResult};

/// Layout shared by every field in a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRenderer {
    /// Offset from the field origin to where the value starts
    pub key_column_width: f32,
    /// Width the value wraps within
    pub value_max_width: f32,
    /// Advance per wrapped line
    pub line_height: f32,
    /// Key style (bold)
    pub key_style: TextStyle,
    /// Value style
    pub value_style: TextStyle,
}

/// A field whose value has already been wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredField {
    /// Key as printed, including the trailing colon
    pub key: String,
    /// Wrapped value
    pub value: WrapResult,
}

impl MeasuredField {
    /// Lines the field occupies.
    pub fn lines_consumed(&self) -> usize {
        self.value.line_count()
    }
}

impl FieldRenderer {
    /// Wrap a field without drawing it.
    pub fn measure(&self, key: &str, value: &str) -> MeasuredField {
        MeasuredField {
            key: format!("{}:", key),
            value: wrap(value, self.value_max_width, &self.value_style.font),
        }
    }

    /// Height a measured field occupies.
    pub fn height(&self, field: &MeasuredField) -> f32 {
        field.value.height(self.line_height)
    }

    /// Draw a measured field whose first line starts at `top`.
    ///
    /// Returns the number of lines drawn.
    pub fn draw_measured(&self, canvas: &mut Canvas, field: &MeasuredField, x: f32, top: f32) -> usize {
        self.draw_lines(canvas, field, 0..field.lines_consumed(), x, top)
    }

    /// Draw only the value lines in `lines`, the first of them at `top`.
    ///
    /// The key goes next to line 0 and is left out of continuation
    /// segments. Returns the number of lines drawn.
    pub fn draw_lines(
        &self,
        canvas: &mut Canvas,
        field: &MeasuredField,
        lines: Range<usize>,
        x: f32,
        top: f32,
    ) -> usize {
        let end = lines.end.min(field.lines_consumed());
        let start = lines.start.min(end);
        let baseline = top + self.line_height * 0.75;
        if start == 0 {
            canvas.text(&field.key, x, baseline, self.key_style);
        }
        for (i, line) in field.value.lines[start..end].iter().enumerate() {
            canvas.text(
                line,
                x + self.key_column_width,
                baseline + i as f32 * self.line_height,
                self.value_style,
            );
        }
        end - start
    }

    /// Measure and draw in one step.
    pub fn draw(&self, canvas: &mut Canvas, key: &str, value: &str, x: f32, top: f32) -> usize {
        let field = self.measure(key, value);
        self.draw_measured(canvas, &field, x, top)
    }
}
