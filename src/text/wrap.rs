//! Greedy word wrapping against real font metrics.

use super::text_width;
use crate::writer::FontSpec;

/// Lines produced by [`wrap`].
///
/// Never empty: blank input yields a single empty line so that height
/// calculations always count at least one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapResult {
    /// Wrapped lines, in reading order
    pub lines: Vec<String>,
}

impl WrapResult {
    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total height when each line advances by `line_height`.
    pub fn height(&self, line_height: f32) -> f32 {
        self.lines.len() as f32 * line_height
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// Wrap `text` into lines no wider than `max_width` millimetres.
///
/// Words are packed greedily and separated by single spaces; runs of
/// whitespace collapse. A word is only split when it is wider than
/// `max_width` on its own, in which case it is broken between
/// characters. A single glyph wider than `max_width` still gets a line
/// of its own, which is the only case a line can exceed the limit.
pub fn wrap(text: &str, max_width: f32, font: &FontSpec) -> WrapResult {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = place_word(word, max_width, font, &mut lines);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if text_width(&candidate, font) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = place_word(word, max_width, font, &mut lines);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    WrapResult { lines }
}

/// Start a fresh line with `word`, hard-breaking it if it cannot fit.
///
/// Full chunks go to `lines`; the returned tail stays open so following
/// words may join it.
fn place_word(word: &str, max_width: f32, font: &FontSpec, lines: &mut Vec<String>) -> String {
    if text_width(word, font) <= max_width {
        return word.to_string();
    }

    let mut chunk = String::new();
    for ch in word.chars() {
        chunk.push(ch);
        if text_width(&chunk, font) > max_width && chunk.chars().count() > 1 {
            chunk.pop();
            lines.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        }
    }
    chunk
}
