//! Node text measurement.
//!
//! Node boxes are sized from their label when an idea is dropped and again
//! whenever the label is edited. Hosts with a real text engine implement
//! [`TextMeasure`] themselves; [`TextMetrics`] is a deterministic
//! approximation of the default label style (14px medium weight, 16px
//! padding, 250px max width, 1.2 line height, pre-wrap).

use crate::model::Size;

/// Measures the box a label needs.
pub trait TextMeasure {
    /// Return a strictly positive size for `text`.
    fn measure(&self, text: &str) -> Size;
}

/// Fixed-advance text metrics with greedy word wrapping.
#[derive(Debug, Clone)]
pub struct TextMetrics {
    pub font_size: f64,
    pub padding: f64,
    pub max_width: f64,
    pub line_height: f64,
    /// Average glyph advance as a fraction of `font_size`.
    pub char_advance: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            padding: 16.0,
            max_width: 250.0,
            line_height: 1.2,
            char_advance: 0.55,
        }
    }
}

impl TextMetrics {
    fn glyph_width(&self) -> f64 {
        self.font_size * self.char_advance
    }

    /// Characters that fit on one line inside the padding. Never zero.
    fn chars_per_line(&self) -> usize {
        let inner = (self.max_width - 2.0 * self.padding).max(0.0);
        ((inner / self.glyph_width()).floor() as usize).max(1)
    }

    /// Wrap `text` and return the character count of every visual line.
    pub fn wrap(&self, text: &str) -> Vec<usize> {
        let cap = self.chars_per_line();
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current = 0usize;
            let mut started = false;
            for word in paragraph.split(' ') {
                let mut len = word.chars().count();
                let sep = usize::from(started);
                if started && current + sep + len <= cap {
                    current += sep + len;
                    continue;
                }
                if started {
                    lines.push(current);
                }
                // Words longer than a line break mid-word.
                while len > cap {
                    lines.push(cap);
                    len -= cap;
                }
                current = len;
                started = true;
            }
            lines.push(current);
        }

        lines
    }
}

impl TextMeasure for TextMetrics {
    fn measure(&self, text: &str) -> Size {
        let lines = self.wrap(text);
        let widest = lines.iter().copied().max().unwrap_or(0) as f64;
        let width = (widest * self.glyph_width() + 2.0 * self.padding).min(self.max_width);
        let height = lines.len() as f64 * self.font_size * self.line_height + 2.0 * self.padding;
        Size {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word() {
        let m = TextMetrics::default();
        let size = m.measure("Launch");
        assert!((size.width - (6.0 * 7.7 + 32.0)).abs() < 1e-9);
        assert!((size.height - (16.8 + 32.0)).abs() < 1e-9);
    }

    #[test]
    fn empty_text_is_still_positive() {
        let size = TextMetrics::default().measure("");
        assert!(size.width > 0.0);
        assert!(size.height > 0.0);
    }

    #[test]
    fn long_text_wraps_at_max_width() {
        let m = TextMetrics::default();
        let text = "a fairly long idea that certainly will not fit on a single line";
        let size = m.measure(text);
        assert!(size.width <= m.max_width);
        assert!(m.wrap(text).len() > 1);
        assert!(size.height > m.measure("short").height);
    }

    #[test]
    fn explicit_newlines_start_lines() {
        let m = TextMetrics::default();
        assert_eq!(m.wrap("one\ntwo\n"), vec![3, 3, 0]);
    }

    #[test]
    fn overlong_word_breaks() {
        let m = TextMetrics::default();
        let cap = m.chars_per_line();
        let word = "x".repeat(cap * 2 + 3);
        assert_eq!(m.wrap(&word), vec![cap, cap, 3]);
    }
}
