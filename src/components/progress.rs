//! A horizontal progress bar rendered as a single text line of filled and
//! empty block glyphs (spec §3 Supplemented features).

use crate::style::Color;
use crate::vnode::builder::{NodeBuilderMut, TextNode};
use crate::vnode::VNode;

const FILLED: char = '█';
const EMPTY: char = '░';

#[derive(Debug, Clone)]
pub struct Progress {
    fraction: f32,
    width: usize,
    label: Option<String>,
    color: Color,
}

impl Default for Progress {
    fn default() -> Self {
        Self { fraction: 0.0, width: 20, label: None, color: Color::Green }
    }
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamped to `[0.0, 1.0]`; a caller passing an out-of-range fraction
    /// gets a full or empty bar rather than a malformed glyph count.
    #[must_use]
    pub fn fraction(mut self, fraction: f32) -> Self {
        self.fraction = fraction.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        let filled = ((self.fraction * self.width as f32).round() as usize).min(self.width);
        let mut bar: String = std::iter::repeat(FILLED).take(filled).collect();
        bar.extend(std::iter::repeat(EMPTY).take(self.width - filled));
        let percent = (self.fraction * 100.0).round() as u32;
        let text = match &self.label {
            Some(label) => format!("{bar} {percent:>3}% {label}"),
            None => format!("{bar} {percent:>3}%"),
        };
        TextNode::new(text).color(self.color).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::Payload;

    fn text(node: &VNode) -> String {
        let Payload::Text { content } = &node.payload else { panic!("expected text payload") };
        content.to_string()
    }

    #[test]
    fn half_fraction_fills_half_the_width() {
        let node = Progress::new().width(10).fraction(0.5).build();
        let rendered = text(&node);
        assert_eq!(rendered.chars().filter(|&c| c == FILLED).count(), 5);
        assert!(rendered.contains("50%"));
    }

    #[test]
    fn out_of_range_fraction_is_clamped() {
        let node = Progress::new().width(4).fraction(2.0).build();
        assert_eq!(text(&node).chars().filter(|&c| c == FILLED).count(), 4);
    }
}
