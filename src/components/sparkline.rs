//! A single-line sparkline rendered with the eight Unicode block-height
//! glyphs as a plain text node.

use crate::style::Color;
use crate::vnode::builder::{NodeBuilderMut, TextNode};
use crate::vnode::VNode;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Default)]
pub struct Sparkline {
    values: Vec<f32>,
    color: Option<Color>,
}

impl Sparkline {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self { values: values.into_iter().collect(), color: None }
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        let (min, max) = self.values.iter().fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = (max - min).max(f32::EPSILON);
        let text: String = self
            .values
            .iter()
            .map(|&v| {
                let level = (((v - min) / range) * (BLOCKS.len() - 1) as f32).round() as usize;
                BLOCKS[level.min(BLOCKS.len() - 1)]
            })
            .collect();
        let mut node = TextNode::new(text);
        if let Some(color) = self.color {
            node = node.color(color);
        }
        node.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::Payload;

    #[test]
    fn monotonic_values_produce_ascending_glyph_heights() {
        let node = Sparkline::new([0.0, 0.25, 0.5, 0.75, 1.0]).build();
        let Payload::Text { content } = &node.payload else { panic!("expected text payload") };
        let glyphs: Vec<char> = content.chars().collect();
        assert_eq!(glyphs.len(), 5);
        assert_eq!(glyphs[0], BLOCKS[0]);
        assert_eq!(glyphs[4], BLOCKS[BLOCKS.len() - 1]);
    }

    #[test]
    fn constant_series_does_not_divide_by_zero() {
        let node = Sparkline::new([3.0, 3.0, 3.0]).build();
        let Payload::Text { content } = &node.payload else { panic!("expected text payload") };
        assert_eq!(content.chars().count(), 3);
    }
}
