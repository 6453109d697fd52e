//! A 2D grid rendered as rows of single-cell colored boxes, interpolating
//! each value's color between a low and high endpoint (spec §3
//! Supplemented features).

use crate::style::{Color, Dimension};
use crate::vnode::builder::{BoxNode, ColumnNode, NodeBuilderMut, RowNode};
use crate::vnode::VNode;

#[derive(Debug, Clone)]
pub struct Heatmap {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
    low: Color,
    high: Color,
}

impl Heatmap {
    /// `values` is row-major; shorter than `rows * cols` pads with zero,
    /// longer is truncated.
    #[must_use]
    pub fn new(rows: usize, cols: usize, values: impl IntoIterator<Item = f32>) -> Self {
        let mut values: Vec<f32> = values.into_iter().collect();
        values.resize(rows * cols, 0.0);
        Self { rows, cols, values, low: Color::Rgb(20, 20, 60), high: Color::Rgb(255, 80, 0) }
    }

    #[must_use]
    pub fn colors(mut self, low: Color, high: Color) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    fn interpolate(&self, t: f32) -> Color {
        let (lr, lg, lb) = self.low.to_rgb();
        let (hr, hg, hb) = self.high.to_rgb();
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Color::Rgb(lerp(lr, hr), lerp(lg, hg), lerp(lb, hb))
    }

    #[must_use]
    pub fn build(self) -> VNode {
        let (min, max) = self.values.iter().fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = (max - min).max(f32::EPSILON);
        let mut rows = Vec::with_capacity(self.rows);
        for r in 0..self.rows {
            let mut cells = Vec::with_capacity(self.cols);
            for c in 0..self.cols {
                let value = self.values[r * self.cols + c];
                let color = self.interpolate((value - min) / range);
                cells.push(BoxNode::new().width(Dimension::Length(2.0)).height(Dimension::Length(1.0)).bg(color).build());
            }
            rows.push(RowNode::new().children(cells).build());
        }
        ColumnNode::new().children(rows).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::WidgetKind;

    #[test]
    fn grid_shape_matches_rows_and_cols() {
        let node = Heatmap::new(2, 3, [0.0, 0.5, 1.0, 0.2, 0.4, 0.6]).build();
        assert_eq!(node.kind, WidgetKind::Column);
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].children.len(), 3);
    }

    #[test]
    fn short_value_list_is_padded_with_zero() {
        let heatmap = Heatmap::new(1, 4, [1.0]);
        assert_eq!(heatmap.values.len(), 4);
        assert_eq!(heatmap.values[1], 0.0);
    }
}
