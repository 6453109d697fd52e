//! The flex-like layout engine (spec §4.3), built on `taffy` the way the
//! teacher wraps it for its own box/text node tree.

use std::collections::HashMap;

use taffy::prelude::{AvailableSpace, Dimension as TaffyDimension, Size};
use taffy::style::{
    AlignItems as TaffyAlignItems, FlexDirection as TaffyFlexDirection, FlexWrap as TaffyFlexWrap,
    JustifyContent as TaffyJustifyContent, LengthPercentage, Overflow as TaffyOverflow, Style as TaffyStyle,
};
use taffy::{NodeId, TaffyTree};

use crate::error::{ZuiError, ZuiResult};
use crate::instance::slab::SlabHandle;
use crate::instance::InstanceTree;
use crate::style::{AlignItems, Dimension, FlexDirection, JustifyContent, Overflow};
use crate::vnode::Payload;
use crate::widget::measure::line_width;

/// A computed rect in cell coordinates, relative to the viewport origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    #[must_use]
    pub fn area(self) -> u32 {
        u32::from(self.width) * u32::from(self.height)
    }

    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.x < other.x + i32::from(other.width)
            && other.x < self.x + i32::from(self.width)
            && self.y < other.y + i32::from(other.height)
            && other.y < self.y + i32::from(self.height)
    }
}

/// The laid-out tree: one [`Rect`] per [`SlabHandle`], plus overflow/scroll
/// metadata per node the renderer and focus router need (spec §4.3 step 6,
/// §4.8).
#[derive(Default)]
pub struct Layout {
    rects: HashMap<SlabHandle, Rect>,
    content_size: HashMap<SlabHandle, (u16, u16)>,
}

impl Layout {
    #[must_use]
    pub fn rect(&self, handle: SlabHandle) -> Option<Rect> {
        self.rects.get(&handle).copied()
    }

    /// The full (unclipped) content size, used to decide whether a
    /// `Scroll`/`Hidden` overflow container actually overflows.
    #[must_use]
    pub fn content_size(&self, handle: SlabHandle) -> Option<(u16, u16)> {
        self.content_size.get(&handle).copied()
    }
}

pub struct LayoutEngine {
    taffy: TaffyTree<()>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    #[must_use]
    pub fn new() -> Self {
        Self { taffy: TaffyTree::new() }
    }

    /// Compute layout for the whole instance tree rooted at `root`, within
    /// a viewport of `width` x `height` cells (spec §4.3 steps 1-7).
    pub fn compute(&mut self, tree: &InstanceTree, root: SlabHandle, width: u16, height: u16) -> ZuiResult<Layout> {
        self.taffy.clear();
        let mut handle_to_node = HashMap::new();
        let taffy_root = self.build_node(tree, root, &mut handle_to_node)?;
        self.taffy
            .compute_layout(
                taffy_root,
                Size { width: AvailableSpace::Definite(f32::from(width)), height: AvailableSpace::Definite(f32::from(height)) },
            )
            .map_err(|e| ZuiError::InvalidState(format!("layout computation failed: {e:?}")))?;

        let mut layout = Layout::default();
        for (&handle, &node) in &handle_to_node {
            let computed = self.taffy.layout(node).map_err(|e| ZuiError::InvalidState(format!("missing layout: {e:?}")))?;
            layout.rects.insert(
                handle,
                Rect {
                    x: computed.location.x.round() as i32,
                    y: computed.location.y.round() as i32,
                    width: computed.size.width.round().max(0.0) as u16,
                    height: computed.size.height.round().max(0.0) as u16,
                },
            );
            layout.content_size.insert(handle, (computed.content_size.width.round() as u16, computed.content_size.height.round() as u16));
        }
        Ok(layout)
    }

    fn build_node(&mut self, tree: &InstanceTree, handle: SlabHandle, map: &mut HashMap<SlabHandle, NodeId>) -> ZuiResult<NodeId> {
        let instance = tree.get(handle).ok_or_else(|| ZuiError::InvalidState("layout: dangling instance handle".into()))?;
        let mut style = to_taffy_style(instance);

        let children: Vec<SlabHandle> = instance.children.to_vec();
        let mut child_nodes = Vec::with_capacity(children.len());
        for child in &children {
            child_nodes.push(self.build_node(tree, *child, map)?);
        }

        // Text/button intrinsic size is measured eagerly (grapheme-aware,
        // spec §4.3 step 2), so a leaf's `Auto` dimension is folded directly
        // into its style rather than registered as a taffy measure function.
        if child_nodes.is_empty() {
            if let Some((w, h)) = intrinsic_size(instance) {
                if instance.layout.width == Dimension::Auto {
                    style.size.width = TaffyDimension::Length(f32::from(w));
                }
                if instance.layout.height == Dimension::Auto {
                    style.size.height = TaffyDimension::Length(f32::from(h));
                }
            }
        }

        let node = if child_nodes.is_empty() {
            self.taffy.new_leaf(style).map_err(|e| ZuiError::InvalidState(format!("taffy leaf creation failed: {e:?}")))?
        } else {
            self.taffy
                .new_with_children(style, &child_nodes)
                .map_err(|e| ZuiError::InvalidState(format!("taffy node creation failed: {e:?}")))?
        };
        map.insert(handle, node);
        Ok(node)
    }
}

fn to_taffy_style(instance: &crate::instance::Instance) -> TaffyStyle {
    let attrs = &instance.layout;
    TaffyStyle {
        size: Size { width: dimension(attrs.width), height: dimension(attrs.height) },
        min_size: Size { width: dimension(attrs.min_width), height: dimension(attrs.min_height) },
        max_size: Size { width: dimension(attrs.max_width), height: dimension(attrs.max_height) },
        flex_direction: match attrs.direction {
            FlexDirection::Row => TaffyFlexDirection::Row,
            FlexDirection::Column => TaffyFlexDirection::Column,
        },
        flex_grow: attrs.grow,
        flex_shrink: attrs.shrink,
        flex_wrap: if attrs.wrap { TaffyFlexWrap::Wrap } else { TaffyFlexWrap::NoWrap },
        align_items: Some(match attrs.align_items {
            AlignItems::Stretch => TaffyAlignItems::Stretch,
            AlignItems::Start => TaffyAlignItems::FlexStart,
            AlignItems::Center => TaffyAlignItems::Center,
            AlignItems::End => TaffyAlignItems::FlexEnd,
        }),
        justify_content: Some(match attrs.justify_content {
            JustifyContent::Start => TaffyJustifyContent::FlexStart,
            JustifyContent::Center => TaffyJustifyContent::Center,
            JustifyContent::Between => TaffyJustifyContent::SpaceBetween,
            JustifyContent::End => TaffyJustifyContent::FlexEnd,
        }),
        gap: Size {
            width: LengthPercentage::Length(f32::from(attrs.gap)),
            height: LengthPercentage::Length(f32::from(attrs.gap)),
        },
        padding: border_or_padding_rect(attrs.padding, attrs.border),
        border: border_rect(attrs.border),
        overflow: taffy::geometry::Point {
            x: overflow(attrs.overflow),
            y: overflow(attrs.overflow),
        },
        ..Default::default()
    }
}

fn dimension(d: Dimension) -> TaffyDimension {
    match d {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Length(v) => TaffyDimension::Length(v),
        Dimension::Percent(v) => TaffyDimension::Percent(v / 100.0),
    }
}

fn overflow(o: Overflow) -> TaffyOverflow {
    match o {
        Overflow::Visible => TaffyOverflow::Visible,
        Overflow::Hidden => TaffyOverflow::Hidden,
        Overflow::Scroll => TaffyOverflow::Scroll,
    }
}

fn border_rect(border: crate::style::BorderStyle) -> taffy::geometry::Rect<LengthPercentage> {
    let w = f32::from(border.cells());
    taffy::geometry::Rect {
        left: LengthPercentage::Length(w),
        right: LengthPercentage::Length(w),
        top: LengthPercentage::Length(w),
        bottom: LengthPercentage::Length(w),
    }
}

fn border_or_padding_rect(padding: crate::style::Padding, _border: crate::style::BorderStyle) -> taffy::geometry::Rect<LengthPercentage> {
    taffy::geometry::Rect {
        left: LengthPercentage::Length(f32::from(padding.left)),
        right: LengthPercentage::Length(f32::from(padding.right)),
        top: LengthPercentage::Length(f32::from(padding.top)),
        bottom: LengthPercentage::Length(f32::from(padding.bottom)),
    }
}

/// Intrinsic content size for leaf widgets whose size isn't purely
/// flex-determined (spec §4.3 step 2: text nodes report width/height from
/// grapheme measurement).
fn intrinsic_size(instance: &crate::instance::Instance) -> Option<(u16, u16)> {
    match &instance.payload {
        Payload::Text { content } => {
            let width = content.lines().map(line_width).max().unwrap_or(0);
            let height = content.lines().count().max(1);
            Some((width.min(u16::MAX as usize) as u16, height.min(u16::MAX as usize) as u16))
        }
        Payload::Button { label, .. } => Some((line_width(label).min(u16::MAX as usize) as u16, 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::hooks::UpdateQueueHandle;
    use crate::instance::hooks::AppStateSource;
    use crate::commit::Reconciler;
    use crate::vnode::builder::{BoxNode, NodeBuilderMut, TextNode};
    use std::any::Any;
    use std::rc::Rc;

    struct NoAppState;
    impl AppStateSource for NoAppState {
        fn snapshot(&self) -> Rc<dyn Any> {
            Rc::new(())
        }
    }

    #[test]
    fn root_fills_the_viewport_by_default() {
        let mut tree = InstanceTree::new();
        let queue = UpdateQueueHandle::new();
        let root = BoxNode::new().width(80u16).height(24u16).build();
        Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
        let root_handle = tree.root().unwrap();

        let mut engine = LayoutEngine::new();
        let layout = engine.compute(&tree, root_handle, 80, 24).unwrap();
        let rect = layout.rect(root_handle).unwrap();
        assert_eq!(rect.width, 80);
        assert_eq!(rect.height, 24);
    }

    #[test]
    fn row_children_are_placed_left_to_right() {
        let mut tree = InstanceTree::new();
        let queue = UpdateQueueHandle::new();
        let root = BoxNode::new()
            .width(20u16)
            .height(1u16)
            .children(vec![TextNode::new("ab").width(5u16).build(), TextNode::new("cd").width(5u16).build()])
            .build();
        Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
        let root_handle = tree.root().unwrap();
        let children = tree.get(root_handle).unwrap().children.clone();

        let mut engine = LayoutEngine::new();
        let layout = engine.compute(&tree, root_handle, 20, 1).unwrap();
        let first = layout.rect(children[0]).unwrap();
        let second = layout.rect(children[1]).unwrap();
        assert_eq!(first.x, 0);
        assert_eq!(second.x, 5);
    }
}
