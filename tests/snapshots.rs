#![allow(clippy::unwrap_used)]
//! Snapshot tests for rendered drawlist output. Run `cargo insta review` to
//! review and accept snapshot changes.

use std::any::Any;
use std::rc::Rc;

use zui::commit::Reconciler;
use zui::damage::DamageTracker;
use zui::instance::hooks::{AppStateSource, UpdateQueueHandle};
use zui::instance::InstanceTree;
use zui::layout::{LayoutEngine, Rect};
use zui::render::buffer::Buffer;
use zui::render::Renderer;
use zui::style::{AlignItems, BorderStyle, Dimension, JustifyContent};
use zui::vnode::builder::{BoxNode, ColumnNode, NodeBuilderMut, RowNode, TextNode};
use zui::VNode;

struct NoAppState;
impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Rc<dyn Any> {
        Rc::new(())
    }
}

fn render_snapshot(root: VNode, width: u16, height: u16) -> String {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    let report = Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
    let root_handle = tree.root().unwrap();

    let mut engine = LayoutEngine::new();
    let layout = engine.compute(&tree, root_handle, width, height).unwrap();

    let mut damage = DamageTracker::new();
    let viewport = Rect { x: 0, y: 0, width, height };
    let computed = damage.compute(&report, &layout, viewport, None, &std::collections::HashMap::new());

    let bytes = Renderer::default().render(&tree, &layout, root_handle, viewport, &computed, 1).unwrap();
    let mut buffer = Buffer::new(width, height);
    buffer.apply_drawlist(&bytes).unwrap();
    buffer.to_text()
}

#[test]
fn snapshot_box_single_border() {
    let root = BoxNode::new().width(Dimension::Length(15.0)).height(Dimension::Length(5.0)).border(BorderStyle::Single).build();
    insta::assert_snapshot!(render_snapshot(root, 20, 10));
}

#[test]
fn snapshot_box_double_border() {
    let root = BoxNode::new().width(Dimension::Length(15.0)).height(Dimension::Length(5.0)).border(BorderStyle::Double).build();
    insta::assert_snapshot!(render_snapshot(root, 20, 10));
}

#[test]
fn snapshot_box_rounded_border() {
    let root = BoxNode::new().width(Dimension::Length(15.0)).height(Dimension::Length(5.0)).border(BorderStyle::Rounded).build();
    insta::assert_snapshot!(render_snapshot(root, 20, 10));
}

#[test]
fn snapshot_row_of_text_centered() {
    let root = RowNode::new()
        .width(Dimension::Length(20.0))
        .height(Dimension::Length(3.0))
        .justify_content(JustifyContent::Center)
        .align_items(AlignItems::Center)
        .children(vec![TextNode::new("a").build(), TextNode::new("b").build(), TextNode::new("c").build()])
        .build();
    insta::assert_snapshot!(render_snapshot(root, 20, 3));
}

#[test]
fn snapshot_column_of_bordered_boxes() {
    let root = ColumnNode::new()
        .children(vec![
            BoxNode::new().width(Dimension::Length(8.0)).height(Dimension::Length(3.0)).border(BorderStyle::Single).build(),
            BoxNode::new().width(Dimension::Length(8.0)).height(Dimension::Length(3.0)).border(BorderStyle::Single).build(),
        ])
        .build();
    insta::assert_snapshot!(render_snapshot(root, 10, 6));
}

#[test]
fn snapshot_text_wider_than_viewport_is_not_wrapped() {
    let root = TextNode::new("this line is longer than the viewport width").build();
    insta::assert_snapshot!(render_snapshot(root, 12, 1));
}
