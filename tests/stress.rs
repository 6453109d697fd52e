#![allow(clippy::unwrap_used)]
//! Stress tests exercising the commit/layout/render pipeline at scale.
//! The expensive ones are `#[ignore]`d by default.
//!
//! Run the ignored ones with: `cargo test --test stress -- --ignored`

use std::any::Any;
use std::rc::Rc;

use zui::commit::Reconciler;
use zui::damage::DamageTracker;
use zui::instance::hooks::{AppStateSource, UpdateQueueHandle};
use zui::instance::InstanceTree;
use zui::layout::{LayoutEngine, Rect};
use zui::render::Renderer;
use zui::style::Dimension;
use zui::vnode::builder::{BoxNode, NodeBuilderMut, TextNode};
use zui::VNode;

struct NoAppState;
impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Rc<dyn Any> {
        Rc::new(())
    }
}

fn wide_row(n: usize) -> VNode {
    let children: Vec<_> = (0..n).map(|i| TextNode::new(format!("cell-{i}")).width(Dimension::Length(4.0)).build()).collect();
    BoxNode::new().children(children).build()
}

fn deep_chain(depth: usize) -> VNode {
    let mut node = TextNode::new("leaf").build();
    for _ in 0..depth {
        node = BoxNode::new().children(vec![node]).build();
    }
    node
}

fn run_one_frame(root: VNode, width: u16, height: u16) {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    let report = Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
    let root_handle = tree.root().unwrap();

    let mut engine = LayoutEngine::new();
    let layout = engine.compute(&tree, root_handle, width, height).unwrap();

    let mut damage = DamageTracker::new();
    let viewport = Rect { x: 0, y: 0, width, height };
    let computed = damage.compute(&report, &layout, viewport, None, &std::collections::HashMap::new());

    Renderer::default().render(&tree, &layout, root_handle, viewport, &computed, 1).unwrap();
}

#[test]
fn a_thousand_sibling_children_render_without_panicking() {
    run_one_frame(wide_row(1_000), 4_000, 5);
}

#[test]
fn a_deeply_nested_chain_lays_out_without_stack_overflow() {
    run_one_frame(deep_chain(500), 80, 24);
}

#[test]
#[ignore = "long-running stress test"]
fn ten_thousand_sequential_commits_stay_bounded() {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    for i in 0..10_000 {
        let root = BoxNode::new().children(vec![TextNode::new(format!("frame-{i}")).build()]).build();
        Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
    }
    assert_eq!(tree.len(), 2, "reusing the same shape every commit must not leak instances");
}

#[test]
#[ignore = "long-running stress test"]
fn a_hundred_thousand_leaf_wide_row_still_lays_out() {
    run_one_frame(wide_row(100_000), 80, 24);
}

#[test]
fn repeated_mount_and_unmount_cycles_leave_an_empty_tree() {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    for _ in 0..200 {
        let root = wide_row(20);
        Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
        Reconciler::commit(&mut tree, None, &queue, &NoAppState).unwrap();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
}
