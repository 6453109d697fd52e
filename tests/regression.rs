#![allow(clippy::unwrap_used)]
//! Regression tests pinning specific edge-case behaviors called out in the
//! commit, damage, drawlist, and focus invariants.

use std::any::Any;
use std::rc::Rc;

use zui::commit::{CommitReport, Reconciler};
use zui::damage::{Damage, DamageTracker};
use zui::drawlist::{Decoder, DrawlistBuilder, DrawlistCaps};
use zui::error::ZuiError;
use zui::focus::trap::Trap;
use zui::focus::{FocusState, NavMode, Traversal, Zone};
use zui::instance::hooks::{AppStateSource, UpdateQueueHandle};
use zui::instance::InstanceTree;
use zui::layout::{Layout, Rect};
use zui::style::{Color, TextStyle};
use zui::vnode::builder::{BoxNode, NodeBuilderMut, TextNode};

struct NoAppState;
impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Rc<dyn Any> {
        Rc::new(())
    }
}

#[test]
fn unkeyed_children_of_the_same_kind_reconcile_positionally() {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    let root1 = BoxNode::new().children(vec![TextNode::new("a").build(), TextNode::new("b").build()]).build();
    Reconciler::commit(&mut tree, Some(root1), &queue, &NoAppState).unwrap();
    let root = tree.root().unwrap();
    let before = tree.get(root).unwrap().children.clone();

    let root2 = BoxNode::new().children(vec![TextNode::new("a2").build(), TextNode::new("b2").build()]).build();
    let report = Reconciler::commit(&mut tree, Some(root2), &queue, &NoAppState).unwrap();
    let after = tree.get(root).unwrap().children.clone();

    assert!(report.mounted.is_empty(), "same kind at the same position must update, not remount");
    assert_eq!(before, after);
}

#[test]
fn duplicate_sibling_keys_are_rejected_with_the_stable_error_code() {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    let root = BoxNode::new()
        .children(vec![TextNode::new("a").key(1u64).build(), TextNode::new("b").key(1u64).build()])
        .build();
    let err = Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap_err();
    assert_eq!(err.code(), "DUPLICATE_KEY");
    assert!(matches!(err, ZuiError::DuplicateKey { .. }));
}

#[test]
fn damage_escalates_to_full_viewport_past_the_threshold() {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    let root = BoxNode::new()
        .children(vec![TextNode::new("a").build(), TextNode::new("b").build(), TextNode::new("c").build()])
        .build();
    let report = Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();

    let mut engine = zui::layout::LayoutEngine::new();
    let root_handle = tree.root().unwrap();
    let layout = engine.compute(&tree, root_handle, 10, 10).unwrap();

    let mut tracker = DamageTracker::new().with_threshold(0.1);
    let viewport = Rect { x: 0, y: 0, width: 10, height: 10 };
    let damage = tracker.compute(&report, &layout, viewport, None, &std::collections::HashMap::new());
    assert!(matches!(damage, Damage::FullViewport), "a low threshold with several mounted rects must escalate to a full redraw");
}

#[test]
fn an_empty_commit_report_produces_no_damage_rects() {
    let report = CommitReport::default();
    let layout = Layout::default();
    let mut tracker = DamageTracker::new();
    let viewport = Rect { x: 0, y: 0, width: 80, height: 24 };
    let damage = tracker.compute(&report, &layout, viewport, None, &std::collections::HashMap::new());
    match damage {
        Damage::Rects(rects) => assert!(rects.is_empty()),
        Damage::FullViewport => panic!("an empty report must not force a full redraw"),
    }
}

#[test]
fn drawlist_round_trips_a_styled_text_command() {
    let mut builder = DrawlistBuilder::new(7, 20, 3, DrawlistCaps::default());
    let style = TextStyle::default().color(Color::Rgb(200, 50, 10)).bold();
    builder.clear(Color::Black).draw_text(2, 1, "hello", &style);
    let bytes = builder.build().unwrap();

    let decoder = Decoder::new(&bytes).unwrap();
    assert_eq!(decoder.header().frame_id, 7);
    assert_eq!(decoder.header().viewport_width, 20);
    assert_eq!(decoder.header().viewport_height, 3);

    let commands: Vec<_> = decoder.commands().collect::<Result<Vec<_>, _>>().unwrap();
    assert!(commands.iter().any(|c| matches!(c, zui::drawlist::DrawCommand::DrawText { text, .. } if *text == "hello")));
}

#[test]
fn malformed_drawlist_bytes_are_rejected_not_panicked_on() {
    let err = Decoder::new(&[0u8; 3]).unwrap_err();
    assert_eq!(err.code(), "FORMAT");
}

#[test]
fn escape_only_restores_the_return_target_of_the_top_trap() {
    let mut state = FocusState::new();
    state.traps.activate(Trap::new("outer", ["a".to_string()]).with_return_focus_to("outer-return"));
    state.traps.activate(Trap::new("inner", ["b".to_string()]).with_return_focus_to("inner-return"));

    assert_eq!(state.traps.deactivate("outer"), None, "deactivating a non-top trap must not report a return target");
    assert_eq!(state.traps.top().unwrap().id, "inner");
    assert_eq!(state.traps.deactivate("inner").as_deref(), Some("inner-return"));
    assert!(state.traps.is_empty());
}

#[test]
fn zone_traversal_clamps_at_the_end_without_wrap() {
    let mut state = FocusState::new();
    state.set_zones(vec![Zone::new("main", NavMode::Linear).with_focusables(["a".to_string(), "b".to_string()])]);
    state.active_zone_id = Some("main".to_string());
    state.focused_id = Some("b".to_string());
    state.traverse(Traversal::Next);
    assert_eq!(state.focused_id.as_deref(), Some("b"), "without wrap, traversal past the last focusable stays put");
}
