#![allow(clippy::unwrap_used)]
//! Integration tests for the composite widget library (spec §3 Supplemented
//! features: components module), exercised through the real commit/layout/
//! render pipeline rather than unit-level builder checks alone.

use std::any::Any;
use std::rc::Rc;

use zui::commit::Reconciler;
use zui::components::{status_bar, ChatMessage, ChatView, DiffLine, DiffView, Heatmap, MessageRole, Progress, Sparkline, StatusBarProps, StatusState};
use zui::damage::Damage;
use zui::instance::hooks::{AppStateSource, UpdateQueueHandle};
use zui::instance::InstanceTree;
use zui::layout::{LayoutEngine, Rect};
use zui::render::buffer::Buffer;
use zui::render::Renderer;
use zui::vnode::WidgetKind;
use zui::VNode;

struct NoAppState;
impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Rc<dyn Any> {
        Rc::new(())
    }
}

fn render_to_text(root: VNode, width: u16, height: u16) -> String {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
    let root_handle = tree.root().unwrap();

    let mut engine = LayoutEngine::new();
    let layout = engine.compute(&tree, root_handle, width, height).unwrap();
    let viewport = Rect { x: 0, y: 0, width, height };
    let bytes = Renderer::default().render(&tree, &layout, root_handle, viewport, &Damage::FullViewport, 1).unwrap();

    let mut buffer = Buffer::new(width, height);
    buffer.apply_drawlist(&bytes).unwrap();
    buffer.to_text()
}

#[test]
fn chat_view_renders_through_the_full_pipeline() {
    let root = ChatView::new()
        .message(ChatMessage::new(MessageRole::User, "what's the plan?"))
        .message(ChatMessage::new(MessageRole::Assistant, "ship it"))
        .build();
    let text = render_to_text(root, 60, 4);
    assert!(text.contains("you: what's the plan?"));
    assert!(text.contains("assistant: ship it"));
}

#[test]
fn diff_view_renders_through_the_full_pipeline() {
    let root = DiffView::new().file_path("src/main.rs").line(DiffLine::add(10, "fn main() {}")).build();
    let text = render_to_text(root, 60, 4);
    assert!(text.contains("src/main.rs"));
    assert!(text.contains("+fn main() {}"));
}

#[test]
fn progress_bar_renders_the_expected_fill_and_percent() {
    let root = Progress::new().width(10).fraction(0.3).build();
    let text = render_to_text(root, 20, 1);
    assert!(text.contains('█'));
    assert!(text.contains("30%"));
}

#[test]
fn sparkline_produces_one_glyph_per_value() {
    let root = Sparkline::new([0.0, 1.0, 0.5]).build();
    assert_eq!(root.kind, WidgetKind::Text);
    let text = render_to_text(root, 10, 1);
    assert_eq!(text.chars().filter(|c| !c.is_whitespace()).count(), 3);
}

#[test]
fn heatmap_builds_a_grid_with_the_requested_shape_and_renders() {
    let root = Heatmap::new(2, 2, [0.0, 0.5, 1.0, 0.25]).build();
    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].children.len(), 2);
    // Four 2-wide cells, two rows: should lay out and render without panicking.
    let _ = render_to_text(root, 10, 2);
}

#[test]
fn status_bar_composite_renders_through_the_commit_pipeline() {
    let props = StatusBarProps { state: StatusState::Error, message: "boom".to_string() };
    let root = status_bar(props, None);
    let text = render_to_text(root, 40, 1);
    assert!(text.contains("Error"));
    assert!(text.contains("boom"));
}

#[test]
fn status_bar_composite_queues_a_spinner_tick_only_while_active() {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    let active = status_bar(StatusBarProps { state: StatusState::Thinking, message: "working".to_string() }, None);
    Reconciler::commit(&mut tree, Some(active), &queue, &NoAppState).unwrap();
    assert!(!queue.is_empty(), "an active status bar must queue a spinner tick on every render");

    let mut idle_tree = InstanceTree::new();
    let idle_queue = UpdateQueueHandle::new();
    let idle = status_bar(StatusBarProps::default(), None);
    Reconciler::commit(&mut idle_tree, Some(idle), &idle_queue, &NoAppState).unwrap();
    assert!(idle_queue.is_empty(), "an idle status bar must not queue a spinner tick");
}
