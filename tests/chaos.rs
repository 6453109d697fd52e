#![allow(clippy::unwrap_used)]
//! Chaos tests: random trees and random commit/key sequences exercised for
//! robustness rather than a single pinned assertion. Uses a small seeded
//! PRNG for reproducibility without pulling in `rand`.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use zui::commit::Reconciler;
use zui::damage::DamageTracker;
use zui::focus::input_editor::{handle_key, EditorKey, EditorState};
use zui::instance::hooks::{AppStateSource, UpdateQueueHandle};
use zui::instance::InstanceTree;
use zui::layout::{LayoutEngine, Rect};
use zui::render::Renderer;
use zui::vnode::builder::{BoxNode, NodeBuilderMut, TextNode};
use zui::VNode;

struct NoAppState;
impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Rc<dyn Any> {
        Rc::new(())
    }
}

struct Prng(u64);
impl Prng {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        self.0
    }

    fn range(&mut self, n: u64) -> u64 {
        if n == 0 { 0 } else { self.next() % n }
    }
}

fn random_tree(rng: &mut Prng, max_children: u64, remaining_depth: u32) -> VNode {
    if remaining_depth == 0 || rng.range(4) == 0 {
        return TextNode::new(format!("leaf-{}", rng.next())).build();
    }
    let n = rng.range(max_children) as usize;
    let children: Vec<_> = (0..n).map(|_| random_tree(rng, max_children, remaining_depth - 1)).collect();
    BoxNode::new().children(children).build()
}

#[test]
fn random_trees_commit_layout_and_render_without_panicking() {
    let mut rng = Prng(0xC0FFEE);
    for _ in 0..200 {
        let root = random_tree(&mut rng, 5, 4);
        let mut tree = InstanceTree::new();
        let queue = UpdateQueueHandle::new();
        let report = Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
        let Some(root_handle) = tree.root() else { continue };

        let width = (rng.range(120) + 1) as u16;
        let height = (rng.range(40) + 1) as u16;
        let mut engine = LayoutEngine::new();
        let layout = engine.compute(&tree, root_handle, width, height).unwrap();

        let mut damage = DamageTracker::new();
        let viewport = Rect { x: 0, y: 0, width, height };
        let computed = damage.compute(&report, &layout, viewport, None, &HashMap::new());
        Renderer::default().render(&tree, &layout, root_handle, viewport, &computed, 1).unwrap();
    }
}

#[test]
fn random_terminal_sizes_never_panic_the_layout_engine() {
    let mut rng = Prng(12345);
    for _ in 0..500 {
        let width = (rng.range(999) + 1) as u16;
        let height = (rng.range(999) + 1) as u16;
        let root = BoxNode::new().children(vec![TextNode::new("x").build()]).build();

        let mut tree = InstanceTree::new();
        let queue = UpdateQueueHandle::new();
        Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
        let root_handle = tree.root().unwrap();
        let mut engine = LayoutEngine::new();
        engine.compute(&tree, root_handle, width, height).unwrap();
    }
}

#[test]
fn successive_commits_with_randomly_reshuffled_keys_never_lose_the_invariant() {
    let mut rng = Prng(999);
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    let mut keys: Vec<u64> = (0..8).collect();

    for _ in 0..100 {
        // Fisher-Yates shuffle driven by the seeded PRNG.
        for i in (1..keys.len()).rev() {
            let j = rng.range(i as u64 + 1) as usize;
            keys.swap(i, j);
        }
        let children: Vec<_> = keys.iter().map(|&k| TextNode::new(format!("k{k}")).key(k).build()).collect();
        let root = BoxNode::new().children(children).build();
        let report = Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
        assert!(report.mounted.is_empty(), "reshuffling keyed children must never remount them");
    }
}

#[test]
fn random_key_sequences_never_push_the_editor_cursor_out_of_bounds() {
    let mut rng = Prng(42);
    let mut state = EditorState { value: "the quick brown fox".to_string(), cursor: 0, selection: None };
    for _ in 0..500 {
        let key = match rng.range(6) {
            0 => EditorKey::ArrowLeft { shift: rng.range(2) == 0 },
            1 => EditorKey::ArrowRight { shift: rng.range(2) == 0 },
            2 => EditorKey::Home { shift: false },
            3 => EditorKey::End { shift: false },
            4 => EditorKey::Backspace,
            _ => EditorKey::Delete,
        };
        state = handle_key(&state, key);
        assert!(state.cursor <= state.value.len());
    }
}
