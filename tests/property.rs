//! Property-based tests over codec, layout, and focus invariants.

use proptest::prelude::*;

use zui::drawlist::{Decoder, DrawCommand, DrawlistBuilder, DrawlistCaps};
use zui::focus::input_editor::{handle_key, insert_text, EditorKey, EditorState};
use zui::focus::{NavMode, Traversal, Zone};
use zui::layout::LayoutEngine;
use zui::style::TextStyle;
use zui::vnode::builder::{BoxNode, NodeBuilderMut, TextNode};

fn ascii_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,24}"
}

proptest! {
    /// A drawlist built from one `draw_text` command always decodes back to
    /// the same text at the same position, for any ASCII payload and any
    /// in-range viewport/position.
    #[test]
    fn drawlist_text_round_trips(
        width in 1u16..200,
        height in 1u16..200,
        x in 0u16..200,
        y in 0u16..200,
        text in ascii_text(),
    ) {
        let mut builder = DrawlistBuilder::new(1, width, height, DrawlistCaps::default());
        builder.draw_text(x, y, &text, &TextStyle::default());
        let bytes = builder.build().unwrap();

        let decoder = Decoder::new(&bytes).unwrap();
        let commands: Vec<_> = decoder.commands().collect::<Result<Vec<_>, _>>().unwrap();
        let found = commands.iter().any(|c| matches!(c, DrawCommand::DrawText { x: cx, y: cy, text: ct, .. } if *cx == x && *cy == y && *ct == text));
        prop_assert!(found);
    }

    /// Any balanced sequence of push_clip/pop_clip calls builds successfully.
    #[test]
    fn balanced_clip_nesting_always_builds(depth in 0usize..20) {
        let mut builder = DrawlistBuilder::new(1, 80, 24, DrawlistCaps::default());
        for i in 0..depth {
            builder.push_clip(0, 0, 10, 10 + i as u16 % 5);
        }
        for _ in 0..depth {
            builder.pop_clip();
        }
        prop_assert!(builder.build().is_ok());
    }

    /// Laying out a flat row of N text children never panics and always
    /// produces a rect for every child, for any reasonable viewport.
    #[test]
    fn layout_never_panics_on_a_flat_text_row(
        width in 1u16..120,
        height in 1u16..40,
        n in 0usize..12,
    ) {
        let children: Vec<_> = (0..n).map(|i| TextNode::new(format!("item-{i}")).build()).collect();
        let root = BoxNode::new().children(children).build();

        let mut tree = zui::instance::InstanceTree::new();
        let queue = zui::instance::hooks::UpdateQueueHandle::new();
        struct NoAppState;
        impl zui::instance::hooks::AppStateSource for NoAppState {
            fn snapshot(&self) -> std::rc::Rc<dyn std::any::Any> {
                std::rc::Rc::new(())
            }
        }
        zui::commit::Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).unwrap();
        let Some(root_handle) = tree.root() else { return Ok(()) };

        let mut engine = LayoutEngine::new();
        let layout = engine.compute(&tree, root_handle, width, height).unwrap();
        prop_assert!(layout.rect(root_handle).is_some());
        for &child in &tree.get(root_handle).unwrap().children {
            prop_assert!(layout.rect(child).is_some());
        }
    }

    /// Zone traversal never returns an id outside the zone's focusable set.
    #[test]
    fn zone_traversal_always_stays_within_the_focusable_set(
        n in 1usize..10,
        start in 0usize..10,
        steps in proptest::collection::vec(0u8..4, 0..20),
    ) {
        let ids: Vec<String> = (0..n).map(|i| format!("f{i}")).collect();
        let zone = Zone::new("z", NavMode::Linear).with_wrap(true).with_focusables(ids.clone());
        let mut current = ids.get(start % n).cloned();
        for step in steps {
            let traversal = match step {
                0 => Traversal::Next,
                1 => Traversal::Prev,
                2 => Traversal::Up,
                _ => Traversal::Down,
            };
            current = zone.navigate(current.as_deref(), traversal, None).or(current);
        }
        if let Some(id) = current {
            prop_assert!(ids.contains(&id));
        }
    }

    /// The input editor's cursor is always within `0..=value.len()` after
    /// any sequence of navigation/editing keys.
    #[test]
    fn editor_cursor_stays_in_bounds(
        initial in "[a-z]{0,20}",
        keys in proptest::collection::vec(0u8..6, 0..20),
    ) {
        let mut state = EditorState { value: initial, cursor: 0, selection: None };
        for k in keys {
            let key = match k {
                0 => EditorKey::ArrowLeft { shift: false },
                1 => EditorKey::ArrowRight { shift: true },
                2 => EditorKey::Home { shift: false },
                3 => EditorKey::End { shift: false },
                4 => EditorKey::Backspace,
                _ => EditorKey::Delete,
            };
            state = handle_key(&state, key);
            prop_assert!(state.cursor <= state.value.len());
            if let Some(sel) = state.selection {
                prop_assert!(sel.start <= sel.end);
                prop_assert!(sel.end <= state.value.len());
            }
        }
        state = insert_text(&state, "x");
        prop_assert!(state.cursor <= state.value.len());
    }
}
