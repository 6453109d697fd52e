#![no_main]

use std::any::Any;
use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use zui::commit::Reconciler;
use zui::instance::hooks::{AppStateSource, UpdateQueueHandle};
use zui::instance::InstanceTree;
use zui::layout::LayoutEngine;
use zui::vnode::builder::{BoxNode, NodeBuilderMut, TextNode};

struct NoAppState;
impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Rc<dyn Any> {
        Rc::new(())
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let width = u16::from_le_bytes([data[0], data[1]]).max(1);
    let height = u16::from_le_bytes([data[2], data[3]]).max(1);

    let children: Vec<_> = data[4..]
        .chunks(8)
        .take(64)
        .map(|chunk| TextNode::new(String::from_utf8_lossy(chunk).into_owned()).build())
        .collect();
    let root = BoxNode::new().children(children).build();

    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    if Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState).is_err() {
        return;
    }
    let Some(root_handle) = tree.root() else { return };

    let mut engine = LayoutEngine::new();
    let _ = engine.compute(&tree, root_handle, width, height);
});
