#![no_main]

use std::any::Any;
use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use zui::commit::Reconciler;
use zui::components::markdown;
use zui::instance::hooks::{AppStateSource, UpdateQueueHandle};
use zui::instance::InstanceTree;

struct NoAppState;
impl AppStateSource for NoAppState {
    fn snapshot(&self) -> Rc<dyn Any> {
        Rc::new(())
    }
}

fuzz_target!(|data: &str| {
    let mut tree = InstanceTree::new();
    let queue = UpdateQueueHandle::new();
    let root = markdown(data, None);
    let _ = Reconciler::commit(&mut tree, Some(root), &queue, &NoAppState);
});
