//! The runtime-side mirror of the committed vnode tree (spec §3 "Instance",
//! §4.5 Commit/Reconciler, §9 design notes). Where a [`crate::vnode::VNode`]
//! is an immutable per-render description, an [`Instance`] is the
//! long-lived object that survives across renders: it owns hook slots,
//! measured layout, and a non-owning link to its parent.

pub mod hooks;
pub mod slab;

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::instance::hooks::HookSlot;
use crate::instance::slab::{Slab, SlabHandle};
use crate::vnode::{Appearance, Key, LayoutAttrs, Payload, WidgetKind};

/// A monotonic, process-unique instance identifier (spec §3). Unlike
/// [`SlabHandle`], this is stable for the instance's entire lifetime and
/// never reused, so it is safe to hand out to host code (e.g.
/// [`crate::error::FatalEvent`]) that may outlive the slab slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

#[derive(Default)]
pub(crate) struct InstanceIdAllocator {
    next: u64,
}

impl InstanceIdAllocator {
    pub(crate) fn alloc(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }
}

/// Identity used for reconciliation (spec §4.5): a child is matched to a
/// prior-render instance by `(kind, key-or-positional-index)` among its
/// siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SiblingIdentity {
    Keyed(Key),
    Positional(usize),
}

/// One node of the runtime instance tree.
pub struct Instance {
    pub id: InstanceId,
    /// Non-owning handle to the parent's slot; `None` for the root. Using a
    /// handle instead of `Rc`/`Weak` means teardown is a plain slab removal,
    /// never a cycle (spec §9).
    pub parent: Option<SlabHandle>,
    pub kind: WidgetKind,
    pub identity: SiblingIdentity,
    /// The vnode's layout/appearance/payload from the most recent commit —
    /// [`crate::layout`] and [`crate::render`] read these directly rather
    /// than re-walking a vnode tree that no longer exists between frames.
    pub layout: LayoutAttrs,
    pub appearance: Appearance,
    pub payload: Payload,
    /// Ordered handles of this instance's children, reflecting the last
    /// commit.
    pub children: SmallVec<[SlabHandle; 4]>,
    /// Hook slots, populated in call order for composite widgets; empty for
    /// primitive (non-composite) widget kinds.
    pub(crate) hook_slots: Vec<HookSlot>,
    /// Per-widget mutable state bag for primitive widgets that are stateful
    /// without going through the hook API (e.g. scroll offset, dropdown
    /// open/closed, input cursor) — spec §4.4/§4.8 widget-local state.
    pub local_state: HashMap<&'static str, Box<dyn std::any::Any>>,
    /// Bumped whenever this slot is torn down and a *new* instance is
    /// mounted at the same `(parent, identity)` — i.e. a re-key, not a
    /// simple update. Hook setters compare against this, not against the
    /// slab generation, so a setter from the instance's own previous
    /// hook-count-mismatch recovery still drops correctly.
    pub generation: u32,
}

impl Instance {
    fn new(id: InstanceId, parent: Option<SlabHandle>, kind: WidgetKind, identity: SiblingIdentity) -> Self {
        Self {
            id,
            parent,
            kind,
            identity,
            layout: LayoutAttrs::default(),
            appearance: Appearance::default(),
            payload: Payload::None,
            children: SmallVec::new(),
            hook_slots: Vec::new(),
            local_state: HashMap::new(),
            generation: 0,
        }
    }
}

/// Owns every live [`Instance`] and the root handle. This is the "runtime
/// instance tree" side of C5; [`crate::commit::Reconciler`] is the
/// algorithm that keeps it in sync with freshly rendered vnode trees.
#[derive(Default)]
pub struct InstanceTree {
    slab: Slab<Instance>,
    ids: InstanceIdAllocator,
    root: Option<SlabHandle>,
}

impl InstanceTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root(&self) -> Option<SlabHandle> {
        self.root
    }

    #[must_use]
    pub fn get(&self, handle: SlabHandle) -> Option<&Instance> {
        self.slab.get(handle)
    }

    pub fn get_mut(&mut self, handle: SlabHandle) -> Option<&mut Instance> {
        self.slab.get_mut(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }

    /// Mount a brand new instance under `parent` (or as the root if `parent`
    /// is `None` and the tree is empty).
    pub(crate) fn mount(
        &mut self,
        parent: Option<SlabHandle>,
        kind: WidgetKind,
        identity: SiblingIdentity,
    ) -> SlabHandle {
        let id = self.ids.alloc();
        let instance = Instance::new(id, parent, kind, identity);
        let handle = self.slab.insert(instance);
        if let Some(parent_handle) = parent {
            if let Some(parent_instance) = self.slab.get_mut(parent_handle) {
                parent_instance.children.push(handle);
            }
        } else if self.root.is_none() {
            self.root = Some(handle);
        }
        handle
    }

    /// Mount without touching any parent's child list — the caller (the
    /// reconciler) assigns the full, correctly ordered child list itself via
    /// [`Self::set_children`] once every child has been mounted or reused.
    pub(crate) fn mount_detached(&mut self, parent: Option<SlabHandle>, kind: WidgetKind, identity: SiblingIdentity) -> SlabHandle {
        let id = self.ids.alloc();
        self.slab.insert(Instance::new(id, parent, kind, identity))
    }

    /// Replace `handle`'s ordered child list wholesale (spec §4.5: a commit
    /// produces the full next child order, not a sequence of moves).
    pub(crate) fn set_children(&mut self, handle: SlabHandle, children: SmallVec<[SlabHandle; 4]>) {
        if let Some(instance) = self.slab.get_mut(handle) {
            instance.children = children;
        }
    }

    pub(crate) fn set_root(&mut self, handle: Option<SlabHandle>) {
        self.root = handle;
    }

    /// Tear down an instance and its entire subtree, LIFO (children before
    /// parent, deepest-first within a level is not required by the spec —
    /// only that a child's cleanups run before its parent's, spec §4.9
    /// step 5).
    pub(crate) fn unmount_subtree(&mut self, handle: SlabHandle) -> Vec<Instance> {
        let mut removed = Vec::new();
        self.unmount_subtree_into(handle, &mut removed);
        removed
    }

    fn unmount_subtree_into(&mut self, handle: SlabHandle, removed: &mut Vec<Instance>) {
        let children = self.slab.get(handle).map(|i| i.children.clone()).unwrap_or_default();
        for child in children {
            self.unmount_subtree_into(child, removed);
        }
        if let Some(instance) = self.slab.remove(handle) {
            if self.root == Some(handle) {
                self.root = None;
            }
            removed.push(instance);
        }
    }

    /// Detach `handle` from its parent's child list without tearing it down
    /// (used when the reconciler moves an instance during a keyed reorder).
    pub(crate) fn detach(&mut self, handle: SlabHandle) {
        let parent = self.slab.get(handle).and_then(|i| i.parent);
        if let Some(parent_handle) = parent {
            if let Some(parent_instance) = self.slab.get_mut(parent_handle) {
                parent_instance.children.retain(|&c| c != handle);
            }
        }
    }

    pub(crate) fn reattach(&mut self, handle: SlabHandle, new_parent: Option<SlabHandle>, at: usize) {
        if let Some(instance) = self.slab.get_mut(handle) {
            instance.parent = new_parent;
        }
        if let Some(parent_handle) = new_parent {
            if let Some(parent_instance) = self.slab.get_mut(parent_handle) {
                let at = at.min(parent_instance.children.len());
                parent_instance.children.insert(at, handle);
            }
        }
    }
}
