//! The reconciler: diffs a freshly rendered [`VNode`] tree against the
//! previous [`InstanceTree`], mounting/updating/unmounting instances and
//! invoking composites through the hook API (spec §4.5 Commit/Reconciler).

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;
use smartstring::alias::String as SmartString;

use crate::error::{ZuiError, ZuiResult};
use crate::instance::hooks::{AppStateSource, EffectTask, HookSlot, Hooks, StateUpdate, UpdateQueueHandle};
use crate::instance::slab::SlabHandle;
use crate::instance::{InstanceTree, SiblingIdentity};
use crate::vnode::{Key, Payload, VNode, WidgetKind};

/// What changed during one [`Reconciler::commit`] call. The runtime
/// consumes `effects` post-commit (spec §4.9 step 5); `mounted`/`updated`/
/// `unmounted` feed the damage tracker and tracing spans.
#[derive(Default)]
pub struct CommitReport {
    pub mounted: Vec<SlabHandle>,
    pub updated: Vec<SlabHandle>,
    pub unmounted: Vec<SlabHandle>,
    pub(crate) effects: Vec<EffectTask>,
}

pub struct Reconciler;

impl Reconciler {
    /// Reconcile `new_root` against whatever is currently mounted in `tree`.
    /// A `None` `new_root` unmounts everything (the host tore down the UI).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn commit(
        tree: &mut InstanceTree,
        new_root: Option<VNode>,
        queue: &UpdateQueueHandle,
        app_state: &dyn AppStateSource,
    ) -> ZuiResult<CommitReport> {
        let mut report = CommitReport::default();
        let mut seen_ids: HashSet<SmartString> = HashSet::new();
        let prev_root = tree.root();
        let new_handle = match new_root {
            Some(vnode) => Some(Self::reconcile_node(tree, None, prev_root, vnode, queue, app_state, &mut report, &mut seen_ids)?),
            None => {
                if let Some(old) = prev_root {
                    Self::unmount_and_record(tree, old, &mut report);
                }
                None
            }
        };
        tree.set_root(new_handle);
        #[cfg(feature = "tracing")]
        tracing::debug!(mounted = report.mounted.len(), updated = report.updated.len(), unmounted = report.unmounted.len(), "commit finished");
        Ok(report)
    }

    /// Apply queued `useState` setter calls before the next commit (spec
    /// §4.9 step 2). A setter whose target instance no longer exists (its
    /// generation advanced via unmount/re-key) is silently dropped — the
    /// slab slot is simply gone by the time this runs.
    ///
    /// Multiple updates to the same slot within one window naturally
    /// collapse to the net effect of applying them in order (a later
    /// `Value` replaces an earlier one outright; an `Updater` composes onto
    /// whatever value is current when it runs), matching spec §5's "last
    /// one wins, functional updaters compose left-to-right".
    pub fn apply_updates(tree: &mut InstanceTree, updates: Vec<StateUpdate>) {
        for update in updates {
            let (target, slot_index) = match &update {
                StateUpdate::Value(target, slot, _) | StateUpdate::Updater(target, slot, _) => (*target, *slot),
            };
            let Some(instance) = tree.get_mut(target) else { continue };
            let Some(HookSlot::State(slot)) = instance.hook_slots.get_mut(slot_index) else { continue };
            match update {
                StateUpdate::Value(_, _, new_value) => {
                    slot.value = std::rc::Rc::from(new_value);
                }
                StateUpdate::Updater(_, _, f) => {
                    slot.value = f(&*slot.value).into();
                }
            }
        }
    }

    fn unmount_and_record(tree: &mut InstanceTree, handle: SlabHandle, report: &mut CommitReport) {
        let removed = tree.unmount_subtree(handle);
        for mut instance in removed {
            // Cleanups run child-before-parent because `unmount_subtree`
            // already visited children first (spec §4.9 step 5).
            for slot in instance.hook_slots.drain(..) {
                run_cleanup(slot);
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(?handle, "instance unmounted");
            report.unmounted.push(handle);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn reconcile_node(
        tree: &mut InstanceTree,
        parent: Option<SlabHandle>,
        prev: Option<SlabHandle>,
        mut new_vnode: VNode,
        queue: &UpdateQueueHandle,
        app_state: &dyn AppStateSource,
        report: &mut CommitReport,
        seen_ids: &mut HashSet<SmartString>,
    ) -> ZuiResult<SlabHandle> {
        if let Some(id) = &new_vnode.id {
            if !seen_ids.insert(id.clone()) {
                return Err(ZuiError::DuplicateId { id: id.to_string() });
            }
        }

        let identity = match &new_vnode.key {
            Some(k) => SiblingIdentity::Keyed(k.clone()),
            None => SiblingIdentity::Positional(0),
        };

        let reusable = prev.filter(|&h| tree.get(h).is_some_and(|inst| inst.kind == new_vnode.kind));
        let was_reused = reusable.is_some();

        let handle = if let Some(h) = reusable {
            h
        } else {
            if let Some(old) = prev {
                Self::unmount_and_record(tree, old, report);
            }
            let h = tree.mount_detached(parent, new_vnode.kind, identity);
            #[cfg(feature = "tracing")]
            tracing::trace!(handle = ?h, kind = ?new_vnode.kind, "instance mounted");
            report.mounted.push(h);
            h
        };

        let prev_layout = was_reused.then(|| tree.get(handle).map(|i| i.layout.clone())).flatten();
        let prev_appearance = was_reused.then(|| tree.get(handle).map(|i| i.appearance.clone())).flatten();

        if let Some(instance) = tree.get_mut(handle) {
            instance.layout = new_vnode.layout.clone();
            instance.appearance = new_vnode.appearance.clone();
        }

        let is_composite = matches!(new_vnode.payload, Payload::Composite { .. });
        let mut payload_changed = false;
        let children = if is_composite {
            let Payload::Composite { render, .. } = new_vnode.payload else { unreachable!() };
            let instance = tree.get_mut(handle).expect("just mounted or reused");
            let mut rerender_requested = false;
            let mut local_effects = Vec::new();
            let mut hooks = Hooks::new(handle, &mut instance.hook_slots, queue.clone(), app_state, &mut local_effects, &mut rerender_requested);
            let rendered = (*render)(&mut hooks)?;
            hooks.end_render()?;
            report.effects.append(&mut local_effects);
            vec![rendered]
        } else {
            if let Some(instance) = tree.get_mut(handle) {
                payload_changed = instance.payload != new_vnode.payload;
                instance.payload = new_vnode.payload.clone();
            }
            std::mem::take(&mut new_vnode.children)
        };

        // Damage tracking only cares about nodes whose props actually
        // changed (spec §4.7) — remounted nodes already went to `mounted`.
        if was_reused {
            let layout_changed = prev_layout.as_ref() != Some(&new_vnode.layout);
            let appearance_changed = prev_appearance.as_ref() != Some(&new_vnode.appearance);
            if layout_changed || appearance_changed || payload_changed {
                report.updated.push(handle);
            }
        }

        let prev_children: SmallVec<[SlabHandle; 4]> = tree.get(handle).map(|i| i.children.clone()).unwrap_or_default();
        let next_children = Self::reconcile_children(tree, handle, &prev_children, children, queue, app_state, report, seen_ids)?;
        tree.set_children(handle, next_children);

        Ok(handle)
    }

    #[allow(clippy::too_many_arguments)]
    fn reconcile_children(
        tree: &mut InstanceTree,
        parent: SlabHandle,
        prev_children: &[SlabHandle],
        new_children: Vec<VNode>,
        queue: &UpdateQueueHandle,
        app_state: &dyn AppStateSource,
        report: &mut CommitReport,
        seen_ids: &mut HashSet<SmartString>,
    ) -> ZuiResult<SmallVec<[SlabHandle; 4]>> {
        let mut keyed: HashMap<(WidgetKind, Key), SlabHandle> = HashMap::new();
        let mut unkeyed: HashMap<WidgetKind, std::collections::VecDeque<SlabHandle>> = HashMap::new();
        let mut seen_keys: std::collections::HashSet<Key> = std::collections::HashSet::new();

        for &handle in prev_children {
            let Some(instance) = tree.get(handle) else { continue };
            match &instance.identity {
                SiblingIdentity::Keyed(key) => {
                    keyed.insert((instance.kind, key.clone()), handle);
                }
                SiblingIdentity::Positional(_) => {
                    unkeyed.entry(instance.kind).or_default().push_back(handle);
                }
            }
        }

        let mut next = SmallVec::with_capacity(new_children.len());
        let mut used: std::collections::HashSet<SlabHandle> = std::collections::HashSet::new();

        for child_vnode in new_children {
            if let Some(key) = &child_vnode.key {
                if !seen_keys.insert(key.clone()) {
                    return Err(ZuiError::DuplicateKey { key: format!("{key:?}") });
                }
            }
            let prev_match = match &child_vnode.key {
                Some(key) => keyed.get(&(child_vnode.kind, key.clone())).copied(),
                None => unkeyed.get_mut(&child_vnode.kind).and_then(std::collections::VecDeque::pop_front),
            };
            let handle = Self::reconcile_node(tree, Some(parent), prev_match, child_vnode, queue, app_state, report, seen_ids)?;
            used.insert(handle);
            next.push(handle);
        }

        for &handle in prev_children {
            if !used.contains(&handle) {
                Self::unmount_and_record(tree, handle, report);
            }
        }

        Ok(next)
    }
}

fn run_cleanup(slot: crate::instance::hooks::HookSlot) {
    if let crate::instance::hooks::HookSlot::Effect(effect) = slot {
        if let Some(cleanup) = effect.cleanup {
            cleanup();
        }
    }
}
