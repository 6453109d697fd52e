//! Hook slots and the hook context handed to composite widgets (spec §3
//! "Hook slot", §4.5, §9 design notes).

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{ZuiError, ZuiResult};
use crate::instance::slab::SlabHandle;

/// A dependency list compared element-wise. Each element must be `'static +
/// PartialEq` so composites can pass tuples of primitives, `Rc<T>` clones,
/// etc. `None` (the `deps` parameter omitted) means "run every commit".
pub struct Deps(Vec<Box<dyn DepEq>>);

trait DepEq {
    fn eq_dyn(&self, other: &dyn Any) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T: PartialEq + 'static> DepEq for T {
    fn eq_dyn(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Deps {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn push(mut self, dep: impl PartialEq + 'static) -> Self {
        self.0.push(Box::new(dep));
        self
    }

    fn same_as(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a.eq_dyn(b.as_any()))
    }
}

impl Default for Deps {
    fn default() -> Self {
        Self::new()
    }
}

/// `(instance, slot-index, generation)` — the triple a `useState` setter
/// closes over. A setter invoked after its instance's generation has
/// advanced (unmount, re-key) silently drops instead of mutating.
#[derive(Clone)]
pub struct StateSetter<T> {
    target: SlabHandle,
    slot: usize,
    queue: UpdateQueueHandle,
    _marker: std::marker::PhantomData<fn() -> T>,
}

pub(crate) enum StateUpdate {
    Value(SlabHandle, usize, Box<dyn Any>),
    Updater(SlabHandle, usize, Box<dyn FnOnce(&dyn Any) -> Box<dyn Any>>),
}

/// Shared sink that `useState` setters push into; the scheduler drains it
/// between frames (spec §4.9 step 2).
#[derive(Clone, Default)]
pub struct UpdateQueueHandle(pub(crate) Rc<RefCell<VecDeque<StateUpdate>>>);

impl UpdateQueueHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn drain(&self) -> Vec<StateUpdate> {
        self.0.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl<T: Clone + 'static> StateSetter<T> {
    /// Queue a replacement value. A setter call made from a closure captured
    /// on a stale generation is a correct, silent no-op by construction: the
    /// drop happens when the update is applied (the generation is re-checked
    /// then, against the *current* tree, not here).
    pub fn set(&self, value: T) {
        self.queue.0.borrow_mut().push_back(StateUpdate::Value(self.target, self.slot, Box::new(value)));
    }

    /// Queue a functional update; multiple updaters queued within one window
    /// compose left-to-right (spec §5).
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.queue.0.borrow_mut().push_back(StateUpdate::Updater(
            self.target,
            self.slot,
            Box::new(move |prev: &dyn Any| {
                let prev = prev.downcast_ref::<T>().expect("state slot type mismatch");
                Box::new(f(prev)) as Box<dyn Any>
            }),
        ));
    }
}

pub(crate) struct StateSlot {
    pub value: Rc<dyn Any>,
}

pub(crate) struct RefSlot {
    /// Always a boxed `Rc<RefCell<T>>` for the slot's concrete `T`.
    pub value: Box<dyn Any>,
}

pub(crate) struct EffectSlot {
    pub deps: Option<Deps>,
    pub cleanup: Option<Box<dyn FnOnce()>>,
}

pub(crate) struct MemoSlot {
    pub deps: Deps,
    pub value: Rc<dyn Any>,
}

pub(crate) struct CallbackSlot {
    pub deps: Deps,
    pub value: Rc<dyn Any>,
}

pub(crate) struct AppStateSlot {
    pub last: Rc<dyn Any>,
}

/// One ordered hook slot (spec §3). Composites call hooks in exactly the
/// same order and count on every render of a given instance.
pub(crate) enum HookSlot {
    State(StateSlot),
    Ref(RefSlot),
    Effect(EffectSlot),
    Memo(MemoSlot),
    Callback(CallbackSlot),
    AppState(AppStateSlot),
}

impl HookSlot {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::State(_) => "state",
            Self::Ref(_) => "ref",
            Self::Effect(_) => "effect",
            Self::Memo(_) => "memo",
            Self::Callback(_) => "callback",
            Self::AppState(_) => "app_state",
        }
    }
}

/// A post-commit effect invocation scheduled during this render (spec §4.9
/// step 5: cleanups LIFO, then effects FIFO).
pub(crate) struct EffectTask {
    pub instance: SlabHandle,
    pub slot: usize,
    pub run: Box<dyn FnOnce() -> Option<Box<dyn FnOnce()>>>,
}

/// Source of the injected app-state snapshot `useAppState` selects from.
pub trait AppStateSource {
    fn snapshot(&self) -> Rc<dyn Any>;
}

/// The hook API surface handed to a composite's render function. Backed by
/// the instance's own hook-slot vector; a fresh `Hooks` is constructed per
/// render and the cursor is required to reach the end exactly once.
pub struct Hooks<'a> {
    instance: SlabHandle,
    slots: &'a mut Vec<HookSlot>,
    cursor: usize,
    first_render: bool,
    queue: UpdateQueueHandle,
    app_state: &'a dyn AppStateSource,
    effects: &'a mut Vec<EffectTask>,
    rerender_requested: &'a mut bool,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(
        instance: SlabHandle,
        slots: &'a mut Vec<HookSlot>,
        queue: UpdateQueueHandle,
        app_state: &'a dyn AppStateSource,
        effects: &'a mut Vec<EffectTask>,
        rerender_requested: &'a mut bool,
    ) -> Self {
        let first_render = slots.is_empty();
        Self { instance, slots, cursor: 0, first_render, queue, app_state, effects, rerender_requested }
    }

    fn next_index(&mut self) -> usize {
        let i = self.cursor;
        self.cursor += 1;
        i
    }

    /// Called after the composite's render function returns; validates the
    /// slot count matches the prior render (spec §4.5 "count mismatches are
    /// detected at end-render").
    pub(crate) fn end_render(self) -> ZuiResult<()> {
        if !self.first_render && self.cursor != self.slots.len() {
            #[cfg(feature = "tracing")]
            tracing::warn!(instance = ?self.instance, expected = self.slots.len(), got = self.cursor, "hook count mismatch");
            return Err(ZuiError::InvalidState(format!(
                "hook count changed: expected {}, got {}",
                self.slots.len(),
                self.cursor
            )));
        }
        Ok(())
    }

    fn check_kind(&self, index: usize, expected: &'static str) -> ZuiResult<()> {
        if let Some(existing) = self.slots.get(index) {
            let actual = existing.kind_name();
            if actual != expected {
                #[cfg(feature = "tracing")]
                tracing::warn!(instance = ?self.instance, index, expected, actual, "hook order mismatch");
                return Err(ZuiError::InvalidState(format!(
                    "hook order mismatch at index {index}: expected {expected}, found {actual}"
                )));
            }
        }
        Ok(())
    }

    /// `useState(initial)`. Returns `(value, setter)`; the setter drops
    /// silently if invoked after this instance's generation has advanced.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: impl FnOnce() -> T) -> ZuiResult<(T, StateSetter<T>)> {
        let index = self.next_index();
        self.check_kind(index, "state")?;
        if index == self.slots.len() {
            self.slots.push(HookSlot::State(StateSlot { value: Rc::new(initial()) }));
        }
        let HookSlot::State(slot) = &self.slots[index] else { unreachable!("kind checked above") };
        let value = slot
            .value
            .downcast_ref::<T>()
            .expect("state slot type changed between renders")
            .clone();
        let setter = StateSetter { target: self.instance, slot: index, queue: self.queue.clone(), _marker: std::marker::PhantomData };
        Ok((value, setter))
    }

    /// `useRef`: a stable mutable cell that survives across renders.
    pub fn use_ref<T: 'static>(&mut self, initial: impl FnOnce() -> T) -> ZuiResult<Rc<RefCell<T>>> {
        let index = self.next_index();
        self.check_kind(index, "ref")?;
        if index == self.slots.len() {
            let cell: Rc<RefCell<T>> = Rc::new(RefCell::new(initial()));
            self.slots.push(HookSlot::Ref(RefSlot { value: Box::new(cell) }));
        }
        let HookSlot::Ref(slot) = &self.slots[index] else { unreachable!("kind checked above") };
        Ok(slot
            .value
            .downcast_ref::<Rc<RefCell<T>>>()
            .expect("ref slot type changed between renders")
            .clone())
    }

    /// `useEffect(fn, deps)`. `deps = None` means "every commit". The
    /// returned closure, if any, is the cleanup; it runs before the next
    /// effect invocation and on unmount.
    pub fn use_effect(&mut self, deps: Option<Deps>, effect: impl FnOnce() -> Option<Box<dyn FnOnce()>> + 'static) -> ZuiResult<()> {
        let index = self.next_index();
        self.check_kind(index, "effect")?;
        let should_run = if index == self.slots.len() {
            self.slots.push(HookSlot::Effect(EffectSlot { deps, cleanup: None }));
            true
        } else {
            let HookSlot::Effect(slot) = &self.slots[index] else { unreachable!("kind checked above") };
            let changed = match (&slot.deps, &deps) {
                (None, _) | (_, None) => true,
                (Some(prev), Some(next)) => !prev.same_as(next),
            };
            if changed {
                let HookSlot::Effect(slot) = &mut self.slots[index] else { unreachable!() };
                slot.deps = deps;
            }
            changed
        };
        if should_run {
            self.effects.push(EffectTask { instance: self.instance, slot: index, run: Box::new(effect) });
        }
        Ok(())
    }

    /// `useMemo(compute, deps)`: recomputes only when `deps` change.
    pub fn use_memo<T: 'static>(&mut self, deps: Deps, compute: impl FnOnce() -> T) -> ZuiResult<Rc<T>> {
        let index = self.next_index();
        self.check_kind(index, "memo")?;
        let recompute = if index == self.slots.len() {
            true
        } else {
            let HookSlot::Memo(slot) = &self.slots[index] else { unreachable!("kind checked above") };
            !slot.deps.same_as(&deps)
        };
        if recompute {
            let value: Rc<dyn Any> = Rc::new(compute());
            if index == self.slots.len() {
                self.slots.push(HookSlot::Memo(MemoSlot { deps, value }));
            } else {
                self.slots[index] = HookSlot::Memo(MemoSlot { deps, value });
            }
        }
        let HookSlot::Memo(slot) = &self.slots[index] else { unreachable!() };
        Ok(slot.value.clone().downcast::<T>().expect("memo slot type changed between renders"))
    }

    /// `useCallback(fn, deps)`: returns the same boxed callback identity
    /// until `deps` change.
    pub fn use_callback<F: 'static>(&mut self, deps: Deps, make: impl FnOnce() -> F) -> ZuiResult<Rc<F>> {
        let index = self.next_index();
        self.check_kind(index, "callback")?;
        let recompute = if index == self.slots.len() {
            true
        } else {
            let HookSlot::Callback(slot) = &self.slots[index] else { unreachable!("kind checked above") };
            !slot.deps.same_as(&deps)
        };
        if recompute {
            let value: Rc<dyn Any> = Rc::new(make());
            if index == self.slots.len() {
                self.slots.push(HookSlot::Callback(CallbackSlot { deps, value }));
            } else {
                self.slots[index] = HookSlot::Callback(CallbackSlot { deps, value });
            }
        }
        let HookSlot::Callback(slot) = &self.slots[index] else { unreachable!() };
        Ok(slot.value.clone().downcast::<F>().expect("callback slot type changed between renders"))
    }

    /// `useAppState(selector)`. A rerender is scheduled iff the selector's
    /// returned value differs from last render by reference identity.
    pub fn use_app_state<T: 'static>(&mut self, selector: impl FnOnce(&dyn Any) -> Rc<T>) -> ZuiResult<Rc<T>> {
        let index = self.next_index();
        self.check_kind(index, "app_state")?;
        let snapshot = self.app_state.snapshot();
        let selected = selector(&*snapshot);
        let as_any: Rc<dyn Any> = selected.clone();
        if index == self.slots.len() {
            self.slots.push(HookSlot::AppState(AppStateSlot { last: as_any }));
        } else {
            let HookSlot::AppState(slot) = &mut self.slots[index] else { unreachable!("kind checked above") };
            let changed = !Rc::ptr_eq(&slot.last, &as_any);
            if changed {
                *self.rerender_requested = true;
                slot.last = as_any;
            }
        }
        Ok(selected)
    }
}
