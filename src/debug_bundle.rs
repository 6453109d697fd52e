//! Debug bundle export (spec §6 "Debug bundle export"): a stable,
//! versioned JSON document covering a bounded window of recent frame
//! summaries and debug log records, with deterministic key ordering so two
//! bundles from similar runs diff cleanly.
//!
//! The capture buffer is a process-wide singleton behind an explicit
//! `create`/`destroy` pair (spec §5 design note: "a process-wide debug
//! controller is allowed as optional, with an explicit create/destroy
//! pair") rather than a `lazy_static`-style always-on global: most runs
//! never pay for it.

use std::collections::{BTreeMap, VecDeque};
use std::sync::OnceLock;

use parking_lot::Mutex;
use serde::Serialize;

use crate::damage::Damage;
use crate::error::ZuiError;

pub const DEBUG_BUNDLE_VERSION: u32 = 1;

/// How many frame summaries / log records the ring buffer retains before
/// evicting the oldest entry (spec §6 "a bounded query window").
const DEFAULT_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, Serialize, Default)]
pub struct CaptureFlags {
    pub capture_frames: bool,
    pub capture_logs: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameSummary {
    pub frame_id: u64,
    pub cmd_count: u32,
    pub byte_len: usize,
    pub full_redraw: bool,
}

impl FrameSummary {
    #[must_use]
    pub fn new(frame_id: u64, cmd_count: u32, byte_len: usize, damage: &Damage) -> Self {
        Self { frame_id, cmd_count, byte_len, full_redraw: matches!(damage, Damage::FullViewport) }
    }
}

/// One debug log entry. `headers` is a `BTreeMap` rather than a `HashMap` so
/// every record serializes with its keys in the same order run to run
/// (spec §6 "fields are ordered deterministically by key").
#[derive(Debug, Clone, Serialize)]
pub struct DebugRecord {
    pub frame_id: u64,
    pub headers: BTreeMap<String, String>,
    pub payload_hex: Option<String>,
}

impl DebugRecord {
    #[must_use]
    pub fn new(frame_id: u64) -> Self {
        Self { frame_id, headers: BTreeMap::new(), payload_hex: None }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        use base64::Engine;
        self.payload_hex = Some(base64::engine::general_purpose::STANDARD.encode(payload));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugBundle {
    pub version: u32,
    pub capture_flags: CaptureFlags,
    pub frames: Vec<FrameSummary>,
    pub records: Vec<DebugRecord>,
}

struct ControllerInner {
    capacity: usize,
    flags: CaptureFlags,
    frames: VecDeque<FrameSummary>,
    records: VecDeque<DebugRecord>,
}

impl ControllerInner {
    fn new(capacity: usize, flags: CaptureFlags) -> Self {
        Self { capacity, flags, frames: VecDeque::new(), records: VecDeque::new() }
    }

    fn push_frame(&mut self, summary: FrameSummary) {
        if !self.flags.capture_frames {
            return;
        }
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(summary);
    }

    fn push_record(&mut self, record: DebugRecord) {
        if !self.flags.capture_logs {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    fn export(&self) -> DebugBundle {
        DebugBundle {
            version: DEBUG_BUNDLE_VERSION,
            capture_flags: self.flags,
            frames: self.frames.iter().cloned().collect(),
            records: self.records.iter().cloned().collect(),
        }
    }
}

static CONTROLLER: OnceLock<Mutex<Option<ControllerInner>>> = OnceLock::new();

fn slot() -> &'static Mutex<Option<ControllerInner>> {
    CONTROLLER.get_or_init(|| Mutex::new(None))
}

/// Handle to the process-wide debug controller. Dropping it does not tear
/// the controller down — only [`DebugController::destroy`] does, matching
/// the explicit lifecycle the design note calls for.
pub struct DebugController;

impl DebugController {
    /// Install the controller with the given capture flags and ring-buffer
    /// capacity. Returns [`ZuiError::InvalidState`] if one is already
    /// active — callers must `destroy` first.
    pub fn create(flags: CaptureFlags) -> Result<Self, ZuiError> {
        Self::create_with_capacity(flags, DEFAULT_CAPACITY)
    }

    pub fn create_with_capacity(flags: CaptureFlags, capacity: usize) -> Result<Self, ZuiError> {
        let mut guard = slot().lock();
        if guard.is_some() {
            return Err(ZuiError::InvalidState("debug controller already created".to_string()));
        }
        *guard = Some(ControllerInner::new(capacity.max(1), flags));
        Ok(Self)
    }

    /// Tear down the controller, discarding whatever it had captured.
    pub fn destroy() {
        *slot().lock() = None;
    }

    #[must_use]
    pub fn is_active() -> bool {
        slot().lock().is_some()
    }

    /// No-op if no controller is active.
    pub fn record_frame(summary: FrameSummary) {
        if let Some(inner) = slot().lock().as_mut() {
            inner.push_frame(summary);
        }
    }

    /// No-op if no controller is active.
    pub fn record_log(record: DebugRecord) {
        if let Some(inner) = slot().lock().as_mut() {
            inner.push_record(record);
        }
    }

    /// `None` if no controller is active.
    #[must_use]
    pub fn export() -> Option<DebugBundle> {
        slot().lock().as_ref().map(ControllerInner::export)
    }

    /// `export()` rendered as a stable-key-order JSON string.
    pub fn export_json() -> Result<Option<String>, ZuiError> {
        Self::export().map(|bundle| serde_json::to_string_pretty(&bundle).map_err(|e| ZuiError::Platform(e.to_string()))).transpose()
    }
}
