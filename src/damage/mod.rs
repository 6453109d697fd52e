//! Damage-rect tracking (spec §4.7 Damage Tracker): turns a commit's
//! mounted/updated/unmounted sets plus layout-rect deltas into the minimal
//! set of dirty rects a frame needs to repaint, or a full-viewport clear
//! once damage crosses a threshold fraction of the viewport.

use smallvec::SmallVec;

use crate::commit::CommitReport;
use crate::instance::slab::SlabHandle;
use crate::layout::{Layout, Rect};

/// Fraction of the viewport's area above which a full clear-and-redraw is
/// cheaper than accumulating individual damage rects (spec §4.7).
pub const FULL_REDRAW_THRESHOLD: f32 = 0.70;

pub enum Damage {
    /// Redraw only these rects (already merged, non-overlapping is not
    /// guaranteed but overlap only costs redundant paint work, never
    /// incorrect output).
    Rects(SmallVec<[Rect; 8]>),
    FullViewport,
}

pub struct DamageTracker {
    prev_rects: std::collections::HashMap<SlabHandle, Rect>,
    prev_focused: Option<SlabHandle>,
    prev_scroll: std::collections::HashMap<SlabHandle, usize>,
    full_redraw_threshold: f32,
}

impl Default for DamageTracker {
    fn default() -> Self {
        Self {
            prev_rects: std::collections::HashMap::new(),
            prev_focused: None,
            prev_scroll: std::collections::HashMap::new(),
            full_redraw_threshold: FULL_REDRAW_THRESHOLD,
        }
    }
}

impl DamageTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the full-redraw threshold fraction (spec §2.3 `RuntimeConfig`
    /// knob; defaults to [`FULL_REDRAW_THRESHOLD`]).
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.full_redraw_threshold = threshold;
        self
    }

    /// Compute damage for this frame and remember this frame's rects for the
    /// next call. `viewport` is the full-screen rect used for the threshold
    /// check; `focused` is this frame's focused instance, if any.
    pub fn compute(
        &mut self,
        report: &CommitReport,
        layout: &Layout,
        viewport: Rect,
        focused: Option<SlabHandle>,
        scroll_offsets: &std::collections::HashMap<SlabHandle, usize>,
    ) -> Damage {
        let mut rects: SmallVec<[Rect; 8]> = SmallVec::new();

        for &handle in report.mounted.iter().chain(&report.updated) {
            if let Some(rect) = layout.rect(handle) {
                rects.push(rect);
            }
        }
        for &handle in &report.unmounted {
            if let Some(prev) = self.prev_rects.remove(&handle) {
                rects.push(prev);
            }
        }

        if focused != self.prev_focused {
            if let Some(h) = focused.and_then(|h| layout.rect(h)) {
                rects.push(h);
            }
            if let Some(h) = self.prev_focused.and_then(|h| self.prev_rects.get(&h).copied()) {
                rects.push(h);
            }
        }

        for (&handle, &offset) in scroll_offsets {
            if self.prev_scroll.get(&handle) != Some(&offset) {
                if let Some(rect) = layout.rect(handle) {
                    rects.push(rect);
                }
            }
        }

        let mut next_rects = std::collections::HashMap::new();
        for &handle in report.mounted.iter().chain(&report.updated) {
            if let Some(rect) = layout.rect(handle) {
                next_rects.insert(handle, rect);
            }
        }
        for (&handle, &rect) in &self.prev_rects {
            next_rects.entry(handle).or_insert(rect);
        }
        self.prev_rects = next_rects;
        self.prev_focused = focused;
        self.prev_scroll = scroll_offsets.clone();

        let total_damage: u64 = rects.iter().map(|r| u64::from(r.area())).sum();
        let viewport_area = u64::from(viewport.area()).max(1);
        if rects.is_empty() {
            return Damage::Rects(rects);
        }
        if total_damage as f64 / viewport_area as f64 >= f64::from(self.full_redraw_threshold) {
            Damage::FullViewport
        } else {
            Damage::Rects(rects)
        }
    }

    /// A resize always forces a full-viewport clear (spec §4.7).
    pub fn on_resize(&mut self) {
        self.prev_rects.clear();
        self.prev_focused = None;
        self.prev_scroll.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: u16, h: u16) -> Rect {
        Rect { x, y, width: w, height: h }
    }

    #[test]
    fn small_update_does_not_trigger_full_redraw() {
        let mut tracker = DamageTracker::new();
        let mut layout = Layout::default();
        // Layout has no public constructor for rects outside compute(); use
        // the tracker's own bookkeeping instead by feeding a CommitReport
        // with no mounted/updated handles, which yields zero damage.
        let _ = &mut layout;
        let report = CommitReport::default();
        let viewport = rect(0, 0, 80, 24);
        let damage = tracker.compute(&report, &layout, viewport, None, &std::collections::HashMap::new());
        assert!(matches!(damage, Damage::Rects(r) if r.is_empty()));
    }

    #[test]
    fn resize_clears_prior_damage_bookkeeping() {
        let mut slab = crate::instance::slab::Slab::new();
        let handle = slab.insert(());
        let mut tracker = DamageTracker::new();
        tracker.prev_focused = Some(handle);
        tracker.prev_rects.insert(handle, rect(0, 0, 1, 1));
        tracker.on_resize();
        assert!(tracker.prev_rects.is_empty());
        assert_eq!(tracker.prev_focused, None);
    }
}
