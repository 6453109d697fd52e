//! Focus zones, modal traps, layer stack and widget-specific input routing
//! (spec §3 "Focus state"/"Layer stack", §4.8 Focus & Router).

pub mod dropdown;
pub mod input_editor;
pub mod layer;
pub mod table;
pub mod trap;

pub use layer::LayerStack;
pub use trap::TrapStack;

use indexmap::IndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavMode {
    #[default]
    Linear,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    Next,
    Prev,
    Up,
    Down,
    Left,
    Right,
}

/// A labeled subset of focusables with a navigation model (spec §4.8 "Focus
/// zones").
#[derive(Debug, Clone)]
pub struct Zone {
    pub id: String,
    pub mode: NavMode,
    pub columns: usize,
    pub wrap: bool,
    pub focusables: IndexSet<String>,
}

impl Zone {
    #[must_use]
    pub fn new(id: impl Into<String>, mode: NavMode) -> Self {
        Self { id: id.into(), mode, columns: 1, wrap: false, focusables: IndexSet::new() }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    #[must_use]
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    #[must_use]
    pub fn with_focusables(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.focusables = ids.into_iter().collect();
        self
    }

    /// Resolve a traversal request from `current` (or the first focusable if
    /// `current` is `None` or not in this zone), restricted to `allowed` if
    /// given (an active trap's focusable set).
    #[must_use]
    pub fn navigate(&self, current: Option<&str>, traversal: Traversal, allowed: Option<&IndexSet<String>>) -> Option<String> {
        let ids: Vec<&String> = self.focusables.iter().filter(|id| allowed.map_or(true, |a| a.contains(id.as_str()))).collect();
        if ids.is_empty() {
            return None;
        }
        let current_idx = current.and_then(|c| ids.iter().position(|id| id.as_str() == c));
        let idx = match current_idx {
            None => 0,
            Some(i) => match (self.mode, traversal) {
                (_, Traversal::Next) => step(i, 1, ids.len(), self.wrap),
                (_, Traversal::Prev) => step(i, -1, ids.len(), self.wrap),
                (NavMode::Linear, Traversal::Down | Traversal::Right) => step(i, 1, ids.len(), self.wrap),
                (NavMode::Linear, Traversal::Up | Traversal::Left) => step(i, -1, ids.len(), self.wrap),
                (NavMode::Grid, Traversal::Right) => step(i, 1, ids.len(), self.wrap),
                (NavMode::Grid, Traversal::Left) => step(i, -1, ids.len(), self.wrap),
                (NavMode::Grid, Traversal::Down) => step(i, self.columns as isize, ids.len(), self.wrap),
                (NavMode::Grid, Traversal::Up) => step(i, -(self.columns as isize), ids.len(), self.wrap),
            }?,
        };
        ids.get(idx).map(|s| (*s).clone())
    }
}

fn step(i: usize, delta: isize, len: usize, wrap: bool) -> Option<usize> {
    let next = i as isize + delta;
    if next >= 0 && (next as usize) < len {
        return Some(next as usize);
    }
    if !wrap {
        return Some(i.min(len - 1));
    }
    Some(next.rem_euclid(len as isize) as usize)
}

/// The full focus model for one screen (spec §3 "Focus state").
#[derive(Debug, Default)]
pub struct FocusState {
    pub focused_id: Option<String>,
    pub active_zone_id: Option<String>,
    pub last_focused_by_zone: std::collections::HashMap<String, String>,
    zones: Vec<Zone>,
    pub traps: TrapStack,
}

impl FocusState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_zones(&mut self, zones: Vec<Zone>) {
        self.zones = zones;
    }

    #[must_use]
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Resolve a traversal request in the active zone, honoring the
    /// top trap's focusable restriction if one is active (spec §4.8
    /// "resolved in the active zone unless the active trap restricts it").
    pub fn traverse(&mut self, traversal: Traversal) {
        let Some(zone_id) = self.active_zone_id.clone() else { return };
        let Some(zone) = self.zone(&zone_id) else { return };
        let allowed = self.traps.top().map(|t| &t.focusable_ids);
        if let Some(next) = zone.navigate(self.focused_id.as_deref(), traversal, allowed) {
            self.last_focused_by_zone.insert(zone_id, next.clone());
            self.focused_id = Some(next);
        }
    }

    /// The focus invariant (spec §3): `focused_id` is `None` or present in
    /// `enabled`, and within the top trap's set if a trap is active.
    #[must_use]
    pub fn is_valid(&self, enabled: &IndexSet<String>) -> bool {
        let Some(id) = &self.focused_id else { return true };
        if !enabled.contains(id.as_str()) {
            return false;
        }
        self.traps.top().map_or(true, |t| t.focusable_ids.contains(id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(wrap: bool) -> Zone {
        Zone::new("main", NavMode::Linear)
            .with_wrap(wrap)
            .with_focusables(["a".into(), "b".into(), "c".into()])
    }

    #[test]
    fn next_advances_without_wrap_and_clamps_at_the_end() {
        let z = zone(false);
        assert_eq!(z.navigate(Some("a"), Traversal::Next, None).as_deref(), Some("b"));
        assert_eq!(z.navigate(Some("c"), Traversal::Next, None).as_deref(), Some("c"));
    }

    #[test]
    fn wrap_around_cycles_to_the_first() {
        let z = zone(true);
        assert_eq!(z.navigate(Some("c"), Traversal::Next, None).as_deref(), Some("a"));
    }

    #[test]
    fn grid_down_advances_by_column_count() {
        let z = Zone::new("grid", NavMode::Grid).with_columns(2).with_focusables(["a".into(), "b".into(), "c".into(), "d".into()]);
        assert_eq!(z.navigate(Some("a"), Traversal::Down, None).as_deref(), Some("c"));
    }

    #[test]
    fn trap_restricts_navigation_to_its_focusable_set() {
        let z = zone(false);
        let mut allowed = IndexSet::new();
        allowed.insert("a".to_string());
        allowed.insert("b".to_string());
        assert_eq!(z.navigate(Some("b"), Traversal::Next, Some(&allowed)).as_deref(), Some("a"));
    }

    #[test]
    fn focus_invariant_rejects_a_disabled_or_out_of_trap_id() {
        let mut state = FocusState::new();
        state.focused_id = Some("x".to_string());
        let mut enabled = IndexSet::new();
        enabled.insert("a".to_string());
        assert!(!state.is_valid(&enabled));
    }
}
