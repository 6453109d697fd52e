//! Modal focus traps (spec §4.8 "Modal traps").

use indexmap::IndexSet;

#[derive(Debug, Clone)]
pub struct Trap {
    pub id: String,
    pub active: bool,
    pub initial_focus: Option<String>,
    pub return_focus_to: Option<String>,
    pub focusable_ids: IndexSet<String>,
}

impl Trap {
    #[must_use]
    pub fn new(id: impl Into<String>, focusable_ids: impl IntoIterator<Item = String>) -> Self {
        Self { id: id.into(), active: false, initial_focus: None, return_focus_to: None, focusable_ids: focusable_ids.into_iter().collect() }
    }

    #[must_use]
    pub fn with_initial_focus(mut self, id: impl Into<String>) -> Self {
        self.initial_focus = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_return_focus_to(mut self, id: impl Into<String>) -> Self {
        self.return_focus_to = Some(id.into());
        self
    }
}

/// Ordered sequence of traps, top = innermost (spec §3 "trap-stack").
#[derive(Debug, Default)]
pub struct TrapStack {
    stack: Vec<Trap>,
}

impl TrapStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn top(&self) -> Option<&Trap> {
        self.stack.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Activate `trap` as the new top of the stack. Returns the id focus
    /// should move to: `initial_focus` if focusable, else the first
    /// focusable in the set, else `None` (keep current, spec §4.8).
    pub fn activate(&mut self, mut trap: Trap) -> Option<String> {
        trap.active = true;
        let target = trap
            .initial_focus
            .clone()
            .filter(|id| trap.focusable_ids.contains(id.as_str()))
            .or_else(|| trap.focusable_ids.iter().next().cloned());
        self.stack.push(trap);
        target
    }

    /// Deactivate the trap with `id`. If it was the top, returns its
    /// `return_focus_to` for the caller to restore (spec §4.8 "if the top
    /// trap deactivates, focus returns to its return target"). Deactivating
    /// a non-top trap removes it but leaves the current top's focus
    /// unchanged, per spec.
    pub fn deactivate(&mut self, id: &str) -> Option<String> {
        let pos = self.stack.iter().position(|t| t.id == id)?;
        let was_top = pos == self.stack.len() - 1;
        let removed = self.stack.remove(pos);
        if was_top { removed.return_focus_to } else { None }
    }
}
