//! Dropdown/select list routing (spec §4.8 "Dropdown routing").

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownItem {
    Selectable,
    Disabled,
    Divider,
}

impl DropdownItem {
    #[must_use]
    pub fn is_selectable(self) -> bool {
        matches!(self, Self::Selectable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownKey {
    ArrowDown,
    ArrowUp,
    Home,
    End,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownOutcome {
    /// Moved to a new selection; the overlay stays open.
    Moved(usize),
    /// Activated the item at this index; the overlay should close.
    Selected(usize),
    /// The overlay should close without a selection.
    Closed,
    /// The key did not apply.
    Unhandled,
}

/// Resolve one key against a dropdown's items and current selection (spec
/// §4.8). `items[selected_index]` need not itself be selectable — `Enter`
/// forward-scans to find the nearest selectable item.
#[must_use]
pub fn route(items: &[DropdownItem], selected_index: usize, key: DropdownKey) -> DropdownOutcome {
    if items.is_empty() {
        return DropdownOutcome::Unhandled;
    }
    match key {
        DropdownKey::ArrowDown => next_selectable(items, selected_index, 1).map_or(DropdownOutcome::Unhandled, DropdownOutcome::Moved),
        DropdownKey::ArrowUp => next_selectable(items, selected_index, -1).map_or(DropdownOutcome::Unhandled, DropdownOutcome::Moved),
        DropdownKey::Home => first_selectable(items).map_or(DropdownOutcome::Unhandled, DropdownOutcome::Moved),
        DropdownKey::End => last_selectable(items).map_or(DropdownOutcome::Unhandled, DropdownOutcome::Moved),
        DropdownKey::Enter => forward_scan(items, selected_index).map_or(DropdownOutcome::Unhandled, DropdownOutcome::Selected),
        DropdownKey::Escape => DropdownOutcome::Closed,
    }
}

fn next_selectable(items: &[DropdownItem], from: usize, delta: isize) -> Option<usize> {
    let len = items.len() as isize;
    let mut i = from as isize;
    for _ in 0..len {
        i = (i + delta).rem_euclid(len);
        if items[i as usize].is_selectable() {
            return Some(i as usize);
        }
    }
    None
}

fn first_selectable(items: &[DropdownItem]) -> Option<usize> {
    items.iter().position(|i| i.is_selectable())
}

fn last_selectable(items: &[DropdownItem]) -> Option<usize> {
    items.iter().rposition(|i| i.is_selectable())
}

/// Forward-scan from `from` (inclusive, wrapping) for the nearest
/// selectable item (spec §4.8 "fires on-select" via `Enter`/`Space`).
fn forward_scan(items: &[DropdownItem], from: usize) -> Option<usize> {
    let len = items.len();
    (0..len).map(|offset| (from + offset) % len).find(|&i| items[i].is_selectable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use DropdownItem::{Disabled, Divider, Selectable};

    #[test]
    fn arrow_down_skips_dividers_and_disabled_items() {
        let items = [Selectable, Divider, Disabled, Selectable];
        assert_eq!(route(&items, 0, DropdownKey::ArrowDown), DropdownOutcome::Moved(3));
    }

    #[test]
    fn arrow_up_wraps_to_the_last_selectable() {
        let items = [Selectable, Divider, Selectable];
        assert_eq!(route(&items, 0, DropdownKey::ArrowUp), DropdownOutcome::Moved(2));
    }

    #[test]
    fn enter_forward_scans_when_current_is_a_divider() {
        let items = [Selectable, Divider, Selectable];
        assert_eq!(route(&items, 1, DropdownKey::Enter), DropdownOutcome::Selected(2));
    }

    #[test]
    fn escape_always_closes_without_selection() {
        let items = [Selectable];
        assert_eq!(route(&items, 0, DropdownKey::Escape), DropdownOutcome::Closed);
    }

    #[test]
    fn home_and_end_jump_to_first_and_last_selectable() {
        let items = [Divider, Selectable, Disabled, Selectable, Divider];
        assert_eq!(route(&items, 0, DropdownKey::Home), DropdownOutcome::Moved(1));
        assert_eq!(route(&items, 0, DropdownKey::End), DropdownOutcome::Moved(3));
    }
}
