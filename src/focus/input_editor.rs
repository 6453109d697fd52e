//! Text-input cursor/selection routing (spec §4.8 "Input editor routing",
//! §8 "Input editor" invariant).

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    #[must_use]
    fn normalized(self) -> Self {
        if self.start <= self.end { self } else { Self { start: self.end, end: self.start } }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub value: String,
    pub cursor: usize,
    pub selection: Option<Selection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    ArrowLeft { shift: bool },
    ArrowRight { shift: bool },
    Home { shift: bool },
    End { shift: bool },
    Backspace,
    Delete,
}

/// All grapheme-cluster boundary offsets of `s`, including `0` and
/// `s.len()`.
fn boundaries(s: &str) -> Vec<usize> {
    let mut b: Vec<usize> = s.grapheme_indices(true).map(|(i, _)| i).collect();
    b.push(s.len());
    b
}

fn nearest_boundary(bounds: &[usize], pos: usize) -> usize {
    bounds.iter().copied().min_by_key(|&b| (b as isize - pos as isize).abs()).unwrap_or(0)
}

fn prev_boundary(bounds: &[usize], pos: usize) -> usize {
    bounds.iter().copied().filter(|&b| b < pos).max().unwrap_or(0)
}

fn next_boundary(bounds: &[usize], pos: usize) -> usize {
    bounds.iter().copied().filter(|&b| b > pos).min().unwrap_or(pos)
}

/// Apply one navigation/editing key to `state`, returning the next state
/// (spec §4.8: cursor stays in `0..=len`, selection endpoints normalize to
/// grapheme boundaries, both null or both present with `start <= end`).
#[must_use]
pub fn handle_key(state: &EditorState, key: EditorKey) -> EditorState {
    let bounds = boundaries(&state.value);
    let cursor = nearest_boundary(&bounds, state.cursor.min(state.value.len()));
    match key {
        EditorKey::ArrowLeft { shift } => {
            let target = prev_boundary(&bounds, cursor);
            move_cursor(state, cursor, target, shift)
        }
        EditorKey::ArrowRight { shift } => {
            let target = next_boundary(&bounds, cursor);
            move_cursor(state, cursor, target, shift)
        }
        EditorKey::Home { shift } => move_cursor(state, cursor, 0, shift),
        EditorKey::End { shift } => move_cursor(state, cursor, state.value.len(), shift),
        EditorKey::Backspace => delete(state, &bounds, cursor, Direction::Backward),
        EditorKey::Delete => delete(state, &bounds, cursor, Direction::Forward),
    }
}

fn move_cursor(state: &EditorState, from: usize, to: usize, shift: bool) -> EditorState {
    let selection = if shift {
        let anchor = state.selection.map_or(from, |s| if s.start == from { s.end } else { s.start });
        Some(Selection { start: anchor, end: to }.normalized())
    } else {
        None
    };
    EditorState { value: state.value.clone(), cursor: to, selection }
}

enum Direction {
    Forward,
    Backward,
}

fn delete(state: &EditorState, bounds: &[usize], cursor: usize, dir: Direction) -> EditorState {
    if let Some(sel) = state.selection {
        return replace_selection(state, sel, "");
    }
    let (start, end) = match dir {
        Direction::Backward => (prev_boundary(bounds, cursor), cursor),
        Direction::Forward => (cursor, next_boundary(bounds, cursor)),
    };
    if start == end {
        return EditorState { value: state.value.clone(), cursor, selection: None };
    }
    let mut value = state.value.clone();
    value.replace_range(start..end, "");
    EditorState { value, cursor: start, selection: None }
}

/// Insert `text` (typed input or a paste), replacing the active selection if
/// one exists (spec §4.8 "printable text and paste (selection replacement)").
#[must_use]
pub fn insert_text(state: &EditorState, text: &str) -> EditorState {
    if let Some(sel) = state.selection {
        return replace_selection(state, sel, text);
    }
    let bounds = boundaries(&state.value);
    let cursor = nearest_boundary(&bounds, state.cursor.min(state.value.len()));
    let mut value = state.value.clone();
    value.insert_str(cursor, text);
    EditorState { value, cursor: cursor + text.len(), selection: None }
}

fn replace_selection(state: &EditorState, sel: Selection, text: &str) -> EditorState {
    let sel = sel.normalized();
    let mut value = state.value.clone();
    value.replace_range(sel.start..sel.end, text);
    EditorState { value, cursor: sel.start + text.len(), selection: None }
}
