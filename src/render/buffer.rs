//! A cell grid that a decoded drawlist can be replayed onto — a test/debug
//! helper, not part of the runtime's hot path (spec §6: the real external
//! interface is the raw drawlist byte sink). Grounded in the teacher's own
//! `Buffer`/`Cell` grid API (its now-removed GPU painter used the same
//! shape for its software fallback).

use crate::drawlist::{DrawCommand, Decoder};
use crate::error::ZuiResult;
use crate::style::{Color, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub style: TextStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', style: TextStyle::default() }
    }
}

pub struct Buffer {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    clip_stack: Vec<(u16, u16, u16, u16)>,
}

impl Buffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, cells: vec![Cell::default(); usize::from(width) * usize::from(height)], clip_stack: Vec::new() }
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if !self.in_clip(x, y) || x >= self.width || y >= self.height {
            return;
        }
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        if let Some(slot) = self.cells.get_mut(idx) {
            *slot = cell;
        }
    }

    fn in_clip(&self, x: u16, y: u16) -> bool {
        match self.clip_stack.last() {
            None => true,
            Some(&(cx, cy, cw, ch)) => x >= cx && x < cx + cw && y >= cy && y < cy + ch,
        }
    }

    /// Replay every command in `bytes` onto this buffer (decoded eagerly;
    /// any [`crate::error::ZuiError`] aborts the replay).
    pub fn apply_drawlist(&mut self, bytes: &[u8]) -> ZuiResult<()> {
        let decoder = Decoder::new(bytes)?;
        for cmd in decoder.commands() {
            self.apply(cmd?);
        }
        Ok(())
    }

    fn apply(&mut self, cmd: DrawCommand<'_>) {
        match cmd {
            DrawCommand::Clear { color } => {
                let (w, h) = (self.width, self.height);
                for y in 0..h {
                    for x in 0..w {
                        self.set(x, y, Cell { ch: ' ', style: TextStyle::default().bg(color) });
                    }
                }
            }
            DrawCommand::FillRect { x, y, w, h, color } => {
                for row in y..y.saturating_add(h) {
                    for col in x..x.saturating_add(w) {
                        self.set(col, row, Cell { ch: ' ', style: TextStyle::default().bg(color) });
                    }
                }
            }
            DrawCommand::DrawText { x, y, text, style } => {
                for (i, ch) in text.chars().enumerate() {
                    let Ok(dx) = u16::try_from(i) else { break };
                    self.set(x + dx, y, Cell { ch, style: style.clone() });
                }
            }
            DrawCommand::PushClip { x, y, w, h } => self.clip_stack.push((x, y, w, h)),
            DrawCommand::PopClip => {
                self.clip_stack.pop();
            }
            DrawCommand::SetCursor { .. } | DrawCommand::HideCursor | DrawCommand::SetLink { .. } => {}
        }
    }

    /// Render as plain text, one line per row, for snapshot tests.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(usize::from(self.width + 1) * usize::from(self.height));
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.get(x, y).map_or(' ', |c| c.ch));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawlist::{DrawlistBuilder, DrawlistCaps};

    #[test]
    fn apply_drawlist_paints_text() {
        let mut builder = DrawlistBuilder::new(1, 10, 2, DrawlistCaps::default());
        builder.clear(Color::Black).draw_text(0, 0, "hi", &TextStyle::default());
        let bytes = builder.build().unwrap();

        let mut buffer = Buffer::new(10, 2);
        buffer.apply_drawlist(&bytes).unwrap();
        assert_eq!(buffer.get(0, 0).unwrap().ch, 'h');
        assert_eq!(buffer.get(1, 0).unwrap().ch, 'i');
    }

    #[test]
    fn clip_stack_confines_fill_rect() {
        let mut builder = DrawlistBuilder::new(1, 10, 2, DrawlistCaps::default());
        builder.push_clip(0, 0, 2, 2).fill_rect(0, 0, 10, 2, Color::Red).pop_clip();
        let bytes = builder.build().unwrap();

        let mut buffer = Buffer::new(10, 2);
        buffer.apply_drawlist(&bytes).unwrap();
        assert!(buffer.get(0, 0).unwrap().style.bg.is_some());
        assert!(buffer.get(5, 0).unwrap().style.bg.is_none(), "fill must be clipped to the pushed rect");
    }
}
