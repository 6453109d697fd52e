//! Default `crossterm`-backed byte sink and event source (spec §6, §2.3
//! "Default external-interface adapters"): bridges the raw `ZRDL`/`ZREV`
//! boundary to an actual terminal so the runtime is runnable end to end
//! without a host supplying its own I/O, the way the teacher ships
//! `crossterm` as its terminal dependency.

use std::io::Write;
use std::time::Duration;

use crossterm::event::{self, KeyCode as CtKeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use crossterm::style::{Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, style};

use crate::drawlist::Decoder;
use crate::error::ZuiError;
use crate::event::{Event, KeyAction, KeyCode, Mods, MouseButtons, MouseKind};
use crate::render::buffer::{Buffer, Cell};
use crate::scheduler::{ByteSink, EventSource, SinkOutcome};
use crate::style::{Attrs, Color, TextStyle};

/// Decodes each frame's drawlist into a cell grid and diffs it against the
/// previous frame, writing only changed cells (spec §1 "diffs successive
/// drawlists to compute minimal terminal output").
pub struct CrosstermSink<W: Write> {
    out: W,
    prev: Option<Buffer>,
}

impl<W: Write> CrosstermSink<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out, prev: None }
    }
}

impl<W: Write> ByteSink for CrosstermSink<W> {
    fn write_frame(&mut self, bytes: &[u8]) -> Result<SinkOutcome, ZuiError> {
        let decoder = Decoder::new(bytes)?;
        let header = decoder.header();
        let mut next = Buffer::new(header.viewport_width, header.viewport_height);
        next.apply_drawlist(bytes)?;

        for y in 0..next.height {
            for x in 0..next.width {
                let cell = next.get(x, y).cloned().unwrap_or_default();
                let changed = self.prev.as_ref().and_then(|p| p.get(x, y)) != Some(&cell);
                if changed {
                    write_cell(&mut self.out, x, y, &cell).map_err(|e| ZuiError::Platform(e.to_string()))?;
                }
            }
        }
        self.out.flush().map_err(|e| ZuiError::Platform(e.to_string()))?;
        self.prev = Some(next);
        Ok(SinkOutcome::Written)
    }

    fn flush(&mut self) -> Result<(), ZuiError> {
        self.out.flush().map_err(|e| ZuiError::Platform(e.to_string()))
    }
}

fn write_cell<W: Write>(out: &mut W, x: u16, y: u16, cell: &Cell) -> std::io::Result<()> {
    queue!(out, cursor::MoveTo(x, y))?;
    apply_style(out, &cell.style)?;
    queue!(out, style::Print(cell.ch))?;
    queue!(out, SetAttribute(crossterm::style::Attribute::Reset))
}

fn apply_style<W: Write>(out: &mut W, style: &TextStyle) -> std::io::Result<()> {
    if let Some(fg) = style.color {
        queue!(out, SetForegroundColor(to_crossterm_color(fg)))?;
    }
    if let Some(bg) = style.bg {
        queue!(out, SetBackgroundColor(to_crossterm_color(bg)))?;
    }
    if style.attrs.contains(Attrs::BOLD) {
        queue!(out, SetAttribute(crossterm::style::Attribute::Bold))?;
    }
    if style.attrs.contains(Attrs::DIM) {
        queue!(out, SetAttribute(crossterm::style::Attribute::Dim))?;
    }
    if style.attrs.contains(Attrs::ITALIC) {
        queue!(out, SetAttribute(crossterm::style::Attribute::Italic))?;
    }
    if style.attrs.contains(Attrs::UNDERLINE) {
        queue!(out, SetAttribute(crossterm::style::Attribute::Underlined))?;
    }
    if style.attrs.contains(Attrs::INVERSE) {
        queue!(out, SetAttribute(crossterm::style::Attribute::Reverse))?;
    }
    if style.attrs.contains(Attrs::STRIKE) {
        queue!(out, SetAttribute(crossterm::style::Attribute::CrossedOut))?;
    }
    Ok(())
}

fn to_crossterm_color(color: Color) -> CtColor {
    let (r, g, b) = color.to_rgb();
    CtColor::Rgb { r, g, b }
}

/// Non-blocking poll over `crossterm::event::read`, translated into the
/// runtime's own event vocabulary (spec §6 "Event source").
#[derive(Default)]
pub struct CrosstermEventSource;

impl CrosstermEventSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for CrosstermEventSource {
    fn poll_events(&mut self) -> Result<Vec<Event>, ZuiError> {
        let mut out = Vec::new();
        while event::poll(Duration::ZERO).map_err(|e| ZuiError::Platform(e.to_string()))? {
            let raw = event::read().map_err(|e| ZuiError::Platform(e.to_string()))?;
            if let Some(ev) = translate(raw) {
                out.push(ev);
            }
        }
        Ok(out)
    }
}

fn translate(raw: event::Event) -> Option<Event> {
    match raw {
        event::Event::Key(k) => {
            if k.kind == KeyEventKind::Release {
                return None;
            }
            let action = match k.kind {
                KeyEventKind::Press => KeyAction::Down,
                KeyEventKind::Repeat => KeyAction::Repeat,
                KeyEventKind::Release => KeyAction::Up,
            };
            let mods = translate_mods(k.modifiers);
            let code = translate_key_code(k.code)?;
            Some(Event::Key { code, mods, action, time_ms: 0 })
        }
        event::Event::Mouse(m) => Some(Event::Mouse {
            x: m.column,
            y: m.row,
            kind: translate_mouse_kind(m.kind),
            buttons: translate_mouse_buttons(m.kind),
            mods: translate_mods(m.modifiers),
            wheel_x: 0,
            wheel_y: translate_wheel(m.kind),
            time_ms: 0,
        }),
        event::Event::Resize(w, h) => Some(Event::Resize { width: w, height: h, time_ms: 0 }),
        event::Event::Paste(text) => Some(Event::Paste { text, time_ms: 0 }),
        event::Event::FocusGained => Some(Event::FocusIn { time_ms: 0 }),
        event::Event::FocusLost => Some(Event::FocusOut { time_ms: 0 }),
    }
}

fn translate_mods(mods: KeyModifiers) -> Mods {
    let mut out = Mods::empty();
    if mods.contains(KeyModifiers::SHIFT) {
        out.insert(Mods::SHIFT);
    }
    if mods.contains(KeyModifiers::CONTROL) {
        out.insert(Mods::CTRL);
    }
    if mods.contains(KeyModifiers::ALT) {
        out.insert(Mods::ALT);
    }
    if mods.contains(KeyModifiers::SUPER) {
        out.insert(Mods::SUPER);
    }
    out
}

fn translate_key_code(code: CtKeyCode) -> Option<KeyCode> {
    Some(match code {
        CtKeyCode::Char(c) => KeyCode::Char(c),
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    })
}

fn translate_mouse_kind(kind: MouseEventKind) -> MouseKind {
    match kind {
        MouseEventKind::Down(_) => MouseKind::Down,
        MouseEventKind::Up(_) => MouseKind::Up,
        MouseEventKind::Drag(_) => MouseKind::Drag,
        MouseEventKind::Moved => MouseKind::Move,
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => MouseKind::Wheel,
    }
}

fn translate_mouse_buttons(kind: MouseEventKind) -> MouseButtons {
    match kind {
        MouseEventKind::Down(b) | MouseEventKind::Up(b) | MouseEventKind::Drag(b) => match b {
            event::MouseButton::Left => MouseButtons::LEFT,
            event::MouseButton::Right => MouseButtons::RIGHT,
            event::MouseButton::Middle => MouseButtons::MIDDLE,
        },
        _ => MouseButtons::empty(),
    }
}

fn translate_wheel(kind: MouseEventKind) -> i16 {
    match kind {
        MouseEventKind::ScrollUp => 1,
        MouseEventKind::ScrollDown => -1,
        _ => 0,
    }
}
