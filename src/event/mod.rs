//! Typed input events decoded from the binary "ZREV" event batch format
//! (spec §3 "Event batch (ZREV)", §6, §4.2 C2 Event Decoder).

pub mod decode;

pub use decode::{Decoder, EVENT_MAGIC};

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const SUPER = 1 << 3;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Down,
    Up,
    Repeat,
}

/// A key identity: either a Unicode codepoint (`Char`) or a named
/// non-printable key. Printable keys always arrive paired with a `Text`
/// event carrying the encoded grapheme (spec §4.9 step 1's input-editor
/// routing reads `Text`, not `Key`, for insertion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseKind {
    Down,
    Up,
    Move,
    Drag,
    Wheel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key { code: KeyCode, mods: Mods, action: KeyAction, time_ms: u32 },
    Text { text: String, time_ms: u32 },
    Mouse { x: u16, y: u16, kind: MouseKind, buttons: MouseButtons, mods: Mods, wheel_x: i16, wheel_y: i16, time_ms: u32 },
    Paste { text: String, time_ms: u32 },
    Resize { width: u16, height: u16, time_ms: u32 },
    FocusIn { time_ms: u32 },
    FocusOut { time_ms: u32 },
}

impl Event {
    #[must_use]
    pub fn time_ms(&self) -> u32 {
        match self {
            Self::Key { time_ms, .. }
            | Self::Text { time_ms, .. }
            | Self::Mouse { time_ms, .. }
            | Self::Paste { time_ms, .. }
            | Self::Resize { time_ms, .. }
            | Self::FocusIn { time_ms }
            | Self::FocusOut { time_ms } => *time_ms,
        }
    }
}
