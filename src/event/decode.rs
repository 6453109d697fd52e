//! Binary "ZREV" event batch decoder (spec §3 Event batch, §6 binary format
//! compatibility, §4.9 step 1 "decode any pending event bytes").
//!
//! ```text
//! [ 16-byte header ][ event records, 4-byte aligned: 12-byte record header + payload ]
//! ```

use crate::error::ZuiError;
use crate::event::{Event, KeyAction, KeyCode, Mods, MouseButtons, MouseKind};

pub const EVENT_MAGIC: u32 = 0x5645_525a;
pub const EVENT_VERSION: u16 = 1;
const HEADER_LEN: usize = 16;
const RECORD_HEADER_LEN: usize = 12;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Key = 0,
    Text = 1,
    Mouse = 2,
    Paste = 3,
    Resize = 4,
    FocusIn = 5,
    FocusOut = 6,
}

impl Kind {
    fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Key,
            1 => Self::Text,
            2 => Self::Mouse,
            3 => Self::Paste,
            4 => Self::Resize,
            5 => Self::FocusIn,
            6 => Self::FocusOut,
            _ => return None,
        })
    }
}

fn align4(len: usize) -> usize {
    (len + 3) & !3
}

/// Parses a `ZREV` byte batch into an owned `Vec<Event>` up front (batches
/// are small and short-lived compared to a drawlist, so there is no need
/// for `crate::drawlist::decoder`'s lazy-iterator treatment).
pub struct Decoder<'a> {
    bytes: &'a [u8],
    event_count: u32,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, ZuiError> {
        if bytes.len() < HEADER_LEN {
            return Err(ZuiError::format(0, "event batch shorter than the 16-byte header"));
        }
        let magic = read_u32(bytes, 0)?;
        if magic != EVENT_MAGIC {
            return Err(ZuiError::format(0, format!("bad event batch magic 0x{magic:08x}")));
        }
        let version = read_u16(bytes, 4)?;
        if version != EVENT_VERSION {
            return Err(ZuiError::Unsupported(format!("unsupported event batch version {version}")));
        }
        let event_count = read_u32(bytes, 8)?;
        let batch_len = read_u32(bytes, 12)? as usize;
        if batch_len > bytes.len() {
            return Err(ZuiError::format(12, "batch-len exceeds the supplied buffer"));
        }
        Ok(Self { bytes: &bytes[..batch_len], event_count })
    }

    /// Decode every record in this batch. Stops at the first malformed
    /// record rather than returning a partial list, matching the drawlist
    /// decoder's "never silently skip a corrupt record" policy.
    pub fn events(&self) -> Result<Vec<Event>, ZuiError> {
        let mut out = Vec::with_capacity(self.event_count as usize);
        let mut offset = HEADER_LEN;
        while offset < self.bytes.len() {
            let (event, next) = decode_record(self.bytes, offset)?;
            out.push(event);
            offset = next;
        }
        if out.len() as u32 != self.event_count {
            return Err(ZuiError::format(8, "event-count header field does not match the number of records decoded"));
        }
        Ok(out)
    }
}

fn decode_record(bytes: &[u8], offset: usize) -> Result<(Event, usize), ZuiError> {
    if offset + RECORD_HEADER_LEN > bytes.len() {
        return Err(ZuiError::format(offset, "truncated event record header"));
    }
    let kind_byte = bytes[offset];
    let kind = Kind::from_u8(kind_byte).ok_or_else(|| ZuiError::Unsupported(format!("unknown event kind {kind_byte} at offset {offset}")))?;
    let action_byte = bytes[offset + 1];
    let time_ms = read_u32(bytes, offset + 4)?;
    let payload_len = read_u32(bytes, offset + 8)? as usize;
    let payload_start = offset + RECORD_HEADER_LEN;
    let payload_end = payload_start.checked_add(payload_len).ok_or_else(|| ZuiError::format(offset, "payload length overflow"))?;
    if payload_end > bytes.len() {
        return Err(ZuiError::format(offset, "event payload runs past the end of the batch"));
    }
    let payload = &bytes[payload_start..payload_end];

    let event = match kind {
        Kind::Key => decode_key(payload, action_byte, time_ms, offset)?,
        Kind::Text => Event::Text { text: decode_utf8(payload, offset)?, time_ms },
        Kind::Mouse => decode_mouse(payload, time_ms, offset)?,
        Kind::Paste => Event::Paste { text: decode_utf8(payload, offset)?, time_ms },
        Kind::Resize => decode_resize(payload, time_ms, offset)?,
        Kind::FocusIn => Event::FocusIn { time_ms },
        Kind::FocusOut => Event::FocusOut { time_ms },
    };
    Ok((event, payload_start + align4(payload_len)))
}

fn decode_key(payload: &[u8], action_byte: u8, time_ms: u32, offset: usize) -> Result<Event, ZuiError> {
    if payload.len() < 8 {
        return Err(ZuiError::format(offset, "key event payload shorter than 8 bytes"));
    }
    let action = match action_byte {
        0 => KeyAction::Down,
        1 => KeyAction::Up,
        2 => KeyAction::Repeat,
        other => return Err(ZuiError::format(offset, format!("unknown key action {other}"))),
    };
    let mods = Mods::from_bits_truncate(payload[1]);
    let data = u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);
    let code = match payload[0] {
        0 => char::from_u32(data).map(KeyCode::Char).ok_or_else(|| ZuiError::format(offset, "key event carries an invalid codepoint"))?,
        1 => KeyCode::Enter,
        2 => KeyCode::Escape,
        3 => KeyCode::Backspace,
        4 => KeyCode::Delete,
        5 => KeyCode::Tab,
        6 => KeyCode::Home,
        7 => KeyCode::End,
        8 => KeyCode::PageUp,
        9 => KeyCode::PageDown,
        10 => KeyCode::Up,
        11 => KeyCode::Down,
        12 => KeyCode::Left,
        13 => KeyCode::Right,
        #[allow(clippy::cast_possible_truncation)]
        14 => KeyCode::F(data as u8),
        other => return Err(ZuiError::format(offset, format!("unknown key code tag {other}"))),
    };
    Ok(Event::Key { code, mods, action, time_ms })
}

fn decode_mouse(payload: &[u8], time_ms: u32, offset: usize) -> Result<Event, ZuiError> {
    if payload.len() < 12 {
        return Err(ZuiError::format(offset, "mouse event payload shorter than 12 bytes"));
    }
    let x = u16::from_le_bytes([payload[0], payload[1]]);
    let y = u16::from_le_bytes([payload[2], payload[3]]);
    let kind = match payload[4] {
        0 => MouseKind::Down,
        1 => MouseKind::Up,
        2 => MouseKind::Move,
        3 => MouseKind::Drag,
        4 => MouseKind::Wheel,
        other => return Err(ZuiError::format(offset, format!("unknown mouse kind {other}"))),
    };
    let buttons = MouseButtons::from_bits_truncate(payload[5]);
    let mods = Mods::from_bits_truncate(payload[6]);
    let wheel_x = i16::from_le_bytes([payload[8], payload[9]]);
    let wheel_y = i16::from_le_bytes([payload[10], payload[11]]);
    Ok(Event::Mouse { x, y, kind, buttons, mods, wheel_x, wheel_y, time_ms })
}

fn decode_resize(payload: &[u8], time_ms: u32, offset: usize) -> Result<Event, ZuiError> {
    if payload.len() < 4 {
        return Err(ZuiError::format(offset, "resize event payload shorter than 4 bytes"));
    }
    let width = u16::from_le_bytes([payload[0], payload[1]]);
    let height = u16::from_le_bytes([payload[2], payload[3]]);
    Ok(Event::Resize { width, height, time_ms })
}

fn decode_utf8(payload: &[u8], offset: usize) -> Result<String, ZuiError> {
    std::str::from_utf8(payload).map(str::to_owned).map_err(|_| ZuiError::format(offset, "event text payload is not valid UTF-8"))
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u16, ZuiError> {
    bytes
        .get(offset..offset + 2)
        .map(|s| u16::from_le_bytes([s[0], s[1]]))
        .ok_or_else(|| ZuiError::format(offset, "truncated u16"))
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, ZuiError> {
    bytes
        .get(offset..offset + 4)
        .map(|s| u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
        .ok_or_else(|| ZuiError::format(offset, "truncated u32"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(event_count: u32, batch_len: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&EVENT_MAGIC.to_le_bytes());
        out.extend_from_slice(&EVENT_VERSION.to_le_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&event_count.to_le_bytes());
        out.extend_from_slice(&batch_len.to_le_bytes());
        out
    }

    fn push_record(buf: &mut Vec<u8>, kind: u8, action: u8, time_ms: u32, payload: &[u8]) {
        buf.push(kind);
        buf.push(action);
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&time_ms.to_le_bytes());
        buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(payload);
        while buf.len() % 4 != 0 {
            buf.push(0);
        }
    }

    #[test]
    fn decodes_a_resize_then_a_key_event() {
        let mut bytes = header(0, 0);
        let mut resize_payload = Vec::new();
        resize_payload.extend_from_slice(&80u16.to_le_bytes());
        resize_payload.extend_from_slice(&24u16.to_le_bytes());
        push_record(&mut bytes, 4, 0, 10, &resize_payload);
        let mut key_payload = vec![1u8, Mods::CTRL.bits(), 0, 0];
        key_payload.extend_from_slice(&0u32.to_le_bytes());
        push_record(&mut bytes, 0, 0, 20, &key_payload);
        let batch_len = bytes.len() as u32;
        bytes[12..16].copy_from_slice(&batch_len.to_le_bytes());
        bytes[8..12].copy_from_slice(&2u32.to_le_bytes());

        let decoder = Decoder::new(&bytes).unwrap();
        let events = decoder.events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], Event::Resize { width: 80, height: 24, time_ms: 10 });
        assert_eq!(events[1], Event::Key { code: KeyCode::Enter, mods: Mods::CTRL, action: KeyAction::Down, time_ms: 20 });
    }

    #[test]
    fn text_event_round_trips_utf8() {
        let mut bytes = header(0, 0);
        push_record(&mut bytes, 1, 0, 5, "héllo".as_bytes());
        let batch_len = bytes.len() as u32;
        bytes[12..16].copy_from_slice(&batch_len.to_le_bytes());
        bytes[8..12].copy_from_slice(&1u32.to_le_bytes());

        let events = Decoder::new(&bytes).unwrap().events().unwrap();
        assert_eq!(events[0], Event::Text { text: "héllo".to_string(), time_ms: 5 });
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = header(0, HEADER_LEN as u32);
        bytes[0] = 0;
        assert!(Decoder::new(&bytes).is_err());
    }

    #[test]
    fn mismatched_event_count_is_rejected() {
        let mut bytes = header(5, 0);
        push_record(&mut bytes, 5, 0, 0, &[]);
        let batch_len = bytes.len() as u32;
        bytes[12..16].copy_from_slice(&batch_len.to_le_bytes());

        let decoder = Decoder::new(&bytes).unwrap();
        assert!(decoder.events().is_err());
    }

    #[test]
    fn truncated_record_header_yields_format_error() {
        let mut bytes = header(1, 0);
        bytes.extend_from_slice(&[5, 0, 0]);
        let batch_len = bytes.len() as u32;
        bytes[12..16].copy_from_slice(&batch_len.to_le_bytes());

        let decoder = Decoder::new(&bytes).unwrap();
        assert!(matches!(decoder.events(), Err(ZuiError::Format { .. })));
    }
}
