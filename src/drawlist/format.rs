//! Wire layout constants for the "ZRDL" drawlist format (spec §4.2, §6).
//!
//! ```text
//! [ 64-byte header ][ command stream, 8-byte aligned records ][ string arena ][ blob arena ]
//! ```

/// Magic number, little-endian bytes `b"ZRDL"`.
pub const MAGIC: u32 = 0x4c44_525a;
pub const VERSION: u16 = 1;
pub const HEADER_LEN: usize = 64;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Clear = 0,
    FillRect = 1,
    DrawText = 2,
    DrawTextRun = 3,
    PushClip = 4,
    PopClip = 5,
    SetCursor = 6,
    HideCursor = 7,
    SetLink = 8,
    DrawCanvas = 9,
    DrawImage = 10,
}

impl OpCode {
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Clear,
            1 => Self::FillRect,
            2 => Self::DrawText,
            3 => Self::DrawTextRun,
            4 => Self::PushClip,
            5 => Self::PopClip,
            6 => Self::SetCursor,
            7 => Self::HideCursor,
            8 => Self::SetLink,
            9 => Self::DrawCanvas,
            10 => Self::DrawImage,
            _ => return None,
        })
    }
}

/// The fixed 64-byte header. Every multi-byte field is little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u32,
    pub version: u16,
    pub flags: u16,
    pub frame_id: u64,
    pub cmd_count: u32,
    pub cmd_stream_len: u32,
    pub string_arena_offset: u32,
    pub string_arena_len: u32,
    pub blob_arena_offset: u32,
    pub blob_arena_len: u32,
    pub viewport_width: u16,
    pub viewport_height: u16,
}

impl Header {
    #[must_use]
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..8].copy_from_slice(&self.flags.to_le_bytes());
        buf[8..16].copy_from_slice(&self.frame_id.to_le_bytes());
        buf[16..20].copy_from_slice(&self.cmd_count.to_le_bytes());
        buf[20..24].copy_from_slice(&self.cmd_stream_len.to_le_bytes());
        buf[24..28].copy_from_slice(&self.string_arena_offset.to_le_bytes());
        buf[28..32].copy_from_slice(&self.string_arena_len.to_le_bytes());
        buf[32..36].copy_from_slice(&self.blob_arena_offset.to_le_bytes());
        buf[36..40].copy_from_slice(&self.blob_arena_len.to_le_bytes());
        buf[40..42].copy_from_slice(&self.viewport_width.to_le_bytes());
        buf[42..44].copy_from_slice(&self.viewport_height.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> crate::error::ZuiResult<Self> {
        if buf.len() < HEADER_LEN {
            return Err(crate::error::ZuiError::format(0, "drawlist shorter than the 64-byte header"));
        }
        let magic = u32::from_le_bytes(buf[0..4].try_into().unwrap());
        if magic != MAGIC {
            return Err(crate::error::ZuiError::format(0, format!("bad magic: {magic:#x}")));
        }
        Ok(Self {
            magic,
            version: u16::from_le_bytes(buf[4..6].try_into().unwrap()),
            flags: u16::from_le_bytes(buf[6..8].try_into().unwrap()),
            frame_id: u64::from_le_bytes(buf[8..16].try_into().unwrap()),
            cmd_count: u32::from_le_bytes(buf[16..20].try_into().unwrap()),
            cmd_stream_len: u32::from_le_bytes(buf[20..24].try_into().unwrap()),
            string_arena_offset: u32::from_le_bytes(buf[24..28].try_into().unwrap()),
            string_arena_len: u32::from_le_bytes(buf[28..32].try_into().unwrap()),
            blob_arena_offset: u32::from_le_bytes(buf[32..36].try_into().unwrap()),
            blob_arena_len: u32::from_le_bytes(buf[36..40].try_into().unwrap()),
            viewport_width: u16::from_le_bytes(buf[40..42].try_into().unwrap()),
            viewport_height: u16::from_le_bytes(buf[42..44].try_into().unwrap()),
        })
    }
}

/// Round `len` up to the next 8-byte boundary (every command record is
/// 8-byte aligned, spec §4.2).
#[must_use]
pub fn align8(len: usize) -> usize {
    (len + 7) & !7
}

/// `set-cursor`'s terminal-reported cursor shape (spec §4.1
/// `set-cursor(x,y,shape,visible,blink)`).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Block = 0,
    Underline = 1,
    Bar = 2,
}

impl CursorShape {
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Block,
            1 => Self::Underline,
            2 => Self::Bar,
            _ => return None,
        })
    }
}

/// Pixel layout of a `draw-image` blob (spec §4.2).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Rgba = 0,
    Indexed = 1,
}

impl ImageFormat {
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Rgba,
            1 => Self::Indexed,
            _ => return None,
        })
    }
}

/// Terminal image protocol hint (spec §6: "kitty, sixel, iterm2, or none").
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageProtocol {
    Kitty = 0,
    Sixel = 1,
    Iterm2 = 2,
    #[default]
    None = 3,
}

impl ImageProtocol {
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Kitty,
            1 => Self::Sixel,
            2 => Self::Iterm2,
            3 => Self::None,
            _ => return None,
        })
    }
}

/// How an image's pixel box is fit into its laid-out cell rect. Not
/// enumerated by the spec; `Contain` is the least-surprising default for a
/// terminal UI where overflow would otherwise clobber neighboring cells.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFit {
    #[default]
    Contain = 0,
    Cover = 1,
    Stretch = 2,
}

impl ImageFit {
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Contain,
            1 => Self::Cover,
            2 => Self::Stretch,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrips_through_bytes() {
        let header = Header {
            magic: MAGIC,
            version: VERSION,
            flags: 0,
            frame_id: 42,
            cmd_count: 3,
            cmd_stream_len: 128,
            string_arena_offset: 64 + 128,
            string_arena_len: 16,
            blob_arena_offset: 64 + 128 + 16,
            blob_arena_len: 0,
            viewport_width: 80,
            viewport_height: 24,
        };
        let bytes = header.to_bytes();
        let parsed = Header::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&0xdead_beefu32.to_le_bytes());
        let err = Header::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.code(), "FORMAT");
    }

    #[test]
    fn align8_rounds_up() {
        assert_eq!(align8(0), 0);
        assert_eq!(align8(1), 8);
        assert_eq!(align8(8), 8);
        assert_eq!(align8(9), 16);
    }
}
