//! Lazy decoding of a "ZRDL" byte slice (spec §4.2, §6, §7). Decoding
//! validates structure and cross-references (string/blob indices) as it
//! goes; any malformed reference yields a `Format` error carrying the byte
//! offset of the bad field, never a panic or out-of-bounds read.

use crate::drawlist::blitter::Blitter;
use crate::drawlist::format::{align8, CursorShape, Header, ImageFit, ImageFormat, ImageProtocol, OpCode, HEADER_LEN};
use crate::error::{ZuiError, ZuiResult};
use crate::style::{Attrs, Color, Link, TextStyle, UnderlineStyle};

/// Sentinel meaning "absent" for an optional string-arena reference, matching
/// `drawlist::builder`'s encoding of `set-link(null)` and cleared style links.
const NO_STRING: u32 = u32::MAX;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand<'a> {
    Clear { color: Color },
    FillRect { x: u16, y: u16, w: u16, h: u16, color: Color },
    DrawText { x: u16, y: u16, text: &'a str, style: TextStyle },
    DrawTextRun { x: u16, y: u16, segments: Vec<(&'a str, TextStyle)> },
    PushClip { x: u16, y: u16, w: u16, h: u16 },
    PopClip,
    SetCursor { x: u16, y: u16, shape: CursorShape, visible: bool, blink: bool },
    HideCursor,
    SetLink { uri: Option<&'a str>, id: Option<&'a str> },
    DrawCanvas { x: u16, y: u16, w: u16, h: u16, pixels: &'a [u8], blitter: Blitter, px_w: Option<u16>, px_h: Option<u16> },
    #[allow(clippy::too_many_arguments)]
    DrawImage {
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        pixels: &'a [u8],
        format: ImageFormat,
        protocol: ImageProtocol,
        z: i8,
        fit: ImageFit,
        image_id: u32,
        px_w: Option<u16>,
        px_h: Option<u16>,
    },
}

pub struct Decoder<'a> {
    bytes: &'a [u8],
    header: Header,
    strings: Vec<&'a str>,
    blobs: Vec<&'a [u8]>,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> ZuiResult<Self> {
        let header = Header::from_bytes(bytes)?;
        let strings = Self::parse_strings(bytes, &header)?;
        let blobs = Self::parse_blobs(bytes, &header)?;
        Ok(Self { bytes, header, strings, blobs })
    }

    fn parse_strings(bytes: &'a [u8], header: &Header) -> ZuiResult<Vec<&'a str>> {
        let start = header.string_arena_offset as usize;
        let len = header.string_arena_len as usize;
        let arena = bytes
            .get(start..start + len)
            .ok_or_else(|| ZuiError::format(start, "string arena out of bounds"))?;
        let mut strings = Vec::new();
        let mut cursor = 0usize;
        while cursor < arena.len() {
            let len_bytes = arena
                .get(cursor..cursor + 4)
                .ok_or_else(|| ZuiError::format(start + cursor, "truncated string length prefix"))?;
            let slen = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
            cursor += 4;
            let sbytes = arena
                .get(cursor..cursor + slen)
                .ok_or_else(|| ZuiError::format(start + cursor, "truncated string bytes"))?;
            let s = std::str::from_utf8(sbytes).map_err(|_| ZuiError::format(start + cursor, "string is not valid utf-8"))?;
            strings.push(s);
            cursor += slen;
        }
        Ok(strings)
    }

    fn parse_blobs(bytes: &'a [u8], header: &Header) -> ZuiResult<Vec<&'a [u8]>> {
        let start = header.blob_arena_offset as usize;
        let len = header.blob_arena_len as usize;
        let arena = bytes.get(start..start + len).ok_or_else(|| ZuiError::format(start, "blob arena out of bounds"))?;
        let mut blobs = Vec::new();
        let mut cursor = 0usize;
        while cursor < arena.len() {
            let len_bytes = arena
                .get(cursor..cursor + 4)
                .ok_or_else(|| ZuiError::format(start + cursor, "truncated blob length prefix"))?;
            let blen = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
            cursor += 4;
            let bbytes =
                arena.get(cursor..cursor + blen).ok_or_else(|| ZuiError::format(start + cursor, "truncated blob bytes"))?;
            blobs.push(bbytes);
            cursor += blen;
        }
        Ok(blobs)
    }

    #[must_use]
    pub fn header(&self) -> Header {
        self.header
    }

    fn string(&self, idx: u32, offset: usize) -> ZuiResult<&'a str> {
        self.strings.get(idx as usize).copied().ok_or_else(|| ZuiError::format(offset, "string index out of range"))
    }

    fn blob(&self, idx: u32, offset: usize) -> ZuiResult<&'a [u8]> {
        self.blobs.get(idx as usize).copied().ok_or_else(|| ZuiError::format(offset, "blob index out of range"))
    }

    /// Iterate commands lazily; each `next()` call only touches the bytes of
    /// that one command plus whatever string/blob reference it makes.
    #[must_use]
    pub fn commands(&self) -> CommandIter<'a, '_> {
        CommandIter { decoder: self, offset: HEADER_LEN, remaining: self.header.cmd_count }
    }
}

pub struct CommandIter<'a, 'd> {
    decoder: &'d Decoder<'a>,
    offset: usize,
    remaining: u32,
}

impl<'a, 'd> Iterator for CommandIter<'a, 'd> {
    type Item = ZuiResult<DrawCommand<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        Some(self.decode_one())
    }
}

impl<'a, 'd> CommandIter<'a, 'd> {
    fn decode_one(&mut self) -> ZuiResult<DrawCommand<'a>> {
        let bytes = self.decoder.bytes;
        let start = self.offset;
        let op_byte = *bytes.get(start).ok_or_else(|| ZuiError::format(start, "truncated command opcode"))?;
        let op = OpCode::from_u8(op_byte).ok_or_else(|| ZuiError::format(start, format!("unknown opcode {op_byte}")))?;
        let arg_len = u16::from_le_bytes(
            bytes
                .get(start + 1..start + 3)
                .ok_or_else(|| ZuiError::format(start + 1, "truncated command arg length"))?
                .try_into()
                .unwrap(),
        ) as usize;
        let args_start = start + 3;
        let args = bytes
            .get(args_start..args_start + arg_len)
            .ok_or_else(|| ZuiError::format(args_start, "truncated command args"))?;

        let cmd = match op {
            OpCode::Clear => DrawCommand::Clear { color: read_color(args, args_start)? },
            OpCode::FillRect => {
                let (x, y, w, h) = read_rect(args, args_start)?;
                DrawCommand::FillRect { x, y, w, h, color: read_color(&args[8..], args_start + 8)? }
            }
            OpCode::DrawText => {
                let x = read_u16(args, 0, args_start)?;
                let y = read_u16(args, 2, args_start)?;
                let string_idx = read_u32(args, 4, args_start)?;
                let style_bytes =
                    args.get(8..32).ok_or_else(|| ZuiError::format(args_start + 8, "truncated style block"))?;
                let text = self.decoder.string(string_idx, args_start + 4)?;
                let style = self.decode_style(style_bytes, args_start + 8)?;
                DrawCommand::DrawText { x, y, text, style }
            }
            OpCode::DrawTextRun => {
                let x = read_u16(args, 0, args_start)?;
                let y = read_u16(args, 2, args_start)?;
                let blob_id = read_u32(args, 4, args_start)?;
                let blob = self.decoder.blob(blob_id, args_start + 4)?;
                let count = u32::from_le_bytes(
                    blob.get(0..4).ok_or_else(|| ZuiError::format(0, "truncated text-run segment count"))?.try_into().unwrap(),
                ) as usize;
                let mut segments = Vec::with_capacity(count);
                let mut cursor = 4usize;
                for _ in 0..count {
                    let seg =
                        blob.get(cursor..cursor + 28).ok_or_else(|| ZuiError::format(cursor, "truncated text-run segment"))?;
                    let text_idx = u32::from_le_bytes(seg[0..4].try_into().unwrap());
                    let style = self.decode_style(&seg[4..28], cursor + 4)?;
                    let text = self.decoder.string(text_idx, cursor)?;
                    segments.push((text, style));
                    cursor += 28;
                }
                DrawCommand::DrawTextRun { x, y, segments }
            }
            OpCode::PushClip => {
                let (x, y, w, h) = read_rect(args, args_start)?;
                DrawCommand::PushClip { x, y, w, h }
            }
            OpCode::PopClip => DrawCommand::PopClip,
            OpCode::SetCursor => {
                let x = read_u16(args, 0, args_start)?;
                let y = read_u16(args, 2, args_start)?;
                let shape_byte = *args.get(4).ok_or_else(|| ZuiError::format(args_start + 4, "truncated cursor shape"))?;
                let shape = CursorShape::from_u8(shape_byte)
                    .ok_or_else(|| ZuiError::format(args_start + 4, format!("unknown cursor shape {shape_byte}")))?;
                let visible = *args.get(5).ok_or_else(|| ZuiError::format(args_start + 5, "truncated cursor visible flag"))? != 0;
                let blink = *args.get(6).ok_or_else(|| ZuiError::format(args_start + 6, "truncated cursor blink flag"))? != 0;
                DrawCommand::SetCursor { x, y, shape, visible, blink }
            }
            OpCode::HideCursor => DrawCommand::HideCursor,
            OpCode::SetLink => {
                let uri_idx = read_u32(args, 0, args_start)?;
                let id_idx = read_u32(args, 4, args_start)?;
                let uri = if uri_idx == NO_STRING { None } else { Some(self.decoder.string(uri_idx, args_start)?) };
                let id = if id_idx == NO_STRING { None } else { Some(self.decoder.string(id_idx, args_start + 4)?) };
                DrawCommand::SetLink { uri, id }
            }
            OpCode::DrawCanvas => {
                let (x, y, w, h) = read_rect(args, args_start)?;
                let blob_id = read_u32(args, 8, args_start)?;
                let blitter_byte = *args.get(12).ok_or_else(|| ZuiError::format(args_start + 12, "truncated blitter tag"))?;
                let blitter = Blitter::from_u8(blitter_byte)
                    .ok_or_else(|| ZuiError::format(args_start + 12, format!("unknown blitter tag {blitter_byte}")))?;
                let presence = *args.get(13).ok_or_else(|| ZuiError::format(args_start + 13, "truncated presence flags"))?;
                let px_w_raw = read_u16(args, 14, args_start)?;
                let px_h_raw = read_u16(args, 16, args_start)?;
                let px_w = (presence & 0b01 != 0).then_some(px_w_raw);
                let px_h = (presence & 0b10 != 0).then_some(px_h_raw);
                let pixels = self.decoder.blob(blob_id, args_start + 8)?;
                DrawCommand::DrawCanvas { x, y, w, h, pixels, blitter, px_w, px_h }
            }
            OpCode::DrawImage => {
                let (x, y, w, h) = read_rect(args, args_start)?;
                let blob_id = read_u32(args, 8, args_start)?;
                let format_byte = *args.get(12).ok_or_else(|| ZuiError::format(args_start + 12, "truncated image format"))?;
                let format = ImageFormat::from_u8(format_byte)
                    .ok_or_else(|| ZuiError::format(args_start + 12, format!("unknown image format {format_byte}")))?;
                let protocol_byte = *args.get(13).ok_or_else(|| ZuiError::format(args_start + 13, "truncated image protocol"))?;
                let protocol = ImageProtocol::from_u8(protocol_byte)
                    .ok_or_else(|| ZuiError::format(args_start + 13, format!("unknown image protocol {protocol_byte}")))?;
                let fit_byte = *args.get(14).ok_or_else(|| ZuiError::format(args_start + 14, "truncated image fit"))?;
                let fit = ImageFit::from_u8(fit_byte)
                    .ok_or_else(|| ZuiError::format(args_start + 14, format!("unknown image fit {fit_byte}")))?;
                #[allow(clippy::cast_possible_wrap)]
                let z = *args.get(15).ok_or_else(|| ZuiError::format(args_start + 15, "truncated image z"))? as i8;
                let image_id = read_u32(args, 16, args_start)?;
                let presence = *args.get(20).ok_or_else(|| ZuiError::format(args_start + 20, "truncated presence flags"))?;
                let px_w_raw = read_u16(args, 21, args_start)?;
                let px_h_raw = read_u16(args, 23, args_start)?;
                let px_w = (presence & 0b01 != 0).then_some(px_w_raw);
                let px_h = (presence & 0b10 != 0).then_some(px_h_raw);
                let pixels = self.decoder.blob(blob_id, args_start + 8)?;
                DrawCommand::DrawImage { x, y, w, h, pixels, format, protocol, z, fit, image_id, px_w, px_h }
            }
        };

        self.offset = align8(args_start + arg_len);
        self.remaining -= 1;
        Ok(cmd)
    }

    /// Unpack a 24-byte style block, resolving its interned `link.uri`/`.id`
    /// string indices (spec §3 "background color and underline style/color
    /// are wire-level style attributes").
    fn decode_style(&self, bytes: &[u8], base_offset: usize) -> ZuiResult<TextStyle> {
        let attrs = Attrs::from_bits_truncate(read_u16(bytes, 0, base_offset)?);
        let underline_byte = *bytes.get(2).ok_or_else(|| ZuiError::format(base_offset + 2, "truncated underline style"))?;
        let underline_style = decode_underline_style(underline_byte, base_offset + 2)?;
        let presence = *bytes.get(3).ok_or_else(|| ZuiError::format(base_offset + 3, "truncated presence flags"))?;
        let color_packed = read_u32(bytes, 4, base_offset)?;
        let bg_packed = read_u32(bytes, 8, base_offset)?;
        let underline_color_packed = read_u32(bytes, 12, base_offset)?;
        let uri_idx = read_u32(bytes, 16, base_offset)?;
        let id_idx = read_u32(bytes, 20, base_offset)?;

        let color = (presence & 0b0001 != 0).then(|| color_from_packed(color_packed));
        let bg = (presence & 0b0010 != 0).then(|| color_from_packed(bg_packed));
        let underline_color = (presence & 0b0100 != 0).then(|| color_from_packed(underline_color_packed));
        let link = if presence & 0b1000 != 0 {
            let uri = self.decoder.string(uri_idx, base_offset + 16)?.to_string();
            let id = if id_idx == NO_STRING { None } else { Some(self.decoder.string(id_idx, base_offset + 20)?.to_string()) };
            Some(Link { uri, id })
        } else {
            None
        };

        Ok(TextStyle { color, bg, attrs, underline_style, underline_color, link })
    }
}

fn read_u16(args: &[u8], at: usize, base_offset: usize) -> ZuiResult<u16> {
    args.get(at..at + 2)
        .ok_or_else(|| ZuiError::format(base_offset + at, "truncated u16 field"))
        .map(|b| u16::from_le_bytes(b.try_into().unwrap()))
}

fn read_u32(args: &[u8], at: usize, base_offset: usize) -> ZuiResult<u32> {
    args.get(at..at + 4)
        .ok_or_else(|| ZuiError::format(base_offset + at, "truncated u32 field"))
        .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
}

fn read_rect(args: &[u8], base_offset: usize) -> ZuiResult<(u16, u16, u16, u16)> {
    Ok((read_u16(args, 0, base_offset)?, read_u16(args, 2, base_offset)?, read_u16(args, 4, base_offset)?, read_u16(args, 6, base_offset)?))
}

fn read_color(args: &[u8], base_offset: usize) -> ZuiResult<Color> {
    let packed = read_u32(args, 0, base_offset)?;
    Ok(color_from_packed(packed))
}

fn color_from_packed(packed: u32) -> Color {
    Color::Rgb((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

fn decode_underline_style(byte: u8, offset: usize) -> ZuiResult<UnderlineStyle> {
    Ok(match byte {
        0 => UnderlineStyle::Straight,
        1 => UnderlineStyle::Double,
        2 => UnderlineStyle::Curly,
        3 => UnderlineStyle::Dotted,
        4 => UnderlineStyle::Dashed,
        other => return Err(ZuiError::format(offset, format!("unknown underline style {other}"))),
    })
}
