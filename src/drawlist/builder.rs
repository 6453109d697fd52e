//! The sticky-error drawlist builder (spec §4.1, §4.2, §7): every mutating
//! method is infallible to call, but the first cap violation or invalid
//! argument is latched and returned from [`DrawlistBuilder::build`].

use indexmap::IndexSet;

use crate::drawlist::blitter::Blitter;
use crate::drawlist::format::{align8, CursorShape, Header, ImageFit, ImageFormat, ImageProtocol, OpCode, HEADER_LEN, MAGIC, VERSION};
use crate::error::{ZuiError, ZuiResult};
use crate::style::{Color, TextStyle, UnderlineStyle};

/// Sentinel index meaning "absent" for an optional string-arena reference
/// packed into a fixed-width field (spec §4.1 `set-link(null)`).
const NO_STRING: u32 = u32::MAX;

/// One styled segment of a text run (spec §4.1 `add-text-run-blob(segments)`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRunSegment {
    pub text: String,
    pub style: TextStyle,
}

/// Builder resource caps (spec §2.3 `RuntimeConfig`). Exceeding any of these
/// latches a `Limit` error rather than panicking or growing unbounded.
#[derive(Debug, Clone, Copy)]
pub struct DrawlistCaps {
    pub max_cmd_count: u32,
    pub max_strings: u32,
    pub max_string_bytes: u32,
    pub max_blob_bytes: u32,
    pub max_drawlist_bytes: u32,
}

impl Default for DrawlistCaps {
    fn default() -> Self {
        Self {
            max_cmd_count: 65_536,
            max_strings: 16_384,
            max_string_bytes: 4 * 1024 * 1024,
            max_blob_bytes: 16 * 1024 * 1024,
            max_drawlist_bytes: 32 * 1024 * 1024,
        }
    }
}

struct Cmd {
    op: OpCode,
    args: Vec<u8>,
}

pub struct DrawlistBuilder {
    caps: DrawlistCaps,
    frame_id: u64,
    viewport_width: u16,
    viewport_height: u16,
    cmds: Vec<Cmd>,
    strings: IndexSet<String>,
    string_bytes: u32,
    /// Content-addressed by insertion order (spec §4.1 "each call to
    /// add-blob appends a new span"); unlike `strings`, never deduplicated.
    blob_entries: Vec<Vec<u8>>,
    blob_bytes_len: u32,
    clip_depth: u32,
    sticky: Option<ZuiError>,
}

impl DrawlistBuilder {
    #[must_use]
    pub fn new(frame_id: u64, viewport_width: u16, viewport_height: u16, caps: DrawlistCaps) -> Self {
        Self {
            caps,
            frame_id,
            viewport_width,
            viewport_height,
            cmds: Vec::new(),
            strings: IndexSet::new(),
            string_bytes: 0,
            blob_entries: Vec::new(),
            blob_bytes_len: 0,
            clip_depth: 0,
            sticky: None,
        }
    }

    fn fail(&mut self, err: ZuiError) {
        if self.sticky.is_none() {
            self.sticky = Some(err);
        }
    }

    fn push_cmd(&mut self, op: OpCode, args: Vec<u8>) -> &mut Self {
        if self.sticky.is_some() {
            return self;
        }
        if self.cmds.len() as u32 >= self.caps.max_cmd_count {
            #[cfg(feature = "tracing")]
            tracing::warn!(cap = self.caps.max_cmd_count, "drawlist command count cap exceeded");
            self.fail(ZuiError::limit("drawlist command count cap exceeded"));
            return self;
        }
        self.cmds.push(Cmd { op, args });
        self
    }

    /// Intern a string, deduplicating within this frame (spec §4.2 "per-
    /// frame string interning"). Returns its arena index, stable for the
    /// life of this builder.
    fn intern(&mut self, s: &str) -> Option<u32> {
        if let Some(idx) = self.strings.get_index_of(s) {
            return u32::try_from(idx).ok();
        }
        if self.strings.len() as u32 >= self.caps.max_strings {
            #[cfg(feature = "tracing")]
            tracing::warn!(cap = self.caps.max_strings, "drawlist string table cap exceeded");
            self.fail(ZuiError::limit("drawlist string table cap exceeded"));
            return None;
        }
        if self.string_bytes + s.len() as u32 > self.caps.max_string_bytes {
            #[cfg(feature = "tracing")]
            tracing::warn!(cap = self.caps.max_string_bytes, "drawlist string arena byte cap exceeded");
            self.fail(ZuiError::limit("drawlist string arena byte cap exceeded"));
            return None;
        }
        self.string_bytes += s.len() as u32;
        let (idx, _) = self.strings.insert_full(s.to_string());
        u32::try_from(idx).ok()
    }

    #[must_use]
    pub fn clear(&mut self, color: Color) -> &mut Self {
        self.push_cmd(OpCode::Clear, color.to_packed().to_le_bytes().to_vec())
    }

    #[must_use]
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Color) -> &mut Self {
        let mut args = Vec::with_capacity(12);
        args.extend_from_slice(&x.to_le_bytes());
        args.extend_from_slice(&y.to_le_bytes());
        args.extend_from_slice(&w.to_le_bytes());
        args.extend_from_slice(&h.to_le_bytes());
        args.extend_from_slice(&color.to_packed().to_le_bytes());
        self.push_cmd(OpCode::FillRect, args)
    }

    #[must_use]
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: &TextStyle) -> &mut Self {
        let Some(string_idx) = self.intern(text) else { return self };
        let style_bytes = self.encode_style(style);
        let Some(style_bytes) = style_bytes else { return self };
        let mut args = Vec::with_capacity(8 + style_bytes.len());
        args.extend_from_slice(&x.to_le_bytes());
        args.extend_from_slice(&y.to_le_bytes());
        args.extend_from_slice(&string_idx.to_le_bytes());
        args.extend_from_slice(&style_bytes);
        self.push_cmd(OpCode::DrawText, args)
    }

    /// Append raw bytes as a new, content-addressed blob (spec §4.1
    /// `add-blob(bytes)`) and return its 0-based index.
    pub fn add_blob(&mut self, bytes: &[u8]) -> ZuiResult<u32> {
        if let Some(err) = &self.sticky {
            return Err(err.clone());
        }
        if self.blob_bytes_len as usize + bytes.len() > self.caps.max_blob_bytes as usize {
            #[cfg(feature = "tracing")]
            tracing::warn!(cap = self.caps.max_blob_bytes, "drawlist blob arena byte cap exceeded");
            let err = ZuiError::limit("drawlist blob arena byte cap exceeded");
            self.fail(err.clone());
            return Err(err);
        }
        let idx = u32::try_from(self.blob_entries.len()).map_err(|_| ZuiError::limit("blob arena exceeds addressable range"))?;
        self.blob_bytes_len += bytes.len() as u32;
        self.blob_entries.push(bytes.to_vec());
        Ok(idx)
    }

    /// Add a reusable, per-segment styled text run (spec §4.2
    /// `add-text-run-blob(segments)`) and return its blob index.
    pub fn add_text_run_blob(&mut self, segments: &[TextRunSegment]) -> ZuiResult<u32> {
        if let Some(err) = &self.sticky {
            return Err(err.clone());
        }
        let mut bytes = Vec::with_capacity(4 + segments.len() * 28);
        bytes.extend_from_slice(&(segments.len() as u32).to_le_bytes());
        for segment in segments {
            let Some(text_idx) = self.intern(&segment.text) else {
                return Err(self.sticky.clone().expect("intern failure always sets sticky"));
            };
            let Some(style_bytes) = self.encode_style(&segment.style) else {
                return Err(self.sticky.clone().expect("encode_style failure always sets sticky"));
            };
            bytes.extend_from_slice(&text_idx.to_le_bytes());
            bytes.extend_from_slice(&style_bytes);
        }
        self.add_blob(&bytes)
    }

    /// Emit a `draw-text-run(x,y,blob-id)` command referencing a blob
    /// previously returned by [`Self::add_text_run_blob`].
    #[must_use]
    pub fn draw_text_run(&mut self, x: u16, y: u16, blob_id: u32) -> &mut Self {
        let mut args = Vec::with_capacity(8);
        args.extend_from_slice(&x.to_le_bytes());
        args.extend_from_slice(&y.to_le_bytes());
        args.extend_from_slice(&blob_id.to_le_bytes());
        self.push_cmd(OpCode::DrawTextRun, args)
    }

    /// Emit a `draw-canvas` command blitting a sub-cell pixel blob (spec
    /// §4.1, §6 blitter capability order).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn draw_canvas(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        blob_id: u32,
        blitter: Blitter,
        px_w: Option<u16>,
        px_h: Option<u16>,
    ) -> &mut Self {
        let mut args = Vec::with_capacity(18);
        args.extend_from_slice(&x.to_le_bytes());
        args.extend_from_slice(&y.to_le_bytes());
        args.extend_from_slice(&w.to_le_bytes());
        args.extend_from_slice(&h.to_le_bytes());
        args.extend_from_slice(&blob_id.to_le_bytes());
        args.push(blitter as u8);
        let presence = u8::from(px_w.is_some()) | (u8::from(px_h.is_some()) << 1);
        args.push(presence);
        args.extend_from_slice(&px_w.unwrap_or(0).to_le_bytes());
        args.extend_from_slice(&px_h.unwrap_or(0).to_le_bytes());
        self.push_cmd(OpCode::DrawCanvas, args)
    }

    /// Emit a `draw-image` command (spec §4.1, §4.2 `z ∈ {-1,0,1}`).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn draw_image(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        blob_id: u32,
        format: ImageFormat,
        protocol: ImageProtocol,
        z: i8,
        fit: ImageFit,
        image_id: u32,
        px_w: Option<u16>,
        px_h: Option<u16>,
    ) -> &mut Self {
        let mut args = Vec::with_capacity(25);
        args.extend_from_slice(&x.to_le_bytes());
        args.extend_from_slice(&y.to_le_bytes());
        args.extend_from_slice(&w.to_le_bytes());
        args.extend_from_slice(&h.to_le_bytes());
        args.extend_from_slice(&blob_id.to_le_bytes());
        args.push(format as u8);
        args.push(protocol as u8);
        args.push(fit as u8);
        args.push(z as u8);
        args.extend_from_slice(&image_id.to_le_bytes());
        let presence = u8::from(px_w.is_some()) | (u8::from(px_h.is_some()) << 1);
        args.push(presence);
        args.extend_from_slice(&px_w.unwrap_or(0).to_le_bytes());
        args.extend_from_slice(&px_h.unwrap_or(0).to_le_bytes());
        self.push_cmd(OpCode::DrawImage, args)
    }

    #[must_use]
    pub fn push_clip(&mut self, x: u16, y: u16, w: u16, h: u16) -> &mut Self {
        self.clip_depth += 1;
        let mut args = Vec::with_capacity(8);
        args.extend_from_slice(&x.to_le_bytes());
        args.extend_from_slice(&y.to_le_bytes());
        args.extend_from_slice(&w.to_le_bytes());
        args.extend_from_slice(&h.to_le_bytes());
        self.push_cmd(OpCode::PushClip, args)
    }

    #[must_use]
    pub fn pop_clip(&mut self) -> &mut Self {
        if self.sticky.is_none() && self.clip_depth == 0 {
            self.fail(ZuiError::invalid_argument("pop_clip with no matching push_clip"));
            return self;
        }
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.push_cmd(OpCode::PopClip, Vec::new())
    }

    /// Emit `set-cursor(x,y,shape,visible,blink)` (spec §4.1).
    #[must_use]
    pub fn set_cursor(&mut self, x: u16, y: u16, shape: CursorShape, visible: bool, blink: bool) -> &mut Self {
        let mut args = Vec::with_capacity(7);
        args.extend_from_slice(&x.to_le_bytes());
        args.extend_from_slice(&y.to_le_bytes());
        args.push(shape as u8);
        args.push(u8::from(visible));
        args.push(u8::from(blink));
        self.push_cmd(OpCode::SetCursor, args)
    }

    #[must_use]
    pub fn hide_cursor(&mut self) -> &mut Self {
        self.push_cmd(OpCode::HideCursor, Vec::new())
    }

    /// Set (or, with `uri: None`, clear) the active link embedded into every
    /// subsequent `draw-text` style (spec §4.1 `set-link(null)`).
    #[must_use]
    pub fn set_link(&mut self, uri: Option<&str>, id: Option<&str>) -> &mut Self {
        let uri_idx = match uri {
            Some(u) => match self.intern(u) {
                Some(idx) => idx,
                None => return self,
            },
            None => NO_STRING,
        };
        let id_idx = match id {
            Some(i) => match self.intern(i) {
                Some(idx) => idx,
                None => return self,
            },
            None => NO_STRING,
        };
        let mut args = Vec::with_capacity(8);
        args.extend_from_slice(&uri_idx.to_le_bytes());
        args.extend_from_slice(&id_idx.to_le_bytes());
        self.push_cmd(OpCode::SetLink, args)
    }

    /// Reset this builder to a fresh frame: clears the command stream,
    /// string and blob arenas (a fresh string index space, spec §4.2), the
    /// clip stack, and any sticky error (spec §7 "reset clears").
    pub fn reset(&mut self) -> &mut Self {
        self.cmds.clear();
        self.strings.clear();
        self.string_bytes = 0;
        self.blob_entries.clear();
        self.blob_bytes_len = 0;
        self.clip_depth = 0;
        self.sticky = None;
        self
    }

    /// Finish the frame, failing if any `push_clip` was never matched by a
    /// `pop_clip` (spec §4.2 "clip stack must be balanced within a frame").
    pub fn build(mut self) -> ZuiResult<Vec<u8>> {
        if let Some(err) = self.sticky.take() {
            return Err(err);
        }
        if self.clip_depth != 0 {
            return Err(ZuiError::invalid_argument("unbalanced push_clip/pop_clip at end of frame"));
        }

        let mut cmd_stream = Vec::new();
        for cmd in &self.cmds {
            cmd_stream.push(cmd.op as u8);
            cmd_stream.extend_from_slice(&(cmd.args.len() as u16).to_le_bytes());
            cmd_stream.extend_from_slice(&cmd.args);
            let padded = align8(cmd_stream.len());
            cmd_stream.resize(padded, 0);
        }

        let mut string_arena = Vec::new();
        for s in &self.strings {
            string_arena.extend_from_slice(&(s.len() as u32).to_le_bytes());
            string_arena.extend_from_slice(s.as_bytes());
        }

        let mut blob_arena = Vec::new();
        for blob in &self.blob_entries {
            blob_arena.extend_from_slice(&(blob.len() as u32).to_le_bytes());
            blob_arena.extend_from_slice(blob);
        }

        let header = Header {
            magic: MAGIC,
            version: VERSION,
            flags: 0,
            frame_id: self.frame_id,
            cmd_count: self.cmds.len() as u32,
            cmd_stream_len: cmd_stream.len() as u32,
            string_arena_offset: (HEADER_LEN + cmd_stream.len()) as u32,
            string_arena_len: string_arena.len() as u32,
            blob_arena_offset: (HEADER_LEN + cmd_stream.len() + string_arena.len()) as u32,
            blob_arena_len: blob_arena.len() as u32,
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
        };

        let total_len = HEADER_LEN + cmd_stream.len() + string_arena.len() + blob_arena.len();
        if total_len as u32 > self.caps.max_drawlist_bytes {
            #[cfg(feature = "tracing")]
            tracing::warn!(cap = self.caps.max_drawlist_bytes, total_len, "total drawlist byte cap exceeded");
            return Err(ZuiError::limit("total drawlist byte cap exceeded"));
        }

        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&cmd_stream);
        out.extend_from_slice(&string_arena);
        out.extend_from_slice(&blob_arena);
        Ok(out)
    }

    /// Build into a caller-supplied buffer, reusing its allocation (spec
    /// §2.3 `reuse_output_buffer`) instead of returning a fresh `Vec`.
    pub fn build_into(self, out: &mut Vec<u8>) -> ZuiResult<()> {
        out.clear();
        out.extend_from_slice(&self.build()?);
        Ok(())
    }
}

impl DrawlistBuilder {
    /// Pack a [`TextStyle`] into its 24-byte wire form, round-tripping
    /// every field (spec §3 "background color and underline style/color are
    /// wire-level style attributes"). Interns `link.uri`/`link.id` into the
    /// same string arena `draw-text`'s own text uses. Returns `None` (with
    /// `self.sticky` set) if interning failed under a cap.
    fn encode_style(&mut self, style: &TextStyle) -> Option<[u8; 24]> {
        let mut presence = 0u8;
        if style.color.is_some() {
            presence |= 0b0001;
        }
        if style.bg.is_some() {
            presence |= 0b0010;
        }
        if style.underline_color.is_some() {
            presence |= 0b0100;
        }
        if style.link.is_some() {
            presence |= 0b1000;
        }

        let (uri_idx, id_idx) = match &style.link {
            Some(link) => {
                let uri_idx = self.intern(&link.uri)?;
                let id_idx = match &link.id {
                    Some(id) => self.intern(id)?,
                    None => NO_STRING,
                };
                (uri_idx, id_idx)
            }
            None => (NO_STRING, NO_STRING),
        };

        let mut out = [0u8; 24];
        out[0..2].copy_from_slice(&style.attrs.bits().to_le_bytes());
        out[2] = encode_underline_style(style.underline_style);
        out[3] = presence;
        out[4..8].copy_from_slice(&style.color.map_or(0, Color::to_packed).to_le_bytes());
        out[8..12].copy_from_slice(&style.bg.map_or(0, Color::to_packed).to_le_bytes());
        out[12..16].copy_from_slice(&style.underline_color.map_or(0, Color::to_packed).to_le_bytes());
        out[16..20].copy_from_slice(&uri_idx.to_le_bytes());
        out[20..24].copy_from_slice(&id_idx.to_le_bytes());
        Some(out)
    }
}

fn encode_underline_style(style: UnderlineStyle) -> u8 {
    match style {
        UnderlineStyle::Straight => 0,
        UnderlineStyle::Double => 1,
        UnderlineStyle::Curly => 2,
        UnderlineStyle::Dotted => 3,
        UnderlineStyle::Dashed => 4,
    }
}
