//! The binary "ZRDL" drawlist codec (spec §4.2 Drawlist Codec, §6, §7).

pub mod blitter;
pub mod builder;
pub mod decoder;
pub mod format;

pub use blitter::Blitter;
pub use builder::{DrawlistBuilder, DrawlistCaps};
pub use decoder::{DrawCommand, Decoder};
pub use format::{Header, OpCode};
