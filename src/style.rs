//! Style and layout-attribute vocabulary shared by vnodes, the layout engine
//! and the drawlist painters (spec §3, §4.3, §4.4).

use bitflags::bitflags;

/// A packed 24-bit RGB color, or the terminal's default foreground/background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Pack to 24-bit RGB, resolving named colors to their ANSI RGB triple.
    #[must_use]
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Default => (0, 0, 0),
            Self::Black => (0, 0, 0),
            Self::Red => (205, 49, 49),
            Self::Green => (13, 188, 121),
            Self::Yellow => (229, 229, 16),
            Self::Blue => (36, 114, 200),
            Self::Magenta => (188, 63, 188),
            Self::Cyan => (17, 168, 205),
            Self::White => (229, 229, 229),
            Self::Rgb(r, g, b) => (r, g, b),
        }
    }

    #[must_use]
    pub fn to_packed(self) -> u32 {
        let (r, g, b) = self.to_rgb();
        (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }
}

bitflags! {
    /// Boolean style attribute bits (spec §3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u16 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE   = 1 << 4;
        const STRIKE    = 1 << 5;
        const OVERLINE  = 1 << 6;
        const BLINK     = 1 << 7;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnderlineStyle {
    #[default]
    Straight,
    Double,
    Curly,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Single,
    Rounded,
    Double,
}

impl BorderStyle {
    /// All border styles (including `None`) consume exactly zero or one
    /// cell per edge (spec §4.3 step 1).
    #[must_use]
    pub fn cells(self) -> u16 {
        if matches!(self, Self::None) {
            0
        } else {
            1
        }
    }

    /// `(top-left, top-right, bottom-left, bottom-right, horizontal, vertical)`.
    #[must_use]
    pub fn glyphs(self) -> Option<BorderGlyphs> {
        match self {
            Self::None => None,
            Self::Single => Some(BorderGlyphs { tl: '┌', tr: '┐', bl: '└', br: '┘', h: '─', v: '│' }),
            Self::Rounded => Some(BorderGlyphs { tl: '╭', tr: '╮', bl: '╰', br: '╯', h: '─', v: '│' }),
            Self::Double => Some(BorderGlyphs { tl: '╔', tr: '╗', bl: '╚', br: '╝', h: '═', v: '║' }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub tl: char,
    pub tr: char,
    pub bl: char,
    pub br: char,
    pub h: char,
    pub v: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlignItems {
    #[default]
    Stretch,
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JustifyContent {
    #[default]
    Start,
    Center,
    Between,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
}

/// A layout size: an explicit cell count, a flex-computed auto size, or a
/// percentage of the parent's content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Auto,
    Length(f32),
    Percent(f32),
}

impl Default for Dimension {
    fn default() -> Self {
        Self::Auto
    }
}

/// Uniform or per-axis padding, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Padding {
    #[must_use]
    pub fn all(v: u16) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    #[must_use]
    pub fn symmetric(px: u16, py: u16) -> Self {
        Self { top: py, right: px, bottom: py, left: px }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shadow {
    #[default]
    None,
    Drop,
}

/// Text presentation: color, attributes, underline and an optional embedded
/// hyperlink (spec §4.1 "the active link is embedded into every subsequent
/// draw-text style").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub color: Option<Color>,
    pub bg: Option<Color>,
    pub attrs: Attrs,
    pub underline_style: UnderlineStyle,
    pub underline_color: Option<Color>,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub uri: String,
    pub id: Option<String>,
}

impl TextStyle {
    #[must_use]
    pub fn color(mut self, c: Color) -> Self {
        self.color = Some(c);
        self
    }

    #[must_use]
    pub fn bg(mut self, c: Color) -> Self {
        self.bg = Some(c);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.attrs.insert(Attrs::BOLD);
        self
    }

    #[must_use]
    pub fn dim(mut self) -> Self {
        self.attrs.insert(Attrs::DIM);
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.attrs.insert(Attrs::ITALIC);
        self
    }

    #[must_use]
    pub fn underline(mut self) -> Self {
        self.attrs.insert(Attrs::UNDERLINE);
        self
    }
}
