//! The immutable per-render widget tree (spec §3 "VNode", §4.4 Widget
//! Model). A [`VNode`] is produced fresh every render by application code
//! (directly, via [`builder`] types, or via the [`crate::hbox`] /
//! [`crate::vbox`] / [`crate::text`] macros); [`crate::instance`] is the
//! mutable runtime mirror reconciled against it.

pub mod builder;
pub mod macros;

use smallvec::SmallVec;
use smartstring::alias::String as SmartString;

use crate::style::{AlignItems, BorderStyle, Dimension, FlexDirection, JustifyContent, Overflow, Padding, Shadow, TextStyle};

/// Explicit reconciliation key (spec §4.5). Plain `u64`/`String` keys cover
/// the common "stable id" and "stable string" cases without forcing an
/// allocation for integer keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(u64),
    Str(SmartString),
}

impl From<u64> for Key {
    fn from(v: u64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Self::Str(SmartString::from(v))
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Self::Str(SmartString::from(v))
    }
}

/// The closed set of widget kinds (spec §3). A child's kind is part of its
/// reconciliation identity: an instance is never reused across kinds even
/// if its key matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Text,
    Row,
    Column,
    Box,
    Button,
    Input,
    Table,
    Tree,
    Modal,
    ToastContainer,
    Dropdown,
    CommandPalette,
    Layers,
    LineChart,
    Scatter,
    Heatmap,
    BarChart,
    SparkLine,
    Canvas,
    Image,
    /// A user-defined composite widget; `render` is invoked with the hook
    /// context to produce the vnode it stands for (spec §4.5).
    Composite,
}

/// Shared layout attributes every vnode carries, independent of kind (spec
/// §4.3 step 1).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutAttrs {
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub min_height: Dimension,
    pub max_width: Dimension,
    pub max_height: Dimension,
    pub grow: f32,
    pub shrink: f32,
    pub direction: FlexDirection,
    pub align_items: AlignItems,
    pub justify_content: JustifyContent,
    pub wrap: bool,
    pub gap: u16,
    pub padding: Padding,
    pub border: BorderStyle,
    pub overflow: Overflow,
}

/// Shared presentation attributes (spec §4.1, §4.3).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Appearance {
    pub text_style: TextStyle,
    pub shadow: Shadow,
}

/// A composite's render thunk: already bound to its props via closure
/// capture, it only needs a hook context to produce the subtree it stands
/// for (spec §4.5). Reconciliation identity for composites is `(name,
/// key-or-positional-index)`, same as any other kind; the thunk itself is
/// never compared.
pub type CompositeRender = std::rc::Rc<dyn Fn(&mut crate::instance::hooks::Hooks<'_>) -> crate::error::ZuiResult<VNode>>;

/// Kind-specific payload. Primitive kinds that carry no extra data beyond
/// children + attrs (e.g. `Row`/`Column`/`Box`/`Layers`) have no payload
/// variant; their data lives entirely in the shared fields. `Composite`'s
/// render thunk is neither comparable nor printable, so `Payload` implements
/// `Debug`/`PartialEq` by hand instead of deriving them.
#[derive(Clone)]
pub enum Payload {
    None,
    Text { content: SmartString },
    Button { label: SmartString, disabled: bool },
    Input { value: SmartString, cursor: usize, placeholder: Option<SmartString> },
    Table(TablePayload),
    Tree(TreePayload),
    Modal { open: bool, closable: bool },
    /// `messages` is the full queue in arrival order; the painter clamps
    /// what it draws to `max_visible` (spec §8 scenario 5).
    ToastContainer { max_visible: usize, messages: SmallVec<[SmartString; 8]> },
    Dropdown(DropdownPayload),
    CommandPalette { query: SmartString, items: SmallVec<[SmartString; 8]> },
    Series(SeriesPayload),
    Canvas { cell_width: u16, cell_height: u16 },
    Image { cell_width: u16, cell_height: u16, blob_ref: usize },
    Composite { name: &'static str, render: CompositeRender },
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Text { content } => f.debug_struct("Text").field("content", content).finish(),
            Self::Button { label, disabled } => f.debug_struct("Button").field("label", label).field("disabled", disabled).finish(),
            Self::Input { value, cursor, placeholder } => {
                f.debug_struct("Input").field("value", value).field("cursor", cursor).field("placeholder", placeholder).finish()
            }
            Self::Table(t) => f.debug_tuple("Table").field(t).finish(),
            Self::Tree(t) => f.debug_tuple("Tree").field(t).finish(),
            Self::Modal { open, closable } => f.debug_struct("Modal").field("open", open).field("closable", closable).finish(),
            Self::ToastContainer { max_visible, messages } => {
                f.debug_struct("ToastContainer").field("max_visible", max_visible).field("messages", messages).finish()
            }
            Self::Dropdown(d) => f.debug_tuple("Dropdown").field(d).finish(),
            Self::CommandPalette { query, items } => f.debug_struct("CommandPalette").field("query", query).field("items", items).finish(),
            Self::Series(s) => f.debug_tuple("Series").field(s).finish(),
            Self::Canvas { cell_width, cell_height } => {
                f.debug_struct("Canvas").field("cell_width", cell_width).field("cell_height", cell_height).finish()
            }
            Self::Image { cell_width, cell_height, blob_ref } => f
                .debug_struct("Image")
                .field("cell_width", cell_width)
                .field("cell_height", cell_height)
                .field("blob_ref", blob_ref)
                .finish(),
            Self::Composite { name, .. } => f.debug_struct("Composite").field("name", name).finish(),
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Text { content: a }, Self::Text { content: b }) => a == b,
            (Self::Button { label: la, disabled: da }, Self::Button { label: lb, disabled: db }) => la == lb && da == db,
            (
                Self::Input { value: va, cursor: ca, placeholder: pa },
                Self::Input { value: vb, cursor: cb, placeholder: pb },
            ) => va == vb && ca == cb && pa == pb,
            (Self::Table(a), Self::Table(b)) => a == b,
            (Self::Tree(a), Self::Tree(b)) => a == b,
            (Self::Modal { open: oa, closable: ca }, Self::Modal { open: ob, closable: cb }) => oa == ob && ca == cb,
            (
                Self::ToastContainer { max_visible: a, messages: ma },
                Self::ToastContainer { max_visible: b, messages: mb },
            ) => a == b && ma == mb,
            (Self::Dropdown(a), Self::Dropdown(b)) => a == b,
            (Self::CommandPalette { query: qa, items: ia }, Self::CommandPalette { query: qb, items: ib }) => qa == qb && ia == ib,
            (Self::Series(a), Self::Series(b)) => a == b,
            (Self::Canvas { cell_width: wa, cell_height: ha }, Self::Canvas { cell_width: wb, cell_height: hb }) => wa == wb && ha == hb,
            (
                Self::Image { cell_width: wa, cell_height: ha, blob_ref: ba },
                Self::Image { cell_width: wb, cell_height: hb, blob_ref: bb },
            ) => wa == wb && ha == hb && ba == bb,
            (Self::Composite { name: a, render: ra }, Self::Composite { name: b, render: rb }) => a == b && std::rc::Rc::ptr_eq(ra, rb),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePayload {
    pub columns: SmallVec<[SmartString; 8]>,
    pub rows: usize,
    pub sort_column: Option<usize>,
    pub sort_ascending: bool,
    pub selected_row: Option<usize>,
    pub scroll_offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreePayload {
    pub expanded: SmallVec<[bool; 8]>,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownPayload {
    pub open: bool,
    pub items: SmallVec<[SmartString; 8]>,
    pub disabled: SmallVec<[bool; 8]>,
    pub dividers_after: SmallVec<[usize; 4]>,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPayload {
    pub values: SmallVec<[f32; 16]>,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

/// One node of the immutable render tree.
#[derive(Debug, Clone, PartialEq)]
pub struct VNode {
    pub kind: WidgetKind,
    /// Stable tree-wide identity, distinct from `key`'s per-sibling
    /// reconciliation role (spec §3 "every instance with id is unique within
    /// a committed tree").
    pub id: Option<SmartString>,
    pub key: Option<Key>,
    pub layout: LayoutAttrs,
    pub appearance: Appearance,
    pub payload: Payload,
    pub children: Vec<VNode>,
}

impl VNode {
    #[must_use]
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            id: None,
            key: None,
            layout: LayoutAttrs::default(),
            appearance: Appearance::default(),
            payload: Payload::None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl AsRef<str>) -> Self {
        self.id = Some(SmartString::from(id.as_ref()));
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<VNode>) -> Self {
        self.children = children;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_conversions() {
        assert_eq!(Key::from(7u64), Key::Int(7));
        assert_eq!(Key::from("row"), Key::Str(SmartString::from("row")));
    }

    #[test]
    fn new_node_has_empty_children_and_no_key() {
        let node = VNode::new(WidgetKind::Box);
        assert!(node.children.is_empty());
        assert_eq!(node.key, None);
    }
}
