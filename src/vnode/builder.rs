//! Fluent builders over [`VNode`], grounded in the teacher's
//! `BoxNode`/`TextNode`-style node builders (its `tests/integration.rs` and
//! `tests/codex_integration.rs` construct trees this way rather than
//! literal struct syntax).

use smallvec::SmallVec;
use smartstring::alias::String as SmartString;

use crate::style::{AlignItems, BorderStyle, Color, Dimension, FlexDirection, JustifyContent, Overflow, Padding, TextStyle};
use crate::vnode::{
    Appearance, CompositeRender, DropdownPayload, Key, LayoutAttrs, Payload, SeriesPayload, TablePayload, TreePayload, VNode, WidgetKind,
};
use crate::widget::Composite;

/// Build a composite [`VNode`]: `widget.render(&props, ..)` is invoked
/// lazily by [`crate::commit::Reconciler`] once it has a hook context for
/// this position in the tree (spec §4.5).
#[must_use]
pub fn composite<C>(widget: std::rc::Rc<C>, props: C::Props, key: Option<Key>) -> VNode
where
    C: Composite + 'static,
    C::Props: 'static,
{
    let name = Composite::name(&*widget);
    let render: CompositeRender = std::rc::Rc::new(move |hooks| widget.render(&props, hooks));
    let mut node = VNode::new(WidgetKind::Composite);
    node.key = key;
    node.payload = Payload::Composite { name, render };
    node
}

/// Shared layout/appearance setters, implemented once and mixed into every
/// concrete builder below via the blanket impl on [`NodeBuilderMut`].
pub trait NodeBuilderMut: Sized {
    fn node_mut(&mut self) -> &mut VNode;

    #[must_use]
    fn width(mut self, w: impl Into<Dimension>) -> Self {
        self.node_mut().layout.width = w.into();
        self
    }

    #[must_use]
    fn height(mut self, h: impl Into<Dimension>) -> Self {
        self.node_mut().layout.height = h.into();
        self
    }

    #[must_use]
    fn grow(mut self, g: f32) -> Self {
        self.node_mut().layout.grow = g;
        self
    }

    #[must_use]
    fn shrink(mut self, s: f32) -> Self {
        self.node_mut().layout.shrink = s;
        self
    }

    #[must_use]
    fn padding(mut self, p: Padding) -> Self {
        self.node_mut().layout.padding = p;
        self
    }

    #[must_use]
    fn border(mut self, b: BorderStyle) -> Self {
        self.node_mut().layout.border = b;
        self
    }

    #[must_use]
    fn gap(mut self, g: u16) -> Self {
        self.node_mut().layout.gap = g;
        self
    }

    #[must_use]
    fn align_items(mut self, a: AlignItems) -> Self {
        self.node_mut().layout.align_items = a;
        self
    }

    #[must_use]
    fn justify_content(mut self, j: JustifyContent) -> Self {
        self.node_mut().layout.justify_content = j;
        self
    }

    #[must_use]
    fn overflow(mut self, o: Overflow) -> Self {
        self.node_mut().layout.overflow = o;
        self
    }

    #[must_use]
    fn color(mut self, c: Color) -> Self {
        self.node_mut().appearance.text_style.color = Some(c);
        self
    }

    #[must_use]
    fn bg(mut self, c: Color) -> Self {
        self.node_mut().appearance.text_style.bg = Some(c);
        self
    }

    #[must_use]
    fn text_style(mut self, s: TextStyle) -> Self {
        self.node_mut().appearance.text_style = s;
        self
    }

    #[must_use]
    fn key(mut self, k: impl Into<Key>) -> Self {
        self.node_mut().key = Some(k.into());
        self
    }
}

impl From<u16> for Dimension {
    fn from(v: u16) -> Self {
        Dimension::Length(f32::from(v))
    }
}

macro_rules! declare_builder {
    ($name:ident, $kind:expr) => {
        pub struct $name(VNode);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(VNode::new($kind))
            }

            #[must_use]
            pub fn build(self) -> VNode {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl NodeBuilderMut for $name {
            fn node_mut(&mut self) -> &mut VNode {
                &mut self.0
            }
        }
    };
}

declare_builder!(BoxNode, WidgetKind::Box);
declare_builder!(RowNode, WidgetKind::Row);
declare_builder!(ColumnNode, WidgetKind::Column);
declare_builder!(ModalNode, WidgetKind::Modal);
declare_builder!(LayersNode, WidgetKind::Layers);

impl BoxNode {
    #[must_use]
    pub fn children(mut self, children: Vec<VNode>) -> Self {
        self.0.children = children;
        self
    }
}

impl RowNode {
    #[must_use]
    pub fn children(mut self, children: Vec<VNode>) -> Self {
        self.0.layout.direction = FlexDirection::Row;
        self.0.children = children;
        self
    }
}

impl ColumnNode {
    #[must_use]
    pub fn children(mut self, children: Vec<VNode>) -> Self {
        self.0.layout.direction = FlexDirection::Column;
        self.0.children = children;
        self
    }
}

impl ModalNode {
    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.0.payload = Payload::Modal { open, closable: true };
        self
    }

    #[must_use]
    pub fn closable(mut self, closable: bool) -> Self {
        if let Payload::Modal { open, .. } = self.0.payload {
            self.0.payload = Payload::Modal { open, closable };
        } else {
            self.0.payload = Payload::Modal { open: true, closable };
        }
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<VNode>) -> Self {
        self.0.children = children;
        self
    }
}

impl LayersNode {
    #[must_use]
    pub fn layers(mut self, layers: Vec<VNode>) -> Self {
        self.0.children = layers;
        self
    }
}

pub struct TextNode(VNode);

impl TextNode {
    #[must_use]
    pub fn new(content: impl Into<SmartString>) -> Self {
        let mut node = VNode::new(WidgetKind::Text);
        node.payload = Payload::Text { content: content.into() };
        Self(node)
    }

    #[must_use]
    pub fn build(self) -> VNode {
        self.0
    }
}

impl NodeBuilderMut for TextNode {
    fn node_mut(&mut self) -> &mut VNode {
        &mut self.0
    }
}

pub struct ButtonNode(VNode);

impl ButtonNode {
    #[must_use]
    pub fn new(label: impl Into<SmartString>) -> Self {
        let mut node = VNode::new(WidgetKind::Button);
        node.payload = Payload::Button { label: label.into(), disabled: false };
        Self(node)
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        if let Payload::Button { label, .. } = &self.0.payload {
            let label = label.clone();
            self.0.payload = Payload::Button { label, disabled };
        }
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        self.0
    }
}

impl NodeBuilderMut for ButtonNode {
    fn node_mut(&mut self) -> &mut VNode {
        &mut self.0
    }
}

pub struct InputNode(VNode);

impl InputNode {
    #[must_use]
    pub fn new(value: impl Into<SmartString>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        let mut node = VNode::new(WidgetKind::Input);
        node.payload = Payload::Input { value, cursor, placeholder: None };
        Self(node)
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<SmartString>) -> Self {
        if let Payload::Input { value, cursor, .. } = &self.0.payload {
            let (value, cursor) = (value.clone(), *cursor);
            self.0.payload = Payload::Input { value, cursor, placeholder: Some(placeholder.into()) };
        }
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        self.0
    }
}

impl NodeBuilderMut for InputNode {
    fn node_mut(&mut self) -> &mut VNode {
        &mut self.0
    }
}

pub struct TableNode(VNode);

impl TableNode {
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = impl Into<SmartString>>, rows: usize) -> Self {
        let mut node = VNode::new(WidgetKind::Table);
        node.payload = Payload::Table(TablePayload {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
            sort_column: None,
            sort_ascending: true,
            selected_row: None,
            scroll_offset: 0,
        });
        Self(node)
    }

    #[must_use]
    pub fn sort_by(mut self, column: usize, ascending: bool) -> Self {
        if let Payload::Table(table) = &mut self.0.payload {
            table.sort_column = Some(column);
            table.sort_ascending = ascending;
        }
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        self.0
    }
}

impl NodeBuilderMut for TableNode {
    fn node_mut(&mut self) -> &mut VNode {
        &mut self.0
    }
}

pub struct TreeNode(VNode);

impl TreeNode {
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        let mut node = VNode::new(WidgetKind::Tree);
        node.payload = Payload::Tree(TreePayload { expanded: smallvec::smallvec![false; node_count], selected: None });
        Self(node)
    }

    #[must_use]
    pub fn expanded(mut self, expanded: impl IntoIterator<Item = bool>) -> Self {
        if let Payload::Tree(tree) = &mut self.0.payload {
            tree.expanded = expanded.into_iter().collect();
        }
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<VNode>) -> Self {
        self.0.children = children;
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        self.0
    }
}

impl NodeBuilderMut for TreeNode {
    fn node_mut(&mut self) -> &mut VNode {
        &mut self.0
    }
}

pub struct ToastContainerNode(VNode);

impl ToastContainerNode {
    #[must_use]
    pub fn new(max_visible: usize) -> Self {
        let mut node = VNode::new(WidgetKind::ToastContainer);
        node.payload = Payload::ToastContainer { max_visible, messages: SmallVec::new() };
        Self(node)
    }

    #[must_use]
    pub fn messages(mut self, messages: impl IntoIterator<Item = impl Into<SmartString>>) -> Self {
        if let Payload::ToastContainer { messages: slot, .. } = &mut self.0.payload {
            *slot = messages.into_iter().map(Into::into).collect();
        }
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        self.0
    }
}

impl NodeBuilderMut for ToastContainerNode {
    fn node_mut(&mut self) -> &mut VNode {
        &mut self.0
    }
}

pub struct DropdownNode(VNode);

impl DropdownNode {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = impl Into<SmartString>>) -> Self {
        let items: SmallVec<[SmartString; 8]> = items.into_iter().map(Into::into).collect();
        let disabled = smallvec::smallvec![false; items.len()];
        let mut node = VNode::new(WidgetKind::Dropdown);
        node.payload = Payload::Dropdown(DropdownPayload { open: false, items, disabled, dividers_after: SmallVec::new(), selected: None });
        Self(node)
    }

    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        if let Payload::Dropdown(d) = &mut self.0.payload {
            d.open = open;
        }
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        self.0
    }
}

impl NodeBuilderMut for DropdownNode {
    fn node_mut(&mut self) -> &mut VNode {
        &mut self.0
    }
}

pub struct SparkLineNode(VNode);

impl SparkLineNode {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        let mut node = VNode::new(WidgetKind::SparkLine);
        node.payload = Payload::Series(SeriesPayload { values: values.into_iter().collect(), min: None, max: None });
        Self(node)
    }

    #[must_use]
    pub fn build(self) -> VNode {
        self.0
    }
}

impl NodeBuilderMut for SparkLineNode {
    fn node_mut(&mut self) -> &mut VNode {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_node_children_and_layout() {
        let node = BoxNode::new().width(10u16).gap(1).children(vec![TextNode::new("hi").build()]).build();
        assert_eq!(node.kind, WidgetKind::Box);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.layout.width, Dimension::Length(10.0));
    }

    #[test]
    fn input_node_cursor_defaults_to_end() {
        let node = InputNode::new("abc").build();
        let Payload::Input { cursor, .. } = node.payload else { panic!("expected Input payload") };
        assert_eq!(cursor, 3);
    }

    #[test]
    fn button_node_disabled() {
        let node = ButtonNode::new("ok").disabled(true).build();
        let Payload::Button { disabled, .. } = node.payload else { panic!("expected Button payload") };
        assert!(disabled);
    }
}
