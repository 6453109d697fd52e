//! `hbox!` / `vbox!` / `text!` — the teacher's own macro surface
//! (`tests/integration.rs::test_macro_node_creation`), generalized across
//! the full widget-kind set's container variants.

/// Build a [`crate::vnode::VNode`] row (`WidgetKind::Row`) from a list of
/// child expressions, each already a `VNode`.
#[macro_export]
macro_rules! hbox {
    ($($child:expr),* $(,)?) => {
        $crate::vnode::builder::RowNode::new().children(vec![$($child),*]).build()
    };
}

/// Build a [`crate::vnode::VNode`] column (`WidgetKind::Column`).
#[macro_export]
macro_rules! vbox {
    ($($child:expr),* $(,)?) => {
        $crate::vnode::builder::ColumnNode::new().children(vec![$($child),*]).build()
    };
}

/// Build a [`crate::vnode::VNode`] text leaf from a format string, as
/// `format!` would.
#[macro_export]
macro_rules! text {
    ($fmt:expr $(, $arg:expr)*) => {
        $crate::vnode::builder::TextNode::new(format!($fmt $(, $arg)*)).build()
    };
}

#[cfg(test)]
mod tests {
    use crate::vnode::WidgetKind;

    #[test]
    fn hbox_and_vbox_build_rows_and_columns() {
        let row = hbox![text!("a"), text!("b")];
        assert_eq!(row.kind, WidgetKind::Row);
        assert_eq!(row.children.len(), 2);

        let column = vbox![text!("a")];
        assert_eq!(column.kind, WidgetKind::Column);
    }

    #[test]
    fn text_macro_formats_like_format() {
        let node = text!("count: {}", 3);
        let crate::vnode::Payload::Text { content } = node.payload else { panic!("expected Text payload") };
        assert_eq!(content, "count: 3");
    }
}
