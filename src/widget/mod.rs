//! The widget trait for composite widgets, plus intrinsic text measurement
//! (spec §3 "closed tagged union plus a painter table keyed by tag", §4.4).

pub mod measure;

use crate::error::ZuiResult;
use crate::instance::hooks::Hooks;
use crate::vnode::VNode;

/// A composite widget: a function from props to a [`VNode`] subtree, given
/// access to the hook API. Implemented by the [`crate::components`] library
/// and by host application code; the runtime only ever calls this through
/// [`crate::commit::Reconciler`].
pub trait Composite {
    type Props;

    fn render(&self, props: &Self::Props, hooks: &mut Hooks<'_>) -> ZuiResult<VNode>;

    /// A stable name used in diagnostics (`FatalEvent`, tracing spans) and
    /// as the `Payload::Composite` tag. Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Type-erased entry point [`crate::commit::Reconciler`] actually calls;
/// every `Composite` gets this for free.
pub(crate) trait ErasedComposite {
    fn render_erased(&self, props: &dyn std::any::Any, hooks: &mut Hooks<'_>) -> ZuiResult<VNode>;
    fn name(&self) -> &'static str;
}

impl<C: Composite> ErasedComposite for C
where
    C::Props: 'static,
{
    fn render_erased(&self, props: &dyn std::any::Any, hooks: &mut Hooks<'_>) -> ZuiResult<VNode> {
        let props = props.downcast_ref::<C::Props>().expect("composite props type mismatch");
        self.render(props, hooks)
    }

    fn name(&self) -> &'static str {
        Composite::name(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::WidgetKind;

    struct Greeter;

    impl Composite for Greeter {
        type Props = String;

        fn render(&self, props: &Self::Props, _hooks: &mut Hooks<'_>) -> ZuiResult<VNode> {
            Ok(crate::vnode::builder::TextNode::new(format!("hi {props}")).build())
        }

        fn name(&self) -> &'static str {
            "Greeter"
        }
    }

    #[test]
    fn composite_name_is_stable() {
        assert_eq!(Greeter.name(), "Greeter");
        let node = crate::vnode::VNode::new(WidgetKind::Text);
        assert_eq!(node.kind, WidgetKind::Text);
    }
}
