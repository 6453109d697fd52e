//! A status line with an animated spinner, implemented as a real composite
//! so it exercises `useState` the way application code would (spec §3
//! Supplemented features: "`useState` (`StatusBar` spinner tick)").

use crate::instance::hooks::Hooks;
use crate::style::Color;
use crate::vnode::builder::{composite, NodeBuilderMut, RowNode, TextNode};
use crate::vnode::{Key, VNode};
use crate::widget::Composite;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusState {
    #[default]
    Idle,
    Thinking,
    Executing,
    Error,
}

impl StatusState {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Thinking | Self::Executing)
    }

    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Self::Idle => Color::Green,
            Self::Thinking => Color::Yellow,
            Self::Executing => Color::Blue,
            Self::Error => Color::Red,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Thinking => "Thinking",
            Self::Executing => "Executing",
            Self::Error => "Error",
        }
    }

    #[must_use]
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Idle => "●",
            Self::Thinking | Self::Executing => "◐",
            Self::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusBarProps {
    pub state: StatusState,
    pub message: String,
}

impl Default for StatusBarProps {
    fn default() -> Self {
        Self { state: StatusState::Idle, message: "Ready".to_string() }
    }
}

pub struct StatusBar;

impl Composite for StatusBar {
    type Props = StatusBarProps;

    fn render(&self, props: &Self::Props, hooks: &mut Hooks<'_>) -> crate::error::ZuiResult<VNode> {
        // Every render of an active status bar advances the spinner by one
        // frame; an idle/error bar holds its setter without calling it.
        let (frame, set_frame) = hooks.use_state(|| 0u32)?;
        if props.state.is_active() {
            set_frame.update(|f| f.wrapping_add(1));
        }
        let glyph = if props.state.is_active() {
            SPINNER_FRAMES[(frame as usize) % SPINNER_FRAMES.len()]
        } else {
            props.state.indicator()
        };
        Ok(RowNode::new()
            .gap(1)
            .children(vec![
                TextNode::new(glyph).color(props.state.color()).build(),
                TextNode::new(props.state.label()).color(props.state.color()).build(),
                TextNode::new(props.message.clone()).build(),
            ])
            .build())
    }

    fn name(&self) -> &'static str {
        "StatusBar"
    }
}

/// Build a `StatusBar` composite vnode with the given props and an optional
/// reconciliation key (use a key when more than one status bar is mounted
/// side by side, e.g. per-pane).
#[must_use]
pub fn status_bar(props: StatusBarProps, key: Option<Key>) -> VNode {
    composite(std::rc::Rc::new(StatusBar), props, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_colors_labels_and_indicators() {
        assert_eq!(StatusState::Idle.color(), Color::Green);
        assert_eq!(StatusState::Thinking.color(), Color::Yellow);
        assert_eq!(StatusState::Executing.color(), Color::Blue);
        assert_eq!(StatusState::Error.color(), Color::Red);
        assert_eq!(StatusState::Idle.label(), "Ready");
        assert_eq!(StatusState::Error.indicator(), "✗");
        assert!(StatusState::Thinking.is_active());
        assert!(!StatusState::Idle.is_active());
    }

    #[test]
    fn default_props_are_idle_and_ready() {
        let props = StatusBarProps::default();
        assert_eq!(props.state, StatusState::Idle);
        assert_eq!(props.message, "Ready");
    }
}
