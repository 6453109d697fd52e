//! A scrolling message list, built the same way the teacher's own
//! Codex-UX `ChatView` composes plain `Box`/`Text` nodes (spec §3
//! Supplemented features: components module).

use smartstring::alias::String as SmartString;

use crate::style::Color;
use crate::vnode::builder::{ColumnNode, NodeBuilderMut, TextNode};
use crate::vnode::VNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Self::User => Color::Cyan,
            Self::Assistant => Color::Green,
            Self::System => Color::Rgb(128, 128, 128),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: SmartString,
    pub timestamp: Option<String>,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<SmartString>) -> Self {
        Self { role, content: content.into(), timestamp: None }
    }

    #[must_use]
    pub fn timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = Some(ts.into());
        self
    }
}

/// Builds a vertically stacked, optionally scroll-windowed message list.
/// Scrolling here is a pure slice over `messages` (spec §4.8 covers live
/// scroll *routing*; a static builder just needs the resulting window).
#[derive(Debug, Clone, Default)]
pub struct ChatView {
    messages: Vec<ChatMessage>,
    show_timestamps: bool,
    max_visible: Option<usize>,
    scroll_offset: usize,
}

impl ChatView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    #[must_use]
    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    #[must_use]
    pub fn show_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    #[must_use]
    pub fn max_visible(mut self, max: usize) -> Self {
        self.max_visible = Some(max);
        self
    }

    #[must_use]
    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        let start = self.scroll_offset.min(self.messages.len());
        let end = self.max_visible.map_or(self.messages.len(), |n| (start + n).min(self.messages.len()));
        let rows = self.messages[start..end]
            .iter()
            .map(|msg| {
                let mut line = format!("{}: {}", msg.role.label(), msg.content);
                if self.show_timestamps {
                    if let Some(ts) = &msg.timestamp {
                        line = format!("[{ts}] {line}");
                    }
                }
                TextNode::new(line).color(msg.role.color()).build()
            })
            .collect();
        ColumnNode::new().children(rows).build()
    }
}
