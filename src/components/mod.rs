//! A small library of composite widgets (spec §3 Supplemented features).
//! Built as ordinary vnodes/composites using only the public builder and
//! hook APIs — the runtime does not special-case anything in this module.

pub mod chat;
pub mod diff;
pub mod heatmap;
pub mod markdown;
pub mod progress;
pub mod sparkline;
pub mod status_bar;

pub use chat::{ChatMessage, ChatView, MessageRole};
pub use diff::{DiffLine, DiffLineKind, DiffView};
pub use heatmap::Heatmap;
pub use markdown::{markdown, Markdown, MarkdownProps};
pub use progress::Progress;
pub use sparkline::Sparkline;
pub use status_bar::{status_bar, StatusBar, StatusBarProps, StatusState};
