//! `zui`: a retained-mode terminal UI runtime.
//!
//! Application code builds a tree of [`vnode::VNode`]s every render;
//! [`commit::Reconciler`] diffs that tree against the mutable
//! [`instance::InstanceTree`] from the previous frame, [`layout::LayoutEngine`]
//! resolves a flexbox-style layout over the result, [`damage::DamageTracker`]
//! computes the minimal dirty rects, and [`render::Renderer`] walks the tree
//! to produce a binary "ZRDL" drawlist ([`drawlist`]) that a [`scheduler::ByteSink`]
//! writes to the terminal. Input arrives as a binary "ZREV" event batch
//! ([`event`]), is decoded, and is routed through [`focus`] to the widget
//! that owns it. [`scheduler::Runtime`] ties every stage together into one
//! cooperative frame loop.

pub mod commit;
pub mod components;
pub mod damage;
pub mod debug_bundle;
pub mod drawlist;
pub mod error;
pub mod event;
pub mod focus;
pub mod instance;
pub mod layout;
pub mod render;
pub mod scheduler;
pub mod style;
pub mod vnode;
pub mod widget;

pub use error::{FatalEvent, ZuiError, ZuiResult};
pub use vnode::{Key, VNode, WidgetKind};
