//! A unified-diff viewer built from plain `Box`/`Text` nodes, grounded in
//! the teacher's own Codex-UX `DiffView` (spec §3 Supplemented features).

use smartstring::alias::String as SmartString;

use crate::style::Color;
use crate::vnode::builder::{ColumnNode, NodeBuilderMut, TextNode};
use crate::vnode::VNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffLineKind {
    Add,
    Delete,
    Context,
    HunkSeparator,
}

#[derive(Debug, Clone)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub line_number: Option<usize>,
    pub content: SmartString,
}

impl DiffLine {
    #[must_use]
    pub fn add(line_number: usize, content: impl Into<SmartString>) -> Self {
        Self { kind: DiffLineKind::Add, line_number: Some(line_number), content: content.into() }
    }

    #[must_use]
    pub fn delete(line_number: usize, content: impl Into<SmartString>) -> Self {
        Self { kind: DiffLineKind::Delete, line_number: Some(line_number), content: content.into() }
    }

    #[must_use]
    pub fn context(line_number: usize, content: impl Into<SmartString>) -> Self {
        Self { kind: DiffLineKind::Context, line_number: Some(line_number), content: content.into() }
    }

    #[must_use]
    pub fn hunk_separator() -> Self {
        Self { kind: DiffLineKind::HunkSeparator, line_number: None, content: SmartString::new() }
    }

    fn prefix(&self) -> &'static str {
        match self.kind {
            DiffLineKind::Add => "+",
            DiffLineKind::Delete => "-",
            DiffLineKind::Context => " ",
            DiffLineKind::HunkSeparator => "",
        }
    }

    fn color(&self) -> Option<Color> {
        match self.kind {
            DiffLineKind::Add => Some(Color::Green),
            DiffLineKind::Delete => Some(Color::Red),
            DiffLineKind::Context | DiffLineKind::HunkSeparator => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiffView {
    file_path: Option<String>,
    lines: Vec<DiffLine>,
    show_line_numbers: bool,
    show_summary: bool,
}

impl DiffView {
    #[must_use]
    pub fn new() -> Self {
        Self { show_summary: true, ..Self::default() }
    }

    #[must_use]
    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn line(mut self, line: DiffLine) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn lines(mut self, lines: impl IntoIterator<Item = DiffLine>) -> Self {
        self.lines.extend(lines);
        self
    }

    #[must_use]
    pub fn show_line_numbers(mut self, show: bool) -> Self {
        self.show_line_numbers = show;
        self
    }

    #[must_use]
    pub fn show_summary(mut self, show: bool) -> Self {
        self.show_summary = show;
        self
    }

    #[must_use]
    pub fn build(self) -> VNode {
        let mut rows = Vec::new();
        if let Some(path) = &self.file_path {
            rows.push(TextNode::new(path.clone()).build());
        }
        if self.show_summary {
            let added = self.lines.iter().filter(|l| l.kind == DiffLineKind::Add).count();
            let deleted = self.lines.iter().filter(|l| l.kind == DiffLineKind::Delete).count();
            rows.push(TextNode::new(format!("+{added} -{deleted}")).build());
        }
        for line in &self.lines {
            if line.kind == DiffLineKind::HunkSeparator {
                rows.push(TextNode::new("⋮").build());
                continue;
            }
            let text = if self.show_line_numbers {
                let number = line.line_number.map_or_else(String::new, |n| n.to_string());
                format!("{prefix}{number:>6} {content}", prefix = line.prefix(), content = line.content)
            } else {
                format!("{}{}", line.prefix(), line.content)
            };
            let mut node = TextNode::new(text);
            if let Some(color) = line.color() {
                node = node.color(color);
            }
            rows.push(node.build());
        }
        ColumnNode::new().children(rows).build()
    }
}
