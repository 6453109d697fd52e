//! Renders a markdown string into a column of styled text lines, caching
//! the parse with `useMemo` so an unchanged source string is not re-walked
//! every render (spec §3 Supplemented features: "`useMemo` (`Markdown`
//! parse cache)"). Parsing uses `pulldown-cmark`, the teacher's own choice
//! for the ambient markdown-rendering surface.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::instance::hooks::{Deps, Hooks};
use crate::style::{Attrs, Color, TextStyle};
use crate::vnode::builder::{composite, NodeBuilderMut, ColumnNode, TextNode};
use crate::vnode::{Key, VNode};
use crate::widget::Composite;

#[derive(Debug, Clone, Default)]
struct Line {
    text: String,
    style: TextStyle,
}

fn heading_style(level: HeadingLevel) -> TextStyle {
    let mut style = TextStyle::default().bold();
    if level == HeadingLevel::H1 {
        style = style.color(Color::Cyan);
    }
    style
}

fn parse_lines(source: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_style = TextStyle::default();
    let mut in_code_block = false;
    let mut list_depth: usize = 0;

    let flush = |lines: &mut Vec<Line>, current: &mut String, style: &TextStyle| {
        if !current.is_empty() {
            lines.push(Line { text: std::mem::take(current), style: style.clone() });
        }
    };

    for event in Parser::new(source) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut lines, &mut current, &current_style);
                current_style = heading_style(level);
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut lines, &mut current, &current_style);
                current_style = TextStyle::default();
            }
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_) | CodeBlockKind::Indented)) => {
                flush(&mut lines, &mut current, &current_style);
                in_code_block = true;
                current_style = TextStyle::default().color(Color::Rgb(150, 150, 150));
            }
            Event::End(TagEnd::CodeBlock) => {
                flush(&mut lines, &mut current, &current_style);
                in_code_block = false;
                current_style = TextStyle::default();
            }
            Event::Start(Tag::Item) => {
                flush(&mut lines, &mut current, &current_style);
                current.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                current.push_str("- ");
            }
            Event::End(TagEnd::Item) => flush(&mut lines, &mut current, &current_style),
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => list_depth = list_depth.saturating_sub(1),
            Event::Start(Tag::Strong) => current_style.attrs.insert(Attrs::BOLD),
            Event::End(TagEnd::Strong) => current_style.attrs.remove(Attrs::BOLD),
            Event::Start(Tag::Emphasis) => current_style.attrs.insert(Attrs::ITALIC),
            Event::End(TagEnd::Emphasis) => current_style.attrs.remove(Attrs::ITALIC),
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph) => {
                flush(&mut lines, &mut current, &current_style);
            }
            Event::Text(text) | Event::Code(text) => {
                if in_code_block {
                    for line in text.split('\n') {
                        if !current.is_empty() || !line.is_empty() {
                            lines.push(Line { text: line.to_string(), style: current_style.clone() });
                        }
                    }
                } else {
                    current.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                flush(&mut lines, &mut current, &current_style);
            }
            Event::Rule => {
                flush(&mut lines, &mut current, &current_style);
                lines.push(Line { text: "---".to_string(), style: TextStyle::default() });
            }
            _ => {}
        }
    }
    flush(&mut lines, &mut current, &current_style);
    lines
}

#[derive(Debug, Clone)]
pub struct MarkdownProps {
    pub source: String,
}

pub struct Markdown;

impl Composite for Markdown {
    type Props = MarkdownProps;

    fn render(&self, props: &Self::Props, hooks: &mut Hooks<'_>) -> crate::error::ZuiResult<VNode> {
        let lines = hooks.use_memo(Deps::new().push(props.source.clone()), || parse_lines(&props.source))?;
        let children = lines
            .iter()
            .map(|line| {
                let mut node = TextNode::new(line.text.clone());
                node = node.text_style(line.style.clone());
                node.build()
            })
            .collect();
        Ok(ColumnNode::new().children(children).build())
    }

    fn name(&self) -> &'static str {
        "Markdown"
    }
}

/// Build a `Markdown` composite vnode that renders `source`, re-parsing
/// only when the source string changes.
#[must_use]
pub fn markdown(source: impl Into<String>, key: Option<Key>) -> VNode {
    composite(std::rc::Rc::new(Markdown), MarkdownProps { source: source.into() }, key)
}
