use pulldown_cmark::{Event, Options, Parser, Tag};
use tracing::trace;

use crate::parser::types::*;

// An open container on the parser stack. Transparent containers (emphasis
// and friends) contribute no node of their own.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Node(NodeId),
    Transparent,
}

/// Converts markdown text into a [`Document`] tree.
///
/// Never fails: whatever `pulldown-cmark` recognises ends up in the tree,
/// and constructs without a dedicated node kind become `Other` nodes.
pub struct DocumentParser {
    options: Options,
}

impl DocumentParser {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }

    pub fn parse(&self, text: &str) -> Document {
        let mut builder = DocumentBuilder::new();
        let mut stack = vec![Frame::Node(builder.root())];

        for event in Parser::new_ext(text, self.options) {
            trace!(?event, "markdown event");
            let parent = current_parent(&stack);

            match event {
                Event::Start(tag) => {
                    if opens_block(&tag) {
                        close_inline_run(&mut builder, parent);
                    }
                    let frame = match node_kind_for(&tag) {
                        Some(kind) => Frame::Node(builder.append(parent, kind)),
                        None => Frame::Transparent,
                    };
                    stack.push(frame);
                }
                Event::End(_) => {
                    if let Some(Frame::Node(closed)) = stack.pop() {
                        terminate_block(&mut builder, closed);
                    }
                }
                Event::Text(text) => {
                    if matches!(builder.kind(parent), NodeKind::Code { .. }) {
                        builder.push_literal(parent, &text);
                    } else if !is_html_block(builder.kind(parent)) {
                        builder.append_text(parent, &text);
                    }
                }
                Event::Code(code) => {
                    builder.append(parent, NodeKind::code(code.to_string()));
                }
                Event::SoftBreak | Event::HardBreak => {
                    builder.append_text(parent, "\n");
                }
                Event::Html(_) => {
                    // Raw lines of an HTML block belong to its HTMLBlock node
                    if !is_html_block(builder.kind(parent)) {
                        builder.append(parent, NodeKind::other("HTMLBlock"));
                    }
                }
                Event::InlineHtml(_) => {
                    builder.append(parent, NodeKind::other("HTMLSpan"));
                }
                Event::Rule => {
                    builder.append(parent, NodeKind::other("HorizontalRule"));
                }
                Event::FootnoteReference(_) => {
                    builder.append(parent, NodeKind::other("FootnoteReference"));
                }
                Event::TaskListMarker(_) => {
                    builder.append(parent, NodeKind::other("TaskListMarker"));
                }
                _ => {
                    builder.append(parent, NodeKind::other("Unknown"));
                }
            }
        }

        builder.build()
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse markdown text with the default options
pub fn parse(text: &str) -> Document {
    DocumentParser::new().parse(text)
}

fn current_parent(stack: &[Frame]) -> NodeId {
    stack
        .iter()
        .rev()
        .find_map(|frame| match frame {
            Frame::Node(id) => Some(*id),
            Frame::Transparent => None,
        })
        // The root frame is never popped
        .unwrap_or(NodeId::ROOT)
}

fn node_kind_for(tag: &Tag<'_>) -> Option<NodeKind> {
    let kind = match tag {
        Tag::Paragraph => NodeKind::Paragraph {
            literal: String::new(),
        },
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: *level as u8,
        },
        Tag::CodeBlock(_) => NodeKind::code(""),
        Tag::Link { dest_url, .. } => NodeKind::Link {
            destination: dest_url.to_string(),
        },
        Tag::Image { dest_url, .. } => NodeKind::Image {
            destination: dest_url.to_string(),
        },
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough => return None,
        Tag::BlockQuote(_) => NodeKind::other("BlockQuote"),
        Tag::HtmlBlock => NodeKind::other("HTMLBlock"),
        Tag::List(_) => NodeKind::other("List"),
        Tag::Item => NodeKind::other("Item"),
        Tag::FootnoteDefinition(_) => NodeKind::other("FootnoteDefinition"),
        Tag::Table(_) => NodeKind::other("Table"),
        Tag::TableHead => NodeKind::other("TableHead"),
        Tag::TableRow => NodeKind::other("TableRow"),
        Tag::TableCell => NodeKind::other("TableCell"),
        _ => NodeKind::other("Unknown"),
    };
    Some(kind)
}

fn opens_block(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Paragraph
            | Tag::Heading { .. }
            | Tag::BlockQuote(_)
            | Tag::CodeBlock(_)
            | Tag::HtmlBlock
            | Tag::List(_)
            | Tag::FootnoteDefinition(_)
            | Tag::Table(_)
    )
}

// Paragraphs always end their line. Items and table cells only do so when
// their last child is inline content that would otherwise run on.
fn terminate_block(builder: &mut DocumentBuilder, closed: NodeId) {
    let needs_break = match builder.kind(closed) {
        NodeKind::Paragraph { .. } => true,
        NodeKind::Other { name } if matches!(name.as_str(), "Item" | "TableCell") => {
            ends_with_inline(builder, closed)
        }
        _ => false,
    };

    if needs_break {
        builder.append_text(closed, "\n");
    }
}

// A block opening inside a tight list item starts on its own line
fn close_inline_run(builder: &mut DocumentBuilder, parent: NodeId) {
    if ends_with_inline(builder, parent) {
        builder.append_text(parent, "\n");
    }
}

fn ends_with_inline(builder: &DocumentBuilder, id: NodeId) -> bool {
    builder
        .last_child(id)
        .is_some_and(|last| ends_inline(builder.kind(last)))
}

fn is_html_block(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Other { name } if name == "HTMLBlock")
}

fn ends_inline(kind: &NodeKind) -> bool {
    match kind {
        NodeKind::Text { literal } => !literal.ends_with('\n'),
        NodeKind::Code { literal } => !literal.contains('\n'),
        NodeKind::Link { .. } => true,
        _ => false,
    }
}
