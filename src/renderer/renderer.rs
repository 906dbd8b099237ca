use std::io::Write;

use anyhow::Result;
use tracing::debug;

use crate::parser::*;
use crate::renderer::ascii::AsciiConverter;
use crate::renderer::styles::*;
use crate::renderer::traits::*;
use crate::resolver::Resolve;

/// Whether the last emission left the cursor mid-line. One instance per
/// top-level render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    pub continuing_line: bool,
}

impl RenderState {
    /// Write one node's resolved content with its style, padding and line
    /// break policy.
    pub fn write(
        &mut self,
        out: &mut dyn Write,
        writer: &dyn StyleWriter,
        content: &str,
        line_break: bool,
        indent: usize,
    ) -> std::io::Result<()> {
        // Close out the previous line before anything that owns its own
        if line_break && self.continuing_line {
            writeln!(out)?;
            self.continuing_line = false;
        }

        // Nothing to style, but a forced break is still owed
        if content.is_empty() {
            if line_break {
                writeln!(out)?;
            }
            return Ok(());
        }

        let pad = padding(indent);
        if !self.continuing_line {
            out.write_all(pad.as_bytes())?;
        }

        let content = reindent(content, &pad);
        writer.write(out, &content)?;

        if line_break {
            writeln!(out)?;
        }

        self.continuing_line = !(line_break || content.ends_with('\n'));
        Ok(())
    }
}

/// Formatting policy for a single node, determined by its kind alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLayout {
    pub style: StyleTag,
    pub skip_children: bool,
    pub line_break: bool,
    pub indent: usize,
}

impl NodeLayout {
    pub fn for_kind(kind: &NodeKind, indent: usize, options: &RenderOptions) -> Self {
        let layout = NodeLayout {
            style: StyleTag::Unknown,
            skip_children: false,
            line_break: false,
            indent,
        };

        match kind {
            NodeKind::Heading { level } => NodeLayout {
                style: if *level < 3 {
                    StyleTag::MajorHeader
                } else {
                    StyleTag::MinorHeader
                },
                skip_children: true,
                line_break: true,
                indent: usize::from(level.saturating_sub(1)),
            },
            NodeKind::Code { literal } => NodeLayout {
                style: StyleTag::Code,
                line_break: literal.contains('\n'),
                ..layout
            },
            NodeKind::Paragraph { .. } | NodeKind::Text { .. } => NodeLayout {
                style: StyleTag::Text,
                ..layout
            },
            NodeKind::Link { .. } => NodeLayout {
                style: StyleTag::Link,
                skip_children: true,
                ..layout
            },
            NodeKind::Image { .. } => NodeLayout {
                style: if options.suppress_images {
                    StyleTag::Placeholder
                } else {
                    StyleTag::Image
                },
                skip_children: true,
                line_break: true,
                ..layout
            },
            NodeKind::Document | NodeKind::Other { .. } => layout,
        }
    }
}

/// Walks a [`Document`] depth-first and writes it as styled terminal text
pub struct DocumentRenderer<'a> {
    options: RenderOptions,
    theme: &'a Theme,
    converter: AsciiConverter<'a>,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(options: RenderOptions, theme: &'a Theme, resolver: &'a dyn Resolve) -> Self {
        Self {
            options,
            theme,
            converter: AsciiConverter::new(resolver),
        }
    }

    /// Parse `text` and render it. Only stream failures are errors.
    pub fn render(&self, out: &mut dyn Write, text: &str) -> Result<()> {
        let document = parse(text);
        debug!(nodes = document.len(), "parsed document");
        self.render_document(out, &document)
    }

    pub fn render_document(&self, out: &mut dyn Write, document: &Document) -> Result<()> {
        let mut state = RenderState::default();

        // Pre-order walk: a node's first child is visited before its next sibling
        let mut pending = vec![(document.root(), 0usize)];
        while let Some((id, indent)) = pending.pop() {
            let node = document.node(id);
            let layout = NodeLayout::for_kind(&node.kind, indent, &self.options);
            let content = self.contents(document, id);

            state.write(
                out,
                self.theme.writer(layout.style),
                &content,
                layout.line_break,
                layout.indent,
            )?;

            if let Some(next) = node.next {
                let sibling_indent = if self.options.nest_sections {
                    layout.indent
                } else {
                    indent
                };
                pending.push((next, sibling_indent));
            }
            if !layout.skip_children {
                if let Some(child) = node.first_child {
                    pending.push((child, layout.indent));
                }
            }
        }

        // Documents without a final newline still end cleanly
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }

    /// The text emitted for a node, independent of recursion into children
    pub fn contents(&self, document: &Document, id: NodeId) -> String {
        let node = document.node(id);
        match &node.kind {
            NodeKind::Heading { .. } => {
                let Some(first) = node.first_child else {
                    return String::new();
                };
                // `# `code` title` and friends: the readable text is one step along
                let first_node = document.node(first);
                let target = match (&first_node.kind, first_node.next) {
                    (NodeKind::Text { .. }, _) | (_, None) => first,
                    (_, Some(sibling)) => sibling,
                };
                self.contents(document, target)
            }
            NodeKind::Paragraph { literal }
            | NodeKind::Code { literal }
            | NodeKind::Text { literal } => literal.clone(),
            NodeKind::Link { destination } => {
                let text = node
                    .first_child
                    .map(|child| self.contents(document, child))
                    .unwrap_or_default();
                if text.is_empty() {
                    format!("<{}>", destination)
                } else {
                    format!("{} <{}>", text, destination)
                }
            }
            NodeKind::Image { destination } => {
                if self.options.suppress_images {
                    return image_placeholder(destination);
                }
                match self.converter.to_ascii(destination) {
                    Ok(art) => art,
                    Err(err) => {
                        debug!(%destination, "image rendered as placeholder: {:#}", err);
                        image_placeholder(destination)
                    }
                }
            }
            NodeKind::Document => String::new(),
            NodeKind::Other { .. } => format!("Type={}\n", node.kind.name()),
        }
    }
}

pub fn image_placeholder(destination: &str) -> String {
    format!("[Image: {}]", destination)
}

fn padding(indent: usize) -> String {
    "  ".repeat(indent)
}

// Pad every line after the first so multi-line payloads stay aligned. A
// trailing break is left bare; the next emission pads itself.
fn reindent(content: &str, pad: &str) -> String {
    if pad.is_empty() || !content.contains('\n') {
        return content.to_string();
    }

    let mut result = String::with_capacity(content.len() + pad.len() * 4);
    let mut lines = content.split('\n').peekable();
    while let Some(line) = lines.next() {
        result.push_str(line);
        if let Some(following) = lines.peek() {
            result.push('\n');
            if !following.is_empty() {
                result.push_str(pad);
            }
        }
    }
    result
}
