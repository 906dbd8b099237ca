// Document tree - an arena of nodes linked by first-child/next-sibling

/// Stable index of a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Heading { level: u8 },
    Paragraph { literal: String },
    Text { literal: String },
    Code { literal: String },
    Link { destination: String },
    Image { destination: String },
    Other { name: String },
}

impl NodeKind {
    pub fn text(literal: impl Into<String>) -> Self {
        NodeKind::Text {
            literal: literal.into(),
        }
    }

    pub fn code(literal: impl Into<String>) -> Self {
        NodeKind::Code {
            literal: literal.into(),
        }
    }

    pub fn other(name: impl Into<String>) -> Self {
        NodeKind::Other { name: name.into() }
    }

    /// Name of the kind as shown in diagnostics
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::Paragraph { .. } => "Paragraph",
            NodeKind::Text { .. } => "Text",
            NodeKind::Code { .. } => "Code",
            NodeKind::Link { .. } => "Link",
            NodeKind::Image { .. } => "Image",
            NodeKind::Other { name } => name,
        }
    }

    fn literal_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeKind::Paragraph { literal }
            | NodeKind::Text { literal }
            | NodeKind::Code { literal } => Some(literal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub first_child: Option<NodeId>,
    pub next: Option<NodeId>,
}

/// A parsed markdown document. Read-only once built.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root is always present
        self.nodes.len() == 1
    }

    /// Iterate the direct children of `id` in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            document: self,
            next: self.node(id).first_child,
        }
    }
}

pub struct Children<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.node(current).next;
        Some(current)
    }
}

/// Incrementally assembles a [`Document`], keeping sibling links consistent
#[derive(Debug)]
pub struct DocumentBuilder {
    nodes: Vec<Node>,
    last_child: Vec<Option<NodeId>>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                first_child: None,
                next: None,
            }],
            last_child: vec![None],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn last_child(&self, parent: NodeId) -> Option<NodeId> {
        self.last_child[parent.0]
    }

    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            first_child: None,
            next: None,
        });
        self.last_child.push(None);

        match self.last_child[parent.0] {
            Some(previous) => self.nodes[previous.0].next = Some(id),
            None => self.nodes[parent.0].first_child = Some(id),
        }
        self.last_child[parent.0] = Some(id);
        id
    }

    /// Append text under `parent`, extending the previous sibling when it is
    /// already a text node
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        if let Some(last) = self.last_child[parent.0] {
            if let NodeKind::Text { literal } = &mut self.nodes[last.0].kind {
                literal.push_str(text);
                return last;
            }
        }
        self.append(parent, NodeKind::text(text))
    }

    /// Extend the literal payload of an existing node. Nodes without a
    /// literal are left untouched.
    pub fn push_literal(&mut self, id: NodeId, text: &str) {
        if let Some(literal) = self.nodes[id.0].kind.literal_mut() {
            literal.push_str(text);
        }
    }

    pub fn build(self) -> Document {
        Document { nodes: self.nodes }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
