//! Typed markup tree produced by the view renderers.
//!
//! Views never concatenate markup strings. They build `Node` values, and
//! [`to_html`] escapes every text and attribute value on the way out.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !class.is_empty() {
            self.classes.push(class);
        }
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text { .. } => None,
        }
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(text),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Depth-first search for elements carrying `class`.
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.walk(&mut |el| {
            if el.has_class(class) {
                found.push(el);
            }
        });
        found
    }

    /// Depth-first search for elements with the given tag.
    pub fn find_by_tag<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.walk(&mut |el| {
            if el.tag == tag {
                found.push(el);
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        if let Node::Element(el) = self {
            visit(el);
            for child in &el.children {
                child.walk(visit);
            }
        }
    }
}

/// Serialize a node sequence as escaped HTML.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    nodes.iter().for_each(|n| write_html(n, &mut out));
    out
}

fn write_html(node: &Node, out: &mut String) {
    match node {
        Node::Text { text } => escape_into(text, out),
        Node::Element(el) => {
            out.push('<');
            out.push_str(el.tag);
            if !el.classes.is_empty() {
                out.push_str(" class=\"");
                escape_into(&el.classes.join(" "), out);
                out.push('"');
            }
            out.push('>');
            el.children.iter().for_each(|c| write_html(c, out));
            out.push_str("</");
            out.push_str(el.tag);
            out.push('>');
        }
    }
}

fn escape_into(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Render a node sequence as indented plain text for terminals.
pub fn to_text(nodes: &[Node]) -> String {
    let mut lines = Vec::new();
    nodes.iter().for_each(|n| write_text(n, 0, &mut lines));
    lines.join("\n")
}

fn write_text(node: &Node, depth: usize, lines: &mut Vec<String>) {
    match node {
        Node::Text { text } => lines.push(format!("{}{}", "  ".repeat(depth), text)),
        Node::Element(el) => match el.tag {
            // Leaf-ish containers are flattened onto a single line.
            "span" | "small" | "td" | "th" | "h2" | "h3" | "p" => {
                let text = node.text_content();
                if !text.is_empty() {
                    lines.push(format!("{}{}", "  ".repeat(depth), text));
                }
            }
            "tr" => {
                let cells: Vec<String> = el.children.iter().map(Node::text_content).collect();
                lines.push(format!("{}{}", "  ".repeat(depth), cells.join(" | ")));
            }
            _ => el
                .children
                .iter()
                .for_each(|c| write_text(c, depth + usize::from(el.tag == "div"), lines)),
        },
    }
}
