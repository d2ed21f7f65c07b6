//! A small, self-contained document tree produced by the templates.
//!
//! Templates build `Node`s with inline styles only, so the serialized HTML
//! needs no external stylesheet. The same tree serializes to JSON for any
//! display surface that prefers structured input.

use serde::Serialize;

use super::theme::Theme;
use super::TemplateVariant;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub style: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            class: None,
            style: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.style.push((property, value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Append the node only when present; used for optional fields.
    pub fn child_opt(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
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

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(&escape(text)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                if let Some(class) = el.class {
                    out.push_str(" class=\"");
                    out.push_str(&escape(class));
                    out.push('"');
                }
                if !el.style.is_empty() {
                    let css: Vec<String> = el
                        .style
                        .iter()
                        .map(|(k, v)| format!("{}: {}", k, v))
                        .collect();
                    out.push_str(" style=\"");
                    out.push_str(&escape(&css.join("; ")));
                    out.push('"');
                }
                out.push('>');
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(el.tag);
                out.push('>');
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(text),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    fn visit<'a>(&'a self, found: &mut Vec<&'a Element>, class: &str) {
        if let Node::Element(el) = self {
            if el.class == Some(class) {
                found.push(el);
            }
            for child in &el.children {
                child.visit(found, class);
            }
        }
    }
}

/// Rendered invoice ready for display, printing or serialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub variant: TemplateVariant,
    pub theme: Theme,
    pub root: Node,
}

impl Document {
    /// HTML fragment of the rendered template, the "preview markup".
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.root.write_html(&mut out);
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn elements_with_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.root.visit(&mut found, class);
        found
    }

    pub fn text_with_class(&self, class: &str) -> Vec<String> {
        self.elements_with_class(class)
            .into_iter()
            .map(|el| {
                let mut text = String::new();
                el.children.iter().for_each(|c| c.collect_text(&mut text));
                text
            })
            .collect()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.root.collect_text(&mut out);
        out
    }
}

pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
