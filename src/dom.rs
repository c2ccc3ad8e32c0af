//! DOM adapter – parses normalized markup with html5ever and converts the
//! result into a small owned tree, plus the closed tag vocabulary.
//!
//! Every tag falls into exactly one [`TagClass`]:
//! - Inline: emphasis, links, spans, table cells and rows, images, `br`
//! - Block: paragraphs, headings, lists, tables, quotes, rules, containers
//!
//! Tags outside both lists are kept as [`Tag::Unknown`] and classified as
//! block.

use std::collections::HashMap;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::ConvertError;

// ---------------------------------------------------------------------------
// Tag vocabulary
// ---------------------------------------------------------------------------

/// Tag names that take part in running text.
pub const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "br", "code", "del", "em", "i", "img", "kbd", "mark", "q", "s", "samp",
    "small", "space", "span", "strike", "strong", "sub", "sup", "tbody", "td", "tfoot", "th",
    "thead", "tr", "u", "var",
];

/// Tag names that start a new layout block.
pub const BLOCK_TAGS: &[&str] = &[
    "#document",
    "blockquote",
    "body",
    "div",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hr",
    "html",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// Whitespace and dispatch category of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Inline,
    Block,
}

/// A recognized tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    // Inline
    A,
    Abbr,
    B,
    Br,
    Code,
    Del,
    Em,
    I,
    Img,
    Kbd,
    Mark,
    Q,
    S,
    Samp,
    Small,
    /// Spacer emitted by the normalizer to keep a significant space alive.
    Space,
    Span,
    Strike,
    Strong,
    Sub,
    Sup,
    Tbody,
    Td,
    Tfoot,
    Th,
    Thead,
    Tr,
    U,
    Var,
    // Block
    Document,
    Blockquote,
    Body,
    Div,
    Footer,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Head,
    Header,
    Hr,
    Html,
    Li,
    Ol,
    P,
    Pre,
    Section,
    Table,
    Ul,
    /// Catch-all for unknown tags – kept, treated as generic blocks.
    Unknown(String),
}

impl Tag {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "a" => Tag::A,
            "abbr" => Tag::Abbr,
            "b" => Tag::B,
            "br" => Tag::Br,
            "code" => Tag::Code,
            "del" => Tag::Del,
            "em" => Tag::Em,
            "i" => Tag::I,
            "img" => Tag::Img,
            "kbd" => Tag::Kbd,
            "mark" => Tag::Mark,
            "q" => Tag::Q,
            "s" => Tag::S,
            "samp" => Tag::Samp,
            "small" => Tag::Small,
            "space" => Tag::Space,
            "span" => Tag::Span,
            "strike" => Tag::Strike,
            "strong" => Tag::Strong,
            "sub" => Tag::Sub,
            "sup" => Tag::Sup,
            "tbody" => Tag::Tbody,
            "td" => Tag::Td,
            "tfoot" => Tag::Tfoot,
            "th" => Tag::Th,
            "thead" => Tag::Thead,
            "tr" => Tag::Tr,
            "u" => Tag::U,
            "var" => Tag::Var,
            "#document" => Tag::Document,
            "blockquote" => Tag::Blockquote,
            "body" => Tag::Body,
            "div" => Tag::Div,
            "footer" => Tag::Footer,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "h4" => Tag::H4,
            "h5" => Tag::H5,
            "h6" => Tag::H6,
            "head" => Tag::Head,
            "header" => Tag::Header,
            "hr" => Tag::Hr,
            "html" => Tag::Html,
            "li" => Tag::Li,
            "ol" => Tag::Ol,
            "p" => Tag::P,
            "pre" => Tag::Pre,
            "section" => Tag::Section,
            "table" => Tag::Table,
            "ul" => Tag::Ul,
            other => Tag::Unknown(other.to_string()),
        }
    }

    /// Lower-case tag name, as used for style override lookups.
    pub fn name(&self) -> &str {
        match self {
            Tag::A => "a",
            Tag::Abbr => "abbr",
            Tag::B => "b",
            Tag::Br => "br",
            Tag::Code => "code",
            Tag::Del => "del",
            Tag::Em => "em",
            Tag::I => "i",
            Tag::Img => "img",
            Tag::Kbd => "kbd",
            Tag::Mark => "mark",
            Tag::Q => "q",
            Tag::S => "s",
            Tag::Samp => "samp",
            Tag::Small => "small",
            Tag::Space => "space",
            Tag::Span => "span",
            Tag::Strike => "strike",
            Tag::Strong => "strong",
            Tag::Sub => "sub",
            Tag::Sup => "sup",
            Tag::Tbody => "tbody",
            Tag::Td => "td",
            Tag::Tfoot => "tfoot",
            Tag::Th => "th",
            Tag::Thead => "thead",
            Tag::Tr => "tr",
            Tag::U => "u",
            Tag::Var => "var",
            Tag::Document => "#document",
            Tag::Blockquote => "blockquote",
            Tag::Body => "body",
            Tag::Div => "div",
            Tag::Footer => "footer",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::Head => "head",
            Tag::Header => "header",
            Tag::Hr => "hr",
            Tag::Html => "html",
            Tag::Li => "li",
            Tag::Ol => "ol",
            Tag::P => "p",
            Tag::Pre => "pre",
            Tag::Section => "section",
            Tag::Table => "table",
            Tag::Ul => "ul",
            Tag::Unknown(name) => name,
        }
    }

    pub fn class(&self) -> TagClass {
        match self {
            Tag::A
            | Tag::Abbr
            | Tag::B
            | Tag::Br
            | Tag::Code
            | Tag::Del
            | Tag::Em
            | Tag::I
            | Tag::Img
            | Tag::Kbd
            | Tag::Mark
            | Tag::Q
            | Tag::S
            | Tag::Samp
            | Tag::Small
            | Tag::Space
            | Tag::Span
            | Tag::Strike
            | Tag::Strong
            | Tag::Sub
            | Tag::Sup
            | Tag::Tbody
            | Tag::Td
            | Tag::Tfoot
            | Tag::Th
            | Tag::Thead
            | Tag::Tr
            | Tag::U
            | Tag::Var => TagClass::Inline,
            Tag::Document
            | Tag::Blockquote
            | Tag::Body
            | Tag::Div
            | Tag::Footer
            | Tag::H1
            | Tag::H2
            | Tag::H3
            | Tag::H4
            | Tag::H5
            | Tag::H6
            | Tag::Head
            | Tag::Header
            | Tag::Hr
            | Tag::Html
            | Tag::Li
            | Tag::Ol
            | Tag::P
            | Tag::Pre
            | Tag::Section
            | Tag::Table
            | Tag::Ul
            | Tag::Unknown(_) => TagClass::Block,
        }
    }

    pub fn is_inline(&self) -> bool {
        self.class() == TagClass::Inline
    }

    pub fn is_block(&self) -> bool {
        self.class() == TagClass::Block
    }
}

/// Classify a raw tag name.
pub fn classify(name: &str) -> TagClass {
    Tag::from_name(name).class()
}

// ---------------------------------------------------------------------------
// DOM types
// ---------------------------------------------------------------------------

/// A node in our DOM tree.
#[derive(Debug, Clone)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
}

impl DomNode {
    /// Inline nodes are text and inline-classified elements.
    pub fn is_inline(&self) -> bool {
        match self {
            DomNode::Text(_) => true,
            DomNode::Element(e) => e.tag.is_inline(),
        }
    }

    pub fn inner_text(&self) -> String {
        match self {
            DomNode::Text(text) => text.clone(),
            DomNode::Element(e) => e.inner_text(),
        }
    }
}

/// An element node carrying tag, attributes, and children.
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: Tag,
    pub attributes: HashMap<String, String>,
    pub children: Vec<DomNode>,
}

impl ElementNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Attribute lookup; names are stored lower-case.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    pub fn inline_style(&self) -> Option<&str> {
        self.attr("style")
    }

    pub fn src(&self) -> Option<&str> {
        self.attr("src")
    }

    /// Concatenated text of all descendants.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[DomNode], out: &mut String) {
    for node in nodes {
        match node {
            DomNode::Text(text) => out.push_str(text),
            DomNode::Element(e) => collect_text(&e.children, out),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an HTML string into a list of DOM nodes (the document's children).
pub fn parse_html(html: &str) -> Result<Vec<DomNode>, ConvertError> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(ConvertError::Parse)?;

    let nodes = dom
        .document
        .children
        .borrow()
        .iter()
        .filter_map(convert_handle)
        .collect();
    Ok(nodes)
}

fn convert_handle(handle: &Handle) -> Option<DomNode> {
    match &handle.data {
        NodeData::Text { contents } => Some(DomNode::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let mut element = ElementNode::new(Tag::from_name(name.local.as_ref()));
            for attr in attrs.borrow().iter() {
                element.attributes.insert(
                    attr.name.local.to_string().to_ascii_lowercase(),
                    attr.value.to_string(),
                );
            }
            element.children = handle
                .children
                .borrow()
                .iter()
                .filter_map(convert_handle)
                .collect();
            Some(DomNode::Element(element))
        }
        // Doctype, comments and processing instructions carry no content.
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Convenience helpers
// ---------------------------------------------------------------------------

/// Find the `<body>` element and return its children, or return all nodes if
/// no `<body>` is present.
pub fn body_children(nodes: &[DomNode]) -> Vec<DomNode> {
    match find_body(nodes) {
        Some(body) => body.children.clone(),
        None => nodes.to_vec(),
    }
}

fn find_body(nodes: &[DomNode]) -> Option<&ElementNode> {
    nodes.iter().find_map(|node| match node {
        DomNode::Element(e) if e.tag == Tag::Body => Some(e),
        // Recurse into <html>
        DomNode::Element(e) if e.tag == Tag::Html => find_body(&e.children),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(html: &str) -> ElementNode {
        let dom = parse_html(html).unwrap();
        match body_children(&dom).into_iter().next() {
            Some(DomNode::Element(e)) => e,
            other => panic!("Expected element, got {:?}", other),
        }
    }

    #[test]
    fn recognized_lists_are_disjoint_and_known() {
        for name in INLINE_TAGS {
            let tag = Tag::from_name(name);
            assert!(!matches!(tag, Tag::Unknown(_)), "<{name}> not recognized");
            assert_eq!(tag.class(), TagClass::Inline, "<{name}>");
            assert_eq!(tag.name(), *name);
            assert!(!BLOCK_TAGS.contains(name));
        }
        for name in BLOCK_TAGS {
            let tag = Tag::from_name(name);
            assert!(!matches!(tag, Tag::Unknown(_)), "<{name}> not recognized");
            assert_eq!(tag.class(), TagClass::Block, "<{name}>");
            assert_eq!(tag.name(), *name);
        }
    }

    #[test]
    fn unknown_tags_are_block() {
        assert_eq!(classify("foo"), TagClass::Block);
        assert_eq!(classify("SPAN"), TagClass::Inline);
        assert_eq!(Tag::from_name("Foo").name(), "foo");
    }

    #[test]
    fn parse_simple_div() {
        let e = first_element(r#"<div style="color:red"><p>Hello</p></div>"#);
        assert_eq!(e.tag, Tag::Div);
        assert_eq!(e.inline_style(), Some("color:red"));
        assert_eq!(e.children.len(), 1);
    }

    #[test]
    fn parse_self_closing_img() {
        let e = first_element(r#"<img src="logo.png" ALT="Logo">"#);
        assert_eq!(e.tag, Tag::Img);
        assert_eq!(e.src(), Some("logo.png"));
        assert_eq!(e.attr("alt"), Some("Logo"));
        assert!(e.attributes.contains_key("alt"));
        assert_eq!(e.attr("title"), None);
    }

    #[test]
    fn parse_nested_spans() {
        let e = first_element(r#"<p>Hello <span>world</span>!</p>"#);
        assert_eq!(e.tag, Tag::P);
        assert_eq!(e.children.len(), 3); // "Hello ", <span>, "!"
        assert_eq!(e.inner_text(), "Hello world!");
    }

    #[test]
    fn style_attribute_is_kept_verbatim() {
        let e = first_element(r#"<span style="COLOR : Red;;font-size:12PX">x</span>"#);
        assert_eq!(e.inline_style(), Some("COLOR : Red;;font-size:12PX"));
    }

    #[test]
    fn spacer_and_unknown_elements_survive() {
        let e = first_element("<p><b>a</b><space> </space>b<foo>c</foo></p>");
        let tags: Vec<Tag> = e
            .children
            .iter()
            .filter_map(|c| match c {
                DomNode::Element(e) => Some(e.tag.clone()),
                DomNode::Text(_) => None,
            })
            .collect();
        assert_eq!(
            tags,
            vec![Tag::B, Tag::Space, Tag::Unknown("foo".to_string())]
        );
    }
}
