//! Layout tree – the styled, fully classified structure handed to the layout
//! engine. Each node owns its children; nothing is shared.

use serde::{Deserialize, Serialize};

use crate::style::{ContainerStyle, TextStyle};
use crate::units::Color;

/// Variant discriminant of a [`LayoutNode`], used by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TextRun,
    LineBreak,
    Rule,
    Blockquote,
    Preformatted,
    Table,
    List,
    Image,
    Link,
    GenericBlock,
}

/// One node of the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutNode {
    /// Flowed text built from consecutive inline content.
    TextRun {
        style: ContainerStyle,
        items: Vec<InlineItem>,
    },
    LineBreak,
    /// Horizontal rule.
    Rule {
        thickness: f32,
        color: Color,
        /// Blank space above and below the line.
        spacing: f32,
    },
    Blockquote {
        style: ContainerStyle,
        children: Vec<LayoutNode>,
    },
    /// Whitespace-preserving text block.
    Preformatted {
        style: ContainerStyle,
        text_style: TextStyle,
        text: String,
    },
    Table {
        style: ContainerStyle,
        rows: Vec<TableRow>,
    },
    List {
        style: ContainerStyle,
        ordered: bool,
        items: Vec<ListItem>,
    },
    Image(ImageNode),
    Link {
        href: Option<String>,
        style: ContainerStyle,
        children: Vec<LayoutNode>,
    },
    /// Any other block, including unknown tags.
    GenericBlock {
        tag: String,
        style: ContainerStyle,
        children: Vec<LayoutNode>,
    },
}

/// A piece of a [`LayoutNode::TextRun`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InlineItem {
    Text(TextSpan),
    LineBreak,
    Image(ImageNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub style: TextStyle,
    /// Target of the enclosing `<a>`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    pub style: ContainerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub style: ContainerStyle,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub header: bool,
    pub colspan: u32,
    pub rowspan: u32,
    pub style: ContainerStyle,
    pub children: Vec<LayoutNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Bullet or number prefix (e.g. "•" or "3.").
    pub marker: String,
    pub style: ContainerStyle,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            LayoutNode::TextRun { .. } => NodeKind::TextRun,
            LayoutNode::LineBreak => NodeKind::LineBreak,
            LayoutNode::Rule { .. } => NodeKind::Rule,
            LayoutNode::Blockquote { .. } => NodeKind::Blockquote,
            LayoutNode::Preformatted { .. } => NodeKind::Preformatted,
            LayoutNode::Table { .. } => NodeKind::Table,
            LayoutNode::List { .. } => NodeKind::List,
            LayoutNode::Image(_) => NodeKind::Image,
            LayoutNode::Link { .. } => NodeKind::Link,
            LayoutNode::GenericBlock { .. } => NodeKind::GenericBlock,
        }
    }

    /// Container style, for variants that have one.
    pub fn style(&self) -> Option<&ContainerStyle> {
        match self {
            LayoutNode::TextRun { style, .. }
            | LayoutNode::Blockquote { style, .. }
            | LayoutNode::Preformatted { style, .. }
            | LayoutNode::Table { style, .. }
            | LayoutNode::List { style, .. }
            | LayoutNode::Link { style, .. }
            | LayoutNode::GenericBlock { style, .. } => Some(style),
            LayoutNode::Image(image) => Some(&image.style),
            LayoutNode::LineBreak | LayoutNode::Rule { .. } => None,
        }
    }

    /// Direct block children. Table cells and list items are reached through
    /// their own fields.
    pub fn children(&self) -> &[LayoutNode] {
        match self {
            LayoutNode::Blockquote { children, .. }
            | LayoutNode::Link { children, .. }
            | LayoutNode::GenericBlock { children, .. } => children,
            _ => &[],
        }
    }

    /// Concatenated text content of this subtree, with `\n` for breaks.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            LayoutNode::TextRun { items, .. } => {
                for item in items {
                    match item {
                        InlineItem::Text(span) => out.push_str(&span.text),
                        InlineItem::LineBreak => out.push('\n'),
                        InlineItem::Image(_) => {}
                    }
                }
            }
            LayoutNode::LineBreak => out.push('\n'),
            LayoutNode::Preformatted { text, .. } => out.push_str(text),
            LayoutNode::Table { rows, .. } => {
                for cell in rows.iter().flat_map(|r| &r.cells) {
                    cell.children.iter().for_each(|c| c.write_text(out));
                }
            }
            LayoutNode::List { items, .. } => {
                for item in items {
                    item.children.iter().for_each(|c| c.write_text(out));
                }
            }
            LayoutNode::Blockquote { children, .. }
            | LayoutNode::Link { children, .. }
            | LayoutNode::GenericBlock { children, .. } => {
                children.iter().for_each(|c| c.write_text(out));
            }
            LayoutNode::Rule { .. } | LayoutNode::Image(_) => {}
        }
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl InlineItem {
    pub fn as_text(&self) -> Option<&TextSpan> {
        match self {
            InlineItem::Text(span) => Some(span),
            _ => None,
        }
    }

    /// True for text that is nothing but ASCII whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            InlineItem::Text(span) => span.text.chars().all(|c| c.is_ascii_whitespace()),
            _ => false,
        }
    }
}
