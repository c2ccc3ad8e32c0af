//! Node dispatcher – decides which [`LayoutNode`] variant a tag becomes and
//! how an element's children are grouped.
//!
//! [`LayoutNode`]: crate::layout_tree::LayoutNode

use crate::dom::{DomNode, ElementNode, Tag};
use crate::layout_tree::NodeKind;

/// Layout variant produced for `tag`. Total over all tags; unknown tags
/// become generic blocks.
pub fn dispatch(tag: &Tag) -> NodeKind {
    match tag {
        // Text-level tags, and headings, render as a single flowed run.
        Tag::H1
        | Tag::H2
        | Tag::H3
        | Tag::H4
        | Tag::H5
        | Tag::H6
        | Tag::Abbr
        | Tag::B
        | Tag::Code
        | Tag::Del
        | Tag::Em
        | Tag::I
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
        | Tag::U
        | Tag::Var => NodeKind::TextRun,
        Tag::Br => NodeKind::LineBreak,
        Tag::Hr => NodeKind::Rule,
        Tag::A => NodeKind::Link,
        Tag::Blockquote => NodeKind::Blockquote,
        Tag::Pre => NodeKind::Preformatted,
        Tag::Table => NodeKind::Table,
        Tag::Ul | Tag::Ol => NodeKind::List,
        Tag::Img => NodeKind::Image,
        Tag::Document
        | Tag::Body
        | Tag::Div
        | Tag::Footer
        | Tag::Head
        | Tag::Header
        | Tag::Html
        | Tag::Li
        | Tag::P
        | Tag::Section
        | Tag::Tbody
        | Tag::Td
        | Tag::Tfoot
        | Tag::Th
        | Tag::Thead
        | Tag::Tr => NodeKind::GenericBlock,
        Tag::Unknown(name) => {
            log::debug!("unknown tag <{name}>, using a generic block");
            NodeKind::GenericBlock
        }
    }
}

/// A slice of an element's children as the builder visits them.
#[derive(Debug, Clone, Copy)]
pub enum ChildGroup<'a> {
    /// Consecutive text nodes and inline elements, to be flowed together.
    Inline(&'a [DomNode]),
    /// A single block element.
    Block(&'a ElementNode),
}

/// Split children into maximal inline runs and single block elements,
/// preserving document order.
pub fn group_children(children: &[DomNode]) -> Vec<ChildGroup<'_>> {
    let mut groups = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, child) in children.iter().enumerate() {
        match child {
            DomNode::Element(e) if e.tag.is_block() => {
                if let Some(start) = run_start.take() {
                    groups.push(ChildGroup::Inline(&children[start..i]));
                }
                groups.push(ChildGroup::Block(e));
            }
            _ => {
                run_start.get_or_insert(i);
            }
        }
    }
    if let Some(start) = run_start {
        groups.push(ChildGroup::Inline(&children[start..]));
    }
    groups
}

/// An inline run made of exactly one element that has its own variant
/// (a lone `<br>`, `<img>` or `<a>`) is emitted as that variant instead of
/// being wrapped in a text run.
pub fn standalone_inline(run: &[DomNode]) -> Option<&ElementNode> {
    match run {
        [DomNode::Element(e)] => match dispatch(&e.tag) {
            NodeKind::LineBreak | NodeKind::Image | NodeKind::Link => Some(e),
            _ => None,
        },
        _ => None,
    }
}
