//! Layout tree builder – walks the DOM top-down, resolving each element's
//! style and turning it into the [`LayoutNode`] variant the dispatcher picks.
//!
//! Inline siblings are coalesced into one [`LayoutNode::TextRun`] before the
//! block siblings after them are visited, so a sentence spread over several
//! inline tags stays a single flowed unit.

use std::slice;

use crate::dispatch::{dispatch, group_children, standalone_inline, ChildGroup};
use crate::dom::{DomNode, ElementNode, Tag};
use crate::layout_tree::{
    ImageNode, InlineItem, LayoutNode, ListItem, NodeKind, TableCell, TableRow, TextSpan,
};
use crate::pipeline::ConvertConfig;
use crate::style::{resolve_style, ContainerStyle, ResolvedStyle, StyleOverrides, TextStyle};
use crate::units::{parse_color, parse_length, Color, PX_TO_PT};

const RULE_THICKNESS: f32 = 1.0;
const RULE_SPACING: f32 = 8.0;
const BULLET: &str = "•";

/// Build the layout node for a single DOM node using `config`.
pub fn build(node: &DomNode, config: &ConvertConfig) -> LayoutNode {
    LayoutBuilder::new(config).build(node, &config.base_text_style)
}

/// Build the document root (a generic `#document` block) over `nodes`.
pub fn build_document(nodes: &[DomNode], config: &ConvertConfig) -> LayoutNode {
    LayoutBuilder::new(config).build_document(nodes)
}

pub struct LayoutBuilder<'a> {
    overrides: &'a StyleOverrides,
    base_text: &'a TextStyle,
}

impl<'a> LayoutBuilder<'a> {
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self {
            overrides: &config.overrides,
            base_text: &config.base_text_style,
        }
    }

    pub fn build_document(&self, nodes: &[DomNode]) -> LayoutNode {
        let root = ElementNode::new(Tag::Document);
        let style = resolve_style(&root, self.base_text, self.overrides);
        let children = self.build_children(nodes, &style.text);
        log::debug!("built layout tree with {} top-level nodes", children.len());
        LayoutNode::GenericBlock {
            tag: root.tag.name().to_string(),
            style: style.container,
            children,
        }
    }

    pub fn build(&self, node: &DomNode, parent_text: &TextStyle) -> LayoutNode {
        match node {
            DomNode::Element(e) => self.build_element(e, parent_text),
            DomNode::Text(_) => LayoutNode::TextRun {
                style: ContainerStyle::default(),
                items: self.inline_items(slice::from_ref(node), parent_text),
            },
        }
    }

    pub fn build_element(&self, element: &ElementNode, parent_text: &TextStyle) -> LayoutNode {
        let style = resolve_style(element, parent_text, self.overrides);
        match dispatch(&element.tag) {
            NodeKind::TextRun => LayoutNode::TextRun {
                items: self.inline_items(&element.children, &style.text),
                style: style.container,
            },
            NodeKind::LineBreak => LayoutNode::LineBreak,
            NodeKind::Rule => rule(&style),
            NodeKind::Blockquote => LayoutNode::Blockquote {
                children: self.build_children(&element.children, &style.text),
                style: style.container,
            },
            NodeKind::Preformatted => LayoutNode::Preformatted {
                text: preformatted_text(element),
                style: style.container,
                text_style: style.text,
            },
            NodeKind::Table => self.table(element, style),
            NodeKind::List => self.list(element, style),
            NodeKind::Image => LayoutNode::Image(image(element, &style)),
            NodeKind::Link => LayoutNode::Link {
                href: element.attr("href").map(str::to_string),
                children: self.build_children(&element.children, &style.text),
                style: style.container,
            },
            NodeKind::GenericBlock => LayoutNode::GenericBlock {
                tag: element.tag.name().to_string(),
                children: self.build_children(&element.children, &style.text),
                style: style.container,
            },
        }
    }

    /// Build children in document order, coalescing inline runs.
    pub fn build_children(&self, children: &[DomNode], text: &TextStyle) -> Vec<LayoutNode> {
        group_children(children)
            .into_iter()
            .filter_map(|group| self.build_group(group, text))
            .collect()
    }

    fn build_group(&self, group: ChildGroup<'_>, text: &TextStyle) -> Option<LayoutNode> {
        match group {
            ChildGroup::Block(e) => Some(self.build_element(e, text)),
            ChildGroup::Inline(run) => {
                if let Some(e) = standalone_inline(run) {
                    return Some(self.build_element(e, text));
                }
                let items = self.inline_items(run, text);
                // Whitespace between blocks carries no content.
                if items.iter().all(InlineItem::is_blank) {
                    return None;
                }
                Some(LayoutNode::TextRun {
                    style: ContainerStyle::default(),
                    items,
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Inline content
    // -----------------------------------------------------------------------

    fn inline_items(&self, nodes: &[DomNode], text: &TextStyle) -> Vec<InlineItem> {
        let mut items = Vec::new();
        self.collect_inline(nodes, text, None, &mut items);
        items
    }

    fn collect_inline(
        &self,
        nodes: &[DomNode],
        text: &TextStyle,
        link: Option<&str>,
        items: &mut Vec<InlineItem>,
    ) {
        for node in nodes {
            match node {
                DomNode::Text(t) => push_span(items, t, text, link),
                DomNode::Element(e) => {
                    let style = resolve_style(e, text, self.overrides);
                    match dispatch(&e.tag) {
                        NodeKind::LineBreak | NodeKind::Rule => items.push(InlineItem::LineBreak),
                        NodeKind::Image => items.push(InlineItem::Image(image(e, &style))),
                        NodeKind::Link => {
                            let href = e.attr("href").or(link);
                            self.collect_inline(&e.children, &style.text, href, items);
                        }
                        NodeKind::Preformatted => {
                            push_span(items, &preformatted_text(e), &style.text, link)
                        }
                        _ => self.collect_inline(&e.children, &style.text, link, items),
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tables and lists
    // -----------------------------------------------------------------------

    fn table(&self, element: &ElementNode, style: ResolvedStyle) -> LayoutNode {
        let mut rows = Vec::new();
        self.collect_rows(&element.children, &style.text, &mut rows);
        LayoutNode::Table {
            style: style.container,
            rows,
        }
    }

    fn collect_rows(&self, nodes: &[DomNode], text: &TextStyle, rows: &mut Vec<TableRow>) {
        for node in nodes {
            let DomNode::Element(e) = node else {
                continue;
            };
            match e.tag {
                Tag::Tr => rows.push(self.row(e, text)),
                Tag::Thead | Tag::Tbody | Tag::Tfoot => {
                    let section = resolve_style(e, text, self.overrides);
                    self.collect_rows(&e.children, &section.text, rows);
                }
                _ => {}
            }
        }
    }

    fn row(&self, tr: &ElementNode, parent_text: &TextStyle) -> TableRow {
        let style = resolve_style(tr, parent_text, self.overrides);
        let cells = tr
            .children
            .iter()
            .filter_map(|node| match node {
                DomNode::Element(e) if matches!(e.tag, Tag::Td | Tag::Th) => {
                    Some(self.cell(e, &style.text))
                }
                _ => None,
            })
            .collect();
        TableRow {
            style: style.container,
            cells,
        }
    }

    fn cell(&self, cell: &ElementNode, parent_text: &TextStyle) -> TableCell {
        let style = resolve_style(cell, parent_text, self.overrides);
        let span = |name: &str| {
            cell.attr(name)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1)
        };
        TableCell {
            header: cell.tag == Tag::Th,
            colspan: span("colspan"),
            rowspan: span("rowspan"),
            children: self.build_children(&cell.children, &style.text),
            style: style.container,
        }
    }

    fn list(&self, element: &ElementNode, style: ResolvedStyle) -> LayoutNode {
        let ordered = element.tag == Tag::Ol;
        let mut number = element
            .attr("start")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(1);
        let mut items: Vec<ListItem> = Vec::new();

        for group in group_children(&element.children) {
            match group {
                ChildGroup::Block(li) if li.tag == Tag::Li => {
                    let li_style = resolve_style(li, &style.text, self.overrides);
                    let marker = if ordered {
                        format!("{number}.")
                    } else {
                        BULLET.to_string()
                    };
                    number = number.saturating_add(1);
                    items.push(ListItem {
                        marker,
                        children: self.build_children(&li.children, &li_style.text),
                        style: li_style.container,
                    });
                }
                other => {
                    // Stray content (often a nested list) belongs to the
                    // preceding item.
                    let Some(node) = self.build_group(other, &style.text) else {
                        continue;
                    };
                    match items.last_mut() {
                        Some(item) => item.children.push(node),
                        None => items.push(ListItem {
                            marker: String::new(),
                            style: ContainerStyle::default(),
                            children: vec![node],
                        }),
                    }
                }
            }
        }

        LayoutNode::List {
            style: style.container,
            ordered,
            items,
        }
    }
}

/// Append text, merging with the previous span when style and link match.
fn push_span(items: &mut Vec<InlineItem>, text: &str, style: &TextStyle, link: Option<&str>) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineItem::Text(prev)) = items.last_mut() {
        if prev.style == *style && prev.link.as_deref() == link {
            prev.text.push_str(text);
            return;
        }
    }
    items.push(InlineItem::Text(TextSpan {
        text: text.to_string(),
        style: style.clone(),
        link: link.map(str::to_string),
    }));
}

fn rule(style: &ResolvedStyle) -> LayoutNode {
    let d = &style.declarations;
    let thickness = d
        .get("height")
        .or_else(|| d.get("border-width"))
        .and_then(parse_length)
        .unwrap_or(RULE_THICKNESS);
    let color = d
        .get("background-color")
        .or_else(|| d.get("border-color"))
        .or_else(|| d.get("color"))
        .and_then(parse_color)
        .unwrap_or(Color::GREY);
    LayoutNode::Rule {
        thickness,
        color,
        spacing: RULE_SPACING,
    }
}

fn image(element: &ElementNode, style: &ResolvedStyle) -> ImageNode {
    let dimension = |name: &str| element.attr(name).and_then(attribute_length);
    ImageNode {
        src: element.src().unwrap_or_default().to_string(),
        alt: element.attr("alt").map(str::to_string),
        width: style.container.width.or_else(|| dimension("width")),
        height: style.container.height.or_else(|| dimension("height")),
        style: style.container.clone(),
    }
}

/// `width`/`height` attributes: bare numbers are CSS pixels.
fn attribute_length(value: &str) -> Option<f32> {
    let value = value.trim();
    match value.parse::<f32>() {
        Ok(px) if px.is_finite() => Some(px * PX_TO_PT),
        _ => parse_length(value),
    }
}

/// Text of a `<pre>` with whitespace kept, `<br>` as newlines and other
/// tags dropped.
fn preformatted_text(element: &ElementNode) -> String {
    fn walk(nodes: &[DomNode], out: &mut String) {
        for node in nodes {
            match node {
                DomNode::Text(t) => out.push_str(t),
                DomNode::Element(e) if e.tag == Tag::Br => out.push('\n'),
                DomNode::Element(e) => walk(&e.children, out),
            }
        }
    }
    let mut out = String::new();
    walk(&element.children, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::FontWeight;

    fn text(t: &str) -> DomNode {
        DomNode::Text(t.to_string())
    }

    fn el(name: &str, children: Vec<DomNode>) -> ElementNode {
        let mut e = ElementNode::new(Tag::from_name(name));
        e.children = children;
        e
    }

    fn node(name: &str, children: Vec<DomNode>) -> DomNode {
        DomNode::Element(el(name, children))
    }

    fn spans(node: &LayoutNode) -> Vec<&TextSpan> {
        match node {
            LayoutNode::TextRun { items, .. } => items.iter().filter_map(|i| i.as_text()).collect(),
            other => panic!("expected text run, got {:?}", other.kind()),
        }
    }

    #[test]
    fn inline_siblings_become_one_run() {
        let div = node(
            "div",
            vec![text("Hi "), node("i", vec![text("there")]), text("!")],
        );
        let tree = build(&div, &ConvertConfig::default());
        assert_eq!(tree.kind(), NodeKind::GenericBlock);
        assert_eq!(tree.children().len(), 1);
        let runs = spans(&tree.children()[0]);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "Hi ");
        assert!(!runs[0].style.italic);
        assert_eq!(runs[1].text, "there");
        assert!(runs[1].style.italic);
    }

    #[test]
    fn adjacent_spans_with_equal_style_merge() {
        let p = node(
            "p",
            vec![
                node("b", vec![text("bold")]),
                node("space", vec![text(" ")]),
                text("text"),
            ],
        );
        let tree = build(&p, &ConvertConfig::default());
        let runs = spans(&tree.children()[0]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "bold");
        assert_eq!(runs[0].style.font_weight, FontWeight::Bold);
        assert_eq!(runs[1].text, " text");
    }

    #[test]
    fn blank_runs_between_blocks_are_dropped() {
        let div = node(
            "div",
            vec![
                node("p", vec![text("a")]),
                node("space", vec![text(" ")]),
                node("p", vec![text("\u{00A0}")]),
            ],
        );
        let tree = build(&div, &ConvertConfig::default());
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.plain_text(), "a\u{00A0}");
    }

    #[test]
    fn heading_is_a_styled_text_run() {
        let h1 = node("h1", vec![text("Title")]);
        let tree = build(&h1, &ConvertConfig::default());
        let runs = spans(&tree);
        assert_eq!(runs[0].style.font_size, 32.0);
        assert!(runs[0].style.is_bold());
        assert_eq!(tree.style().and_then(|s| s.padding.bottom), Some(8.0));
    }

    #[test]
    fn lone_inline_elements_keep_their_variant() {
        let div = node(
            "div",
            vec![
                node("p", vec![node("br", vec![])]),
                node(
                    "p",
                    vec![DomNode::Element(
                        el("a", vec![text("home")]).with_attr("href", "/"),
                    )],
                ),
            ],
        );
        let tree = build(&div, &ConvertConfig::default());
        let p1 = &tree.children()[0];
        assert_eq!(p1.children()[0].kind(), NodeKind::LineBreak);
        let link = &tree.children()[1].children()[0];
        match link {
            LayoutNode::Link { href, children, .. } => {
                assert_eq!(href.as_deref(), Some("/"));
                assert_eq!(spans(&children[0])[0].style.color, Color::BLUE);
            }
            other => panic!("expected link, got {:?}", other.kind()),
        }
    }

    #[test]
    fn links_inside_text_tag_their_spans() {
        let p = node(
            "p",
            vec![
                text("see "),
                DomNode::Element(el("a", vec![text("docs")]).with_attr("href", "/docs")),
                node("br", vec![]),
            ],
        );
        let tree = build(&p, &ConvertConfig::default());
        match &tree.children()[0] {
            LayoutNode::TextRun { items, .. } => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[1].as_text().and_then(|s| s.link.as_deref()), Some("/docs"));
                assert_eq!(items[2], InlineItem::LineBreak);
            }
            other => panic!("expected text run, got {:?}", other.kind()),
        }
    }

    #[test]
    fn rule_reads_height_and_color() {
        let hr = DomNode::Element(
            ElementNode::new(Tag::Hr).with_attr("style", "height: 2pt; color: red"),
        );
        match build(&hr, &ConvertConfig::default()) {
            LayoutNode::Rule {
                thickness,
                color,
                spacing,
            } => {
                assert_eq!(thickness, 2.0);
                assert_eq!(Some(color), parse_color("red"));
                assert_eq!(spacing, 8.0);
            }
            other => panic!("expected rule, got {:?}", other.kind()),
        }
        let plain = build(&DomNode::Element(ElementNode::new(Tag::Hr)), &ConvertConfig::default());
        assert_eq!(
            plain,
            LayoutNode::Rule {
                thickness: 1.0,
                color: Color::GREY,
                spacing: 8.0
            }
        );
    }

    #[test]
    fn preformatted_keeps_whitespace() {
        let pre = node(
            "pre",
            vec![
                text("  a\n    b"),
                node("br", vec![]),
                node("b", vec![text("c  d")]),
            ],
        );
        match build(&pre, &ConvertConfig::default()) {
            LayoutNode::Preformatted {
                text, text_style, ..
            } => {
                assert_eq!(text, "  a\n    b\nc  d");
                assert_eq!(text_style.font_family, "Courier New");
                assert_eq!(text_style.font_size, 10.0);
            }
            other => panic!("expected pre, got {:?}", other.kind()),
        }
    }

    #[test]
    fn ordered_list_numbers_from_start() {
        let ol = DomNode::Element(
            el(
                "ol",
                vec![
                    node("li", vec![text("a")]),
                    node("li", vec![text("b")]),
                    node("ul", vec![node("li", vec![text("c")])]),
                ],
            )
            .with_attr("start", "3"),
        );
        match build(&ol, &ConvertConfig::default()) {
            LayoutNode::List { ordered, items, .. } => {
                assert!(ordered);
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].marker, "3.");
                assert_eq!(items[1].marker, "4.");
                // nested list attaches to the previous item
                assert_eq!(items[1].children.len(), 2);
                assert_eq!(items[1].children[1].kind(), NodeKind::List);
            }
            other => panic!("expected list, got {:?}", other.kind()),
        }
    }

    #[test]
    fn huge_start_saturates() {
        let ol = DomNode::Element(
            el(
                "ol",
                vec![node("li", vec![text("a")]), node("li", vec![text("b")])],
            )
            .with_attr("start", "9223372036854775807"),
        );
        match build(&ol, &ConvertConfig::default()) {
            LayoutNode::List { items, .. } => {
                assert_eq!(items[0].marker, "9223372036854775807.");
                assert_eq!(items[1].marker, "9223372036854775807.");
            }
            other => panic!("expected list, got {:?}", other.kind()),
        }
    }

    #[test]
    fn table_rows_and_cells() {
        let table = node(
            "table",
            vec![
                node("thead", vec![node("tr", vec![node("th", vec![text("H")])])]),
                node(
                    "tbody",
                    vec![node(
                        "tr",
                        vec![DomNode::Element(
                            el("td", vec![text("x")]).with_attr("colspan", "2"),
                        )],
                    )],
                ),
            ],
        );
        match build(&table, &ConvertConfig::default()) {
            LayoutNode::Table { rows, .. } => {
                assert_eq!(rows.len(), 2);
                let th = &rows[0].cells[0];
                assert!(th.header);
                assert!(spans(&th.children[0])[0].style.is_bold());
                let td = &rows[1].cells[0];
                assert!(!td.header);
                assert_eq!(td.colspan, 2);
                assert_eq!(td.rowspan, 1);
                assert_eq!(td.style.padding.top, Some(4.0));
            }
            other => panic!("expected table, got {:?}", other.kind()),
        }
    }

    #[test]
    fn image_dimensions() {
        let img = DomNode::Element(
            ElementNode::new(Tag::Img)
                .with_attr("src", "a.png")
                .with_attr("width", "100")
                .with_attr("height", "40")
                .with_attr("style", "height: 1in"),
        );
        match build(&img, &ConvertConfig::default()) {
            LayoutNode::Image(image) => {
                assert_eq!(image.src, "a.png");
                assert_eq!(image.width, Some(75.0));
                assert_eq!(image.height, Some(72.0));
            }
            other => panic!("expected image, got {:?}", other.kind()),
        }
    }

    #[test]
    fn unknown_tag_builds_generic_block() {
        let foo = node("foo", vec![text("x")]);
        match build(&foo, &ConvertConfig::default()) {
            LayoutNode::GenericBlock { tag, children, .. } => {
                assert_eq!(tag, "foo");
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected generic block, got {:?}", other.kind()),
        }
    }
}
