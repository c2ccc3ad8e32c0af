//! Style resolver – applies inline CSS declarations to text and container
//! styles, layered over the built-in per-tag stylesheet and under caller
//! supplied overrides.
//!
//! Resolution order for an element:
//! 1. inherited text style from the parent (container style is not inherited)
//! 2. built-in tag defaults ([`tag_text_defaults`], [`tag_container_defaults`])
//! 3. the element's own `style` attribute
//! 4. per-tag [`StyleOverrides`]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::declarations::StyleDeclarations;
use crate::dom::{ElementNode, Tag};
use crate::units::{
    parse_border_color, parse_border_width, parse_color, parse_edges, parse_font_family,
    parse_font_weight, parse_length, parse_line_height, Color, FontWeight, NORMAL_LINE_HEIGHT,
};

// ---------------------------------------------------------------------------
// Text style
// ---------------------------------------------------------------------------

/// Fully resolved style of a run of text. Sizes are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub italic: bool,
    pub color: Color,
    pub background_color: Option<Color>,
    pub underline: bool,
    pub strikethrough: bool,
    pub letter_spacing: f32,
    /// Multiplier of the font size.
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 12.0,
            font_weight: FontWeight::Normal,
            italic: false,
            color: Color::BLACK,
            background_color: None,
            underline: false,
            strikethrough: false,
            letter_spacing: 0.0,
            line_height: NORMAL_LINE_HEIGHT,
        }
    }
}

impl TextStyle {
    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }

    /// Overwrite every field the delta sets.
    pub fn apply(&mut self, delta: &TextStyleOverride) {
        if let Some(family) = &delta.font_family {
            self.font_family = family.clone();
        }
        if let Some(size) = delta.font_size {
            self.font_size = size;
        }
        if let Some(weight) = delta.font_weight {
            self.font_weight = weight;
        }
        if let Some(italic) = delta.italic {
            self.italic = italic;
        }
        if let Some(color) = delta.color {
            self.color = color;
        }
        if let Some(bg) = delta.background_color {
            self.background_color = Some(bg);
        }
        if let Some(underline) = delta.underline {
            self.underline = underline;
        }
        if let Some(strikethrough) = delta.strikethrough {
            self.strikethrough = strikethrough;
        }
        if let Some(spacing) = delta.letter_spacing {
            self.letter_spacing = spacing;
        }
        if let Some(line_height) = delta.line_height {
            self.line_height = line_height;
        }
    }
}

/// Partial text style: only the `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyleOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
}

// ---------------------------------------------------------------------------
// Container style
// ---------------------------------------------------------------------------

/// Per-edge values in points. `None` leaves the edge to the layout engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Edges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
}

impl Edges {
    pub fn all(value: f32) -> Self {
        Self::from_array([value; 4])
    }

    /// `[top, right, bottom, left]`, CSS order.
    pub fn from_array([top, right, bottom, left]: [f32; 4]) -> Self {
        Self {
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            left: Some(left),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn overlay(&mut self, other: &Edges) {
        self.top = other.top.or(self.top);
        self.right = other.right.or(self.right);
        self.bottom = other.bottom.or(self.bottom);
        self.left = other.left.or(self.left);
    }
}

/// Horizontal alignment of a container's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Resolved box style. Every field is optional: `None` means "engine
/// default", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Edges::is_empty")]
    pub padding: Edges,
    #[serde(skip_serializing_if = "Edges::is_empty")]
    pub border_width: Edges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<HorizontalAlign>,
}

impl ContainerStyle {
    /// Layer `other` on top: every field it sets wins.
    pub fn overlay(&mut self, other: &ContainerStyle) {
        self.background_color = other.background_color.or(self.background_color);
        self.padding.overlay(&other.padding);
        self.border_width.overlay(&other.border_width);
        self.border_color = other.border_color.or(self.border_color);
        self.width = other.width.or(self.width);
        self.min_width = other.min_width.or(self.min_width);
        self.max_width = other.max_width.or(self.max_width);
        self.height = other.height.or(self.height);
        self.min_height = other.min_height.or(self.min_height);
        self.max_height = other.max_height.or(self.max_height);
        self.align = other.align.or(self.align);
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// Caller supplied per-tag style deltas, applied after inline CSS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    /// Tag name → container style layered last.
    pub container: BTreeMap<String, ContainerStyle>,
    /// Tag name → text style delta applied last.
    pub text: BTreeMap<String, TextStyleOverride>,
}

impl StyleOverrides {
    pub fn set_container(&mut self, tag: &str, style: ContainerStyle) {
        self.container.insert(tag.to_ascii_lowercase(), style);
    }

    pub fn set_text(&mut self, tag: &str, style: TextStyleOverride) {
        self.text.insert(tag.to_ascii_lowercase(), style);
    }

    pub fn container_for(&self, tag: &Tag) -> Option<&ContainerStyle> {
        self.container.get(tag.name())
    }

    pub fn text_for(&self, tag: &Tag) -> Option<&TextStyleOverride> {
        self.text.get(tag.name())
    }

    /// Lower-case all keys so lookups by [`Tag::name`] hit.
    pub fn normalized(self) -> Self {
        Self {
            container: self
                .container
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            text: self
                .text
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in tag stylesheet
// ---------------------------------------------------------------------------

const MONOSPACE: &str = "Courier New";

/// Text defaults implied by the tag itself.
pub fn tag_text_defaults(tag: &Tag) -> TextStyleOverride {
    let mut s = TextStyleOverride::default();
    match tag {
        Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 => {
            s.font_weight = Some(FontWeight::Bold);
            s.font_size = Some(match tag {
                Tag::H1 => 32.0,
                Tag::H2 => 28.0,
                Tag::H3 => 24.0,
                Tag::H4 => 20.0,
                Tag::H5 => 16.0,
                _ => 12.0,
            });
        }
        Tag::B | Tag::Strong | Tag::Th => s.font_weight = Some(FontWeight::Bold),
        Tag::I | Tag::Em => s.italic = Some(true),
        Tag::U => s.underline = Some(true),
        Tag::S | Tag::Strike | Tag::Del => s.strikethrough = Some(true),
        Tag::Small => s.font_size = Some(10.0),
        Tag::Sub | Tag::Sup => s.font_size = Some(9.0),
        Tag::Code | Tag::Kbd | Tag::Samp | Tag::Var => {
            s.font_family = Some(MONOSPACE.to_string())
        }
        Tag::Mark => s.background_color = Some(Color::YELLOW),
        Tag::A => {
            s.color = Some(Color::BLUE);
            s.underline = Some(true);
        }
        Tag::Pre => {
            s.font_family = Some(MONOSPACE.to_string());
            s.font_size = Some(10.0);
        }
        _ => {}
    }
    s
}

/// Box defaults implied by the tag itself.
pub fn tag_container_defaults(tag: &Tag) -> ContainerStyle {
    let mut s = ContainerStyle::default();
    match tag {
        Tag::P => s.padding.bottom = Some(6.0),
        Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 => {
            s.padding.bottom = Some(8.0)
        }
        Tag::Ul | Tag::Ol => s.padding.left = Some(16.0),
        Tag::Blockquote => {
            s.padding = Edges {
                top: Some(8.0),
                right: None,
                bottom: Some(8.0),
                left: Some(16.0),
            };
            s.border_width.left = Some(3.0);
            s.border_color = Some(Color::GREY);
            s.background_color = Some(Color::GREY_LIGHTEN_5);
        }
        Tag::Pre => {
            s.padding = Edges::all(10.0);
            s.background_color = Some(Color::GREY_LIGHTEN_4);
        }
        Tag::Td | Tag::Th => {
            s.padding = Edges::all(4.0);
            s.border_width = Edges::all(1.0);
            s.border_color = Some(Color::GREY_LIGHTEN_2);
        }
        _ => {}
    }
    s
}

// ---------------------------------------------------------------------------
// Declaration application
// ---------------------------------------------------------------------------

/// Apply text-related declarations on top of `base`.
///
/// Unknown properties and values that fail to parse leave the field as it
/// was; later declarations are still applied.
pub fn resolve_text(base: &TextStyle, declarations: &StyleDeclarations) -> TextStyle {
    let mut style = base.clone();
    for (property, value) in declarations.iter() {
        apply_text_property(&mut style, property, value);
    }
    style
}

fn apply_text_property(s: &mut TextStyle, prop: &str, val: &str) {
    match prop {
        "color" => {
            if let Some(c) = parse_color(val) {
                s.color = c;
            }
        }
        "background-color" | "background" => {
            if let Some(c) = parse_color(val) {
                s.background_color = Some(c);
            }
        }
        "font-size" => {
            if let Some(pt) = parse_length(val) {
                s.font_size = pt;
            }
        }
        "font-weight" => {
            if let Some(weight) = parse_font_weight(val) {
                s.font_weight = weight;
            }
        }
        "font-style" => match val.trim().to_ascii_lowercase().as_str() {
            "italic" | "oblique" => s.italic = true,
            "normal" => s.italic = false,
            _ => {}
        },
        "font-family" => {
            if let Some(family) = parse_font_family(val) {
                s.font_family = family;
            }
        }
        "text-decoration" | "text-decoration-line" => {
            let val = val.to_ascii_lowercase();
            if val.trim() == "none" {
                s.underline = false;
                s.strikethrough = false;
            }
            if val.contains("underline") {
                s.underline = true;
            }
            if val.contains("line-through") {
                s.strikethrough = true;
            }
        }
        "letter-spacing" => {
            if let Some(pt) = parse_length(val) {
                s.letter_spacing = pt;
            }
        }
        "line-height" => {
            if let Some(multiplier) = parse_line_height(val) {
                s.line_height = multiplier;
            }
        }
        _ => {}
    }
}

/// Apply box-related declarations on top of `base`.
///
/// Margins have no separate representation and land in `padding`.
pub fn resolve_container(base: &ContainerStyle, declarations: &StyleDeclarations) -> ContainerStyle {
    let mut style = base.clone();
    for (property, value) in declarations.iter() {
        apply_container_property(&mut style, property, value);
    }
    style
}

fn apply_container_property(s: &mut ContainerStyle, prop: &str, val: &str) {
    match prop {
        "background-color" | "background" => {
            if let Some(c) = parse_color(val) {
                s.background_color = Some(c);
            }
        }
        "padding" | "margin" => {
            if let Some(edges) = parse_edges(val) {
                s.padding = Edges::from_array(edges);
            }
        }
        "padding-top" | "margin-top" => set_length(&mut s.padding.top, val),
        "padding-right" | "margin-right" => set_length(&mut s.padding.right, val),
        "padding-bottom" | "margin-bottom" => set_length(&mut s.padding.bottom, val),
        "padding-left" | "margin-left" => set_length(&mut s.padding.left, val),
        "border" => {
            if let Some(width) = parse_border_width(val) {
                s.border_width = Edges::all(width);
            }
            if let Some(color) = parse_border_color(val) {
                s.border_color = Some(color);
            }
        }
        "border-top" => set_border_edge(&mut s.border_width.top, &mut s.border_color, val),
        "border-right" => set_border_edge(&mut s.border_width.right, &mut s.border_color, val),
        "border-bottom" => set_border_edge(&mut s.border_width.bottom, &mut s.border_color, val),
        "border-left" => set_border_edge(&mut s.border_width.left, &mut s.border_color, val),
        "border-width" => {
            if let Some(edges) = parse_edges(val) {
                s.border_width = Edges::from_array(edges);
            }
        }
        "border-color" => {
            if let Some(c) = parse_color(val) {
                s.border_color = Some(c);
            }
        }
        "width" => set_length(&mut s.width, val),
        "min-width" => set_length(&mut s.min_width, val),
        "max-width" => set_length(&mut s.max_width, val),
        "height" => set_length(&mut s.height, val),
        "min-height" => set_length(&mut s.min_height, val),
        "max-height" => set_length(&mut s.max_height, val),
        "text-align" => {
            let align = match val.trim().to_ascii_lowercase().as_str() {
                "left" => Some(HorizontalAlign::Left),
                "center" => Some(HorizontalAlign::Center),
                "right" => Some(HorizontalAlign::Right),
                "justify" => Some(HorizontalAlign::Justify),
                _ => None,
            };
            if align.is_some() {
                s.align = align;
            }
        }
        _ => {}
    }
}

fn set_length(field: &mut Option<f32>, val: &str) {
    if let Some(pt) = parse_length(val) {
        *field = Some(pt);
    }
}

fn set_border_edge(width: &mut Option<f32>, color: &mut Option<Color>, val: &str) {
    if let Some(w) = parse_border_width(val) {
        *width = Some(w);
    }
    if let Some(c) = parse_border_color(val) {
        *color = Some(c);
    }
}

// ---------------------------------------------------------------------------
// Element resolution
// ---------------------------------------------------------------------------

/// Text and container style of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub text: TextStyle,
    pub container: ContainerStyle,
    /// The element's parsed `style` attribute, for variants that read extra
    /// properties (rules, images).
    pub declarations: StyleDeclarations,
}

/// Resolve an element's style, inheriting text properties from its parent.
pub fn resolve_style(
    element: &ElementNode,
    parent_text: &TextStyle,
    overrides: &StyleOverrides,
) -> ResolvedStyle {
    let declarations = StyleDeclarations::parse(element.inline_style());

    let mut text = parent_text.clone();
    text.apply(&tag_text_defaults(&element.tag));
    let mut text = resolve_text(&text, &declarations);
    if let Some(delta) = overrides.text_for(&element.tag) {
        text.apply(delta);
    }

    let mut container = resolve_container(&tag_container_defaults(&element.tag), &declarations);
    if let Some(over) = overrides.container_for(&element.tag) {
        container.overlay(over);
    }

    ResolvedStyle {
        text,
        container,
        declarations,
    }
}
