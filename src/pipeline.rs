//! Pipeline – ties together normalisation, parsing, style resolution and
//! tree building into a single function call.

use serde::{Deserialize, Serialize};

use crate::builder::LayoutBuilder;
use crate::dom::{body_children, parse_html};
use crate::error::ConvertError;
use crate::layout_tree::LayoutNode;
use crate::normalize::normalize;
use crate::style::{ContainerStyle, StyleOverrides, TextStyle, TextStyleOverride};

/// Configuration for a conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Text style of the document root, inherited by everything below it
    /// (default: Arial 12pt black).
    pub base_text_style: TextStyle,
    /// Per-tag styles applied after inline CSS.
    pub overrides: StyleOverrides,
}

impl ConvertConfig {
    /// Layer `style` over the container style of every `tag` element.
    pub fn with_container_override(mut self, tag: &str, style: ContainerStyle) -> Self {
        self.overrides.set_container(tag, style);
        self
    }

    /// Apply `style` to the text of every `tag` element.
    pub fn with_text_override(mut self, tag: &str, style: TextStyleOverride) -> Self {
        self.overrides.set_text(tag, style);
        self
    }

    pub fn with_base_text_style(mut self, style: TextStyle) -> Self {
        self.base_text_style = style;
        self
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON. Missing fields take their defaults and tag
    /// names are matched case-insensitively.
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.overrides = config.overrides.normalized();
        Ok(config)
    }
}

/// Full pipeline: HTML string → layout tree.
///
/// The root is a generic `#document` block holding the body's content.
pub fn convert(html: &str, config: &ConvertConfig) -> Result<LayoutNode, ConvertError> {
    // 1. Normalise markup
    let html = normalize(html);

    // 2. Parse HTML
    let dom = parse_html(&html)?;
    let nodes = body_children(&dom);

    // 3. Resolve styles and build the tree
    let tree = LayoutBuilder::new(config).build_document(&nodes);
    log::info!("converted {} bytes of HTML", html.len());
    Ok(tree)
}

/// Convenience: convert with the default configuration.
pub fn convert_default(html: &str) -> Result<LayoutNode, ConvertError> {
    convert(html, &ConvertConfig::default())
}
