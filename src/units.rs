//! CSS literal parsing – colours, lengths, line heights, font keywords.
//!
//! Every function here is pure and total: malformed input yields `None` and
//! callers keep whatever value they had before. All lengths are returned in
//! typographic points (1pt = 1/72 inch).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Colour
// ---------------------------------------------------------------------------

/// RGBA colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb8(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::rgb8(0xFF, 0xFF, 0xFF);
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    // Palette entries shared by the named-colour table and tag defaults.
    pub const GREY: Self = Self::rgb8(0x9E, 0x9E, 0x9E);
    pub const GREY_LIGHTEN_2: Self = Self::rgb8(0xE0, 0xE0, 0xE0);
    pub const GREY_LIGHTEN_3: Self = Self::rgb8(0xEE, 0xEE, 0xEE);
    pub const GREY_LIGHTEN_4: Self = Self::rgb8(0xF5, 0xF5, 0xF5);
    pub const GREY_LIGHTEN_5: Self = Self::rgb8(0xFA, 0xFA, 0xFA);
    pub const BLUE: Self = Self::rgb8(0x21, 0x96, 0xF3);
    pub const YELLOW: Self = Self::rgb8(0xFF, 0xEB, 0x3B);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 0xFF)
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a < 0.001
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1].repeat(2))?;
                let g = channel(&hex[1..2].repeat(2))?;
                let b = channel(&hex[2..3].repeat(2))?;
                Some(Self::rgb8(r, g, b))
            }
            6 => Some(Self::rgb8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::rgba8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }
}

/// Named colours understood by [`parse_color`], keyed by lower-case name.
pub const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("red", Color::rgb8(0xF4, 0x43, 0x36)),
    ("green", Color::rgb8(0x4C, 0xAF, 0x50)),
    ("blue", Color::BLUE),
    ("yellow", Color::YELLOW),
    ("orange", Color::rgb8(0xFF, 0x98, 0x00)),
    ("purple", Color::rgb8(0x9C, 0x27, 0xB0)),
    ("pink", Color::rgb8(0xE9, 0x1E, 0x63)),
    ("brown", Color::rgb8(0x79, 0x55, 0x48)),
    ("gray", Color::GREY),
    ("grey", Color::GREY),
    ("lightgray", Color::GREY_LIGHTEN_3),
    ("lightgrey", Color::GREY_LIGHTEN_3),
    ("darkgray", Color::rgb8(0x42, 0x42, 0x42)),
    ("darkgrey", Color::rgb8(0x42, 0x42, 0x42)),
    ("cyan", Color::rgb8(0x00, 0xBC, 0xD4)),
    ("aqua", Color::rgb8(0x00, 0xBC, 0xD4)),
    ("magenta", Color::rgb8(0xE9, 0x1E, 0x63)),
    ("fuchsia", Color::rgb8(0xE9, 0x1E, 0x63)),
    ("lime", Color::rgb8(0x8B, 0xC3, 0x4A)),
    ("navy", Color::rgb8(0x0D, 0x47, 0xA1)),
    ("teal", Color::rgb8(0x00, 0x96, 0x88)),
    ("olive", Color::rgb8(0x9E, 0x9D, 0x24)),
    ("maroon", Color::rgb8(0xB7, 0x1C, 0x1C)),
    ("silver", Color::GREY_LIGHTEN_2),
    ("transparent", Color::TRANSPARENT),
];

/// Parse a CSS colour literal: hex, `rgb()`/`rgba()`, or a named colour.
pub fn parse_color(text: &str) -> Option<Color> {
    let value = text.trim().to_ascii_lowercase();
    if value.is_empty() {
        return None;
    }
    if value.starts_with('#') {
        return Color::from_hex(&value);
    }
    if value.starts_with("rgb") {
        return parse_rgb_function(&value);
    }
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, color)| *color)
}

fn rgb_function_regex() -> &'static Regex {
    static RGB: OnceLock<Regex> = OnceLock::new();
    RGB.get_or_init(|| {
        Regex::new(
            r"^rgba?\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*(\d*\.?\d+)\s*)?\)$",
        )
        .unwrap_or_else(|err| panic!("invalid rgb() regex: {err}"))
    })
}

fn parse_rgb_function(value: &str) -> Option<Color> {
    let caps = rgb_function_regex().captures(value)?;
    let r: u8 = caps[1].parse().ok()?;
    let g: u8 = caps[2].parse().ok()?;
    let b: u8 = caps[3].parse().ok()?;
    let mut color = Color::rgb8(r, g, b);
    if let Some(alpha) = caps.get(4) {
        let a: f32 = alpha.as_str().parse().ok()?;
        color.a = a.clamp(0.0, 1.0);
    }
    Some(color)
}

// ---------------------------------------------------------------------------
// Lengths
// ---------------------------------------------------------------------------

/// CSS pixels to points.
pub const PX_TO_PT: f32 = 0.75;
/// Base font size, in points, that `em`/`rem` resolve against.
pub const EM_BASE_PT: f32 = 12.0;
/// Flat factor applied to percentages (no containing block is known).
pub const PERCENT_FACTOR: f32 = 0.12;
/// Multiplier used for `line-height: normal`.
pub const NORMAL_LINE_HEIGHT: f32 = 1.2;

fn length_regex() -> &'static Regex {
    static LENGTH: OnceLock<Regex> = OnceLock::new();
    LENGTH.get_or_init(|| {
        Regex::new(r"^([+-]?\d*\.?\d+)\s*(px|pt|em|rem|cm|mm|in|%)?$")
            .unwrap_or_else(|err| panic!("invalid length regex: {err}"))
    })
}

/// Parse a CSS length and convert it to points.
///
/// Bare numbers are taken as points. `auto`, `inherit`, `initial` and
/// anything else that isn't a number with a known unit yield `None`.
/// Negative values are passed through.
pub fn parse_length(text: &str) -> Option<f32> {
    let value = text.trim().to_ascii_lowercase();
    if matches!(value.as_str(), "" | "auto" | "inherit" | "initial") {
        return None;
    }
    let caps = length_regex().captures(&value)?;
    let number: f32 = caps[1].parse().ok()?;
    let points = match caps.get(2).map(|m| m.as_str()) {
        Some("px") => number * PX_TO_PT,
        Some("em") | Some("rem") => number * EM_BASE_PT,
        Some("cm") => number * 28.3465,
        Some("mm") => number * 2.83465,
        Some("in") => number * 72.0,
        Some("%") => number * PERCENT_FACTOR,
        _ => number,
    };
    Some(points)
}

/// Parse `line-height` as a multiplier of the font size.
pub fn parse_line_height(text: &str) -> Option<f32> {
    let value = text.trim().to_ascii_lowercase();
    if value == "normal" {
        return Some(NORMAL_LINE_HEIGHT);
    }
    if let Ok(multiplier) = value.parse::<f32>() {
        return multiplier.is_finite().then_some(multiplier);
    }
    let percent = value.strip_suffix('%')?.trim_end();
    percent.parse::<f32>().ok().map(|p| p / 100.0)
}

/// Width of a `border` shorthand such as `1px solid black`.
///
/// Only the first token is read; style and colour tokens are ignored.
pub fn parse_border_width(text: &str) -> Option<f32> {
    text.split_whitespace().next().and_then(parse_length)
}

/// Colour of a `border` shorthand, if any token in it is a colour.
pub fn parse_border_color(text: &str) -> Option<Color> {
    text.split_whitespace().skip(1).find_map(parse_color)
}

/// Parse 1–4 space separated lengths into `[top, right, bottom, left]`.
///
/// Returns `None` unless every token parses, so a partly valid shorthand is
/// never half-applied.
pub fn parse_edges(text: &str) -> Option<[f32; 4]> {
    let parts = text
        .split_whitespace()
        .map(parse_length)
        .collect::<Option<Vec<f32>>>()?;
    match parts.as_slice() {
        [all] => Some([*all; 4]),
        [v, h] => Some([*v, *h, *v, *h]),
        [t, h, b] => Some([*t, *h, *b, *h]),
        [t, r, b, l] => Some([*t, *r, *b, *l]),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Weight class of a font. CSS numeric weights collapse onto these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    Normal,
    Bold,
}

pub fn parse_font_weight(text: &str) -> Option<FontWeight> {
    let value = text.trim().to_ascii_lowercase();
    match value.as_str() {
        "bold" | "bolder" | "700" | "800" | "900" => Some(FontWeight::Bold),
        "normal" | "400" => Some(FontWeight::Normal),
        "lighter" | "100" | "200" | "300" => Some(FontWeight::Light),
        numeric => match numeric.parse::<i32>() {
            Ok(w) if w >= 600 => Some(FontWeight::Bold),
            Ok(w) if w <= 300 => Some(FontWeight::Light),
            _ => None,
        },
    }
}

/// First family of a `font-family` list, unquoted, with the CSS generic
/// families mapped onto concrete fonts.
pub fn parse_font_family(text: &str) -> Option<String> {
    let first = text.split(',').next()?.trim().trim_matches(|c| c == '"' || c == '\'');
    if first.is_empty() {
        return None;
    }
    let family = match first.to_ascii_lowercase().as_str() {
        "monospace" => "Courier New",
        "serif" => "Times New Roman",
        "sans-serif" => "Arial",
        "cursive" => "Comic Sans MS",
        "fantasy" => "Impact",
        _ => first,
    };
    Some(family.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn hex_short_form_expands() {
        assert_eq!(parse_color("#abc"), parse_color("#aabbcc"));
        assert!(parse_color("#abc").is_some());
    }

    #[test]
    fn hex_with_alpha() {
        let c = parse_color("#ff000080").unwrap();
        assert!(approx(c.r, 1.0));
        assert!(approx(c.a, 128.0 / 255.0));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_eq!(parse_color("#ggg"), None);
        assert_eq!(parse_color("#abcd"), None);
        assert_eq!(parse_color("#"), None);
    }

    #[test]
    fn named_colors_are_case_insensitive() {
        for (name, color) in NAMED_COLORS {
            assert_eq!(parse_color(name), Some(*color));
            assert_eq!(parse_color(name), parse_color(&name.to_uppercase()));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(parse_color("blurple"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn rgb_and_rgba_functions() {
        assert_eq!(parse_color("rgb(255, 0, 0)"), Some(Color::rgb8(255, 0, 0)));
        let c = parse_color("RGBA(0,0,255,0.5)").unwrap();
        assert!(approx(c.b, 1.0));
        assert!(approx(c.a, 0.5));
        assert_eq!(parse_color("rgb(256,0,0)"), None);
        assert_eq!(parse_color("rgb(1,2)"), None);
    }

    #[test]
    fn length_conversions() {
        assert_eq!(parse_length("72pt"), Some(72.0));
        assert_eq!(parse_length("1in"), Some(72.0));
        assert!(approx(parse_length("2cm").unwrap(), 56.693));
        assert!(approx(parse_length("10mm").unwrap(), 28.3465));
        assert_eq!(parse_length("20px"), Some(15.0));
        assert_eq!(parse_length("2em"), Some(24.0));
        assert_eq!(parse_length("1rem"), Some(12.0));
        assert!(approx(parse_length("50%").unwrap(), 6.0));
        assert_eq!(parse_length("14"), Some(14.0));
        assert_eq!(parse_length(".5pt"), Some(0.5));
    }

    #[test]
    fn length_keywords_and_garbage() {
        assert_eq!(parse_length("auto"), None);
        assert_eq!(parse_length("inherit"), None);
        assert_eq!(parse_length("initial"), None);
        assert_eq!(parse_length("12vw"), None);
        assert_eq!(parse_length("px"), None);
    }

    #[test]
    fn negative_lengths_pass_through() {
        assert_eq!(parse_length("-4px"), Some(-3.0));
        assert_eq!(parse_length("+2pt"), Some(2.0));
    }

    #[test]
    fn line_height_forms() {
        assert_eq!(parse_line_height("1.5"), Some(1.5));
        assert_eq!(parse_line_height("normal"), Some(1.2));
        assert_eq!(parse_line_height("150%"), Some(1.5));
        assert_eq!(parse_line_height("20px"), None);
        assert_eq!(parse_line_height("inf"), None);
    }

    #[test]
    fn border_shorthand_reads_first_token() {
        assert_eq!(parse_border_width("2px solid red"), Some(1.5));
        assert_eq!(parse_border_width("solid 2px"), None);
        assert_eq!(
            parse_border_color("1px solid red"),
            parse_color("red")
        );
        assert_eq!(parse_border_color("1px solid"), None);
    }

    #[test]
    fn edge_shorthand() {
        assert_eq!(parse_edges("4pt"), Some([4.0; 4]));
        assert_eq!(parse_edges("1pt 2pt"), Some([1.0, 2.0, 1.0, 2.0]));
        assert_eq!(parse_edges("1pt 2pt 3pt"), Some([1.0, 2.0, 3.0, 2.0]));
        assert_eq!(parse_edges("1pt 2pt 3pt 4pt"), Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(parse_edges("1pt auto"), None);
        assert_eq!(parse_edges(""), None);
    }

    #[test]
    fn font_weight_keywords() {
        assert_eq!(parse_font_weight("bold"), Some(FontWeight::Bold));
        assert_eq!(parse_font_weight("650"), Some(FontWeight::Bold));
        assert_eq!(parse_font_weight("400"), Some(FontWeight::Normal));
        assert_eq!(parse_font_weight("lighter"), Some(FontWeight::Light));
        assert_eq!(parse_font_weight("250"), Some(FontWeight::Light));
        assert_eq!(parse_font_weight("500"), None);
        assert_eq!(parse_font_weight("heavy"), None);
    }

    #[test]
    fn font_family_first_entry() {
        assert_eq!(
            parse_font_family("'Open Sans', Arial, sans-serif").as_deref(),
            Some("Open Sans")
        );
        assert_eq!(parse_font_family("monospace").as_deref(), Some("Courier New"));
        assert_eq!(parse_font_family("Serif").as_deref(), Some("Times New Roman"));
        assert_eq!(parse_font_family(" , Arial"), None);
    }
}
