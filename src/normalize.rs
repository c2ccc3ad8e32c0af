//! Markup normalizer – whitespace rewriting applied to raw HTML before it is
//! parsed.
//!
//! [`normalize`] runs these passes in order; each later pass relies on what
//! the earlier ones established:
//!
//! 1. [`decode_entities`] – resolve character references in the markup.
//! 2. [`collapse_whitespace`] – fold ASCII whitespace runs into one space.
//! 3. [`strip_space_around_breaks`] – `<br>` becomes the only break signal.
//! 4. [`protect_inline_spaces`] – a space after a closing inline tag becomes
//!    an explicit `<space> </space>` spacer.
//! 5. [`strip_space_between_tags`] – drop whitespace between `>` and `<`,
//!    except inside the spacer.
//!
//! `<pre>` blocks are lifted out before the passes and put back verbatim
//! afterwards. U+00A0 is never treated as whitespace.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::dom::INLINE_TAGS;

/// Spacer element inserted by [`protect_inline_spaces`].
pub const SPACER: &str = "<space> </space>";
const EMPTY_SPACER: &str = "<space></space>";

// Private-use delimiters for lifted <pre> blocks. Tag-shaped so the
// inter-tag pass treats the slot like the element it replaces.
const SLOT_OPEN: &str = "<\u{E000}";
const SLOT_CLOSE: &str = "\u{E001}>";

fn regex(pattern: &'static str, desc: &'static str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid {desc} regex: {err}"))
}

/// Run the full pipeline. Pure; safe to call on already normalized input.
pub fn normalize(html: &str) -> String {
    let (outside, blocks) = lift_pre_blocks(html);
    let result = decode_entities(&outside);
    let result = collapse_whitespace(&result);
    let result = strip_space_around_breaks(&result);
    let result = protect_inline_spaces(&result);
    let result = strip_space_between_tags(&result);
    let result = restore_pre_blocks(&result, &blocks);
    log::debug!(
        "normalized {} bytes of markup into {} bytes ({} pre blocks preserved)",
        html.len(),
        result.len(),
        blocks.len()
    );
    result
}

// ---------------------------------------------------------------------------
// <pre> protection
// ---------------------------------------------------------------------------

fn pre_block_regex() -> &'static Regex {
    static PRE: OnceLock<Regex> = OnceLock::new();
    PRE.get_or_init(|| regex(r"(?is)<pre\b[^>]*>.*?</pre\s*>", "pre block"))
}

fn slot_regex() -> &'static Regex {
    static SLOT: OnceLock<Regex> = OnceLock::new();
    SLOT.get_or_init(|| regex("<\u{E000}(\\d+)\u{E001}>", "pre slot"))
}

fn lift_pre_blocks(html: &str) -> (String, Vec<String>) {
    let mut blocks = Vec::new();
    let outside = pre_block_regex()
        .replace_all(html, |caps: &Captures| {
            blocks.push(caps[0].to_string());
            format!("{SLOT_OPEN}{}{SLOT_CLOSE}", blocks.len() - 1)
        })
        .into_owned();
    (outside, blocks)
}

fn restore_pre_blocks(html: &str, blocks: &[String]) -> String {
    if blocks.is_empty() {
        return html.to_string();
    }
    slot_regex()
        .replace_all(html, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| blocks.get(i))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 1: entities
// ---------------------------------------------------------------------------

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{00A0}"),
    ("ensp", "\u{2002}"),
    ("emsp", "\u{2003}"),
    ("thinsp", "\u{2009}"),
    ("shy", "\u{00AD}"),
    ("copy", "\u{00A9}"),
    ("reg", "\u{00AE}"),
    ("trade", "\u{2122}"),
    ("deg", "\u{00B0}"),
    ("plusmn", "\u{00B1}"),
    ("times", "\u{00D7}"),
    ("divide", "\u{00F7}"),
    ("middot", "\u{00B7}"),
    ("bull", "\u{2022}"),
    ("hellip", "\u{2026}"),
    ("ndash", "\u{2013}"),
    ("mdash", "\u{2014}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201C}"),
    ("rdquo", "\u{201D}"),
    ("laquo", "\u{00AB}"),
    ("raquo", "\u{00BB}"),
    ("euro", "\u{20AC}"),
    ("pound", "\u{00A3}"),
    ("yen", "\u{00A5}"),
    ("cent", "\u{00A2}"),
    ("sect", "\u{00A7}"),
    ("para", "\u{00B6}"),
];

fn entity_regex() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| {
        regex(
            r"&(?:#(\d{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z][a-zA-Z0-9]{1,31}));",
            "entity",
        )
    })
}

/// Replace character references with the characters they name.
///
/// Numeric references are decoded in full; named ones only for the common
/// subset in `NAMED_ENTITIES`. Unknown names and invalid code points are left
/// as written and decoded later by the HTML parser.
pub fn decode_entities(html: &str) -> String {
    entity_regex()
        .replace_all(html, |caps: &Captures| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                let name = &caps[3];
                NAMED_ENTITIES
                    .iter()
                    .find(|(n, _)| *n == name)
                    .and_then(|(_, v)| v.chars().next())
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: whitespace runs
// ---------------------------------------------------------------------------

fn whitespace_run_regex() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| regex(r"[ \t\r\n]+", "whitespace run"))
}

/// Collapse every run of spaces, tabs, CR and LF into a single space.
pub fn collapse_whitespace(html: &str) -> String {
    whitespace_run_regex().replace_all(html, " ").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: <br>
// ---------------------------------------------------------------------------

fn break_regex() -> &'static Regex {
    static BR: OnceLock<Regex> = OnceLock::new();
    BR.get_or_init(|| regex(r"(?i)[ \t\r\n]*</?br[ \t\r\n]*/?>[ \t\r\n]*", "br"))
}

/// Remove whitespace touching a `<br>` on either side and canonicalize the
/// tag to `<br>`.
pub fn strip_space_around_breaks(html: &str) -> String {
    break_regex().replace_all(html, "<br>").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 4: significant spaces after inline elements
// ---------------------------------------------------------------------------

fn inline_close_regex() -> &'static Regex {
    static CLOSE: OnceLock<Regex> = OnceLock::new();
    CLOSE.get_or_init(|| {
        let names = INLINE_TAGS
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?i)</(?:{names})> ");
        Regex::new(&pattern).unwrap_or_else(|err| panic!("invalid inline close regex: {err}"))
    })
}

/// Turn the single space after a closing inline tag into a [`SPACER`] when
/// it is followed by visible content.
pub fn protect_inline_spaces(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for m in inline_close_regex().find_iter(html) {
        let followed_by_content = html[m.end()..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_ascii_whitespace());
        if !followed_by_content {
            continue;
        }
        // Keep the closing tag, swap its trailing space for the spacer.
        out.push_str(&html[last..m.end() - 1]);
        out.push_str(SPACER);
        last = m.end();
    }
    out.push_str(&html[last..]);
    out
}

// ---------------------------------------------------------------------------
// Pass 5: whitespace between tags
// ---------------------------------------------------------------------------

fn between_tags_regex() -> &'static Regex {
    static BETWEEN: OnceLock<Regex> = OnceLock::new();
    BETWEEN.get_or_init(|| regex(r">[ \t\r\n]+<", "inter-tag whitespace"))
}

/// Remove whitespace sitting directly between two tags, keeping the single
/// space inside each spacer.
pub fn strip_space_between_tags(html: &str) -> String {
    between_tags_regex()
        .replace_all(html, "><")
        .replace(EMPTY_SPACER, SPACER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;i&gt;"), "a & b <i>");
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("x&nbsp;y"), "x\u{00A0}y");
        assert_eq!(decode_entities("&bogus; &#xFFFFFF;"), "&bogus; &#xFFFFFF;");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }

    #[test]
    fn collapses_ascii_whitespace_only() {
        assert_eq!(collapse_whitespace("a \t\r\n  b"), "a b");
        assert_eq!(collapse_whitespace("a\u{00A0}\u{00A0}b"), "a\u{00A0}\u{00A0}b");
    }

    #[test]
    fn breaks_absorb_surrounding_space() {
        assert_eq!(strip_space_around_breaks("a <br> b"), "a<br>b");
        assert_eq!(strip_space_around_breaks("a <BR/>b"), "a<br>b");
        assert_eq!(strip_space_around_breaks("a</br> b"), "a<br>b");
        assert_eq!(strip_space_around_breaks("a\u{00A0}<br>"), "a\u{00A0}<br>");
    }

    #[test]
    fn space_after_inline_close_becomes_spacer() {
        assert_eq!(
            protect_inline_spaces("<b>bold</b> text"),
            "<b>bold</b><space> </space>text"
        );
        assert_eq!(
            protect_inline_spaces("<i>a</i> <b>c</b>"),
            "<i>a</i><space> </space><b>c</b>"
        );
        // Block closes and trailing spaces are untouched.
        assert_eq!(protect_inline_spaces("</p> x"), "</p> x");
        assert_eq!(protect_inline_spaces("<b>x</b> "), "<b>x</b> ");
    }

    #[test]
    fn inter_tag_whitespace_goes_spacer_stays() {
        assert_eq!(
            strip_space_between_tags("<div> <p>x</p> </div>"),
            "<div><p>x</p></div>"
        );
        assert_eq!(strip_space_between_tags(SPACER), SPACER);
        assert_eq!(strip_space_between_tags(EMPTY_SPACER), SPACER);
    }

    #[test]
    fn keeps_space_after_inline_element() {
        assert_eq!(
            normalize("<b>bold</b> text"),
            "<b>bold</b><space> </space>text"
        );
    }

    #[test]
    fn collapses_structural_whitespace() {
        assert_eq!(normalize("<div>  <p>x</p>  </div>"), "<div><p>x</p></div>");
        assert_eq!(
            normalize("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>"),
            "<ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn nbsp_content_survives() {
        assert_eq!(
            normalize("<p>&nbsp;</p> <p>a&nbsp;&nbsp;b</p>"),
            "<p>\u{00A0}</p><p>a\u{00A0}\u{00A0}b</p>"
        );
    }

    #[test]
    fn pre_content_is_untouched() {
        let html = "<div>\n  <pre>  line 1\n    line 2 &amp;</pre>\n</div>";
        assert_eq!(
            normalize(html),
            "<div><pre>  line 1\n    line 2 &amp;</pre></div>"
        );
    }

    #[test]
    fn placeholder_shaped_text_is_kept() {
        let html = "<p>x<\u{E000}1\u{E001}>y</p><pre>a</pre>";
        assert_eq!(normalize(html), html);
    }

    #[test]
    fn unlisted_named_entities_pass_through() {
        assert_eq!(decode_entities("caf&eacute; &#233;"), "caf&eacute; \u{00E9}");
    }

    #[test]
    fn idempotent_on_samples() {
        let samples = [
            "<b>bold</b> text",
            "<div>  <p>x</p>  </div>",
            "<p>Hello <i>there</i> and <b>you</b> !</p>",
            "<p>a <br/> b</p>\n<hr>\n<pre> keep   this </pre>",
            "<blockquote style=\"padding-left:20px\">Hi <i>there</i></blockquote>",
            "<table> <tr> <td>a</td> <td>b</td> </tr> </table>",
            "x &lt;b&gt;y&lt;/b&gt; z",
            "<span>a</span> <space></space>",
            "",
        ];
        for html in samples {
            let once = normalize(html);
            assert_eq!(normalize(&once), once, "not idempotent for {html:?}");
        }
    }
}
