//! Turns fetched page markup into plain text worth summarizing.
//!
//! A cleaning pass runs these steps, in order:
//! 1. decode HTML entities
//! 2. parse as HTML and drop every anchor together with its text
//! 3. keep the remaining visible text
//! 4. strip bare `http(s)://` and `www.` tokens
//! 5. collapse whitespace
//! 6. drop everything outside 7-bit ASCII
//! 7. NFKD-normalize
//! 8. drop cookie / privacy policy and terms of service boilerplate
//! 9. collapse whitespace left behind by the removals and trim
//!
//! Removals can expose new matches (`&amp;lt;` decodes twice, removing a phrase can join two
//! halves of another), so phrase removal repeats within a pass and passes repeat until the text
//! stops changing. Every pass that changes the text makes it shorter, so this terminates.

use std::borrow::Cow;
use std::sync::LazyLock;

use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};
use scraper::{Html, Node};
use unicode_normalization::UnicodeNormalization;

/// Elements whose text is never kept.
const DROPPED_ELEMENTS: [&str; 5] = ["a", "script", "style", "noscript", "template"];

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]*);").expect("valid entity pattern")
});

static HTTP_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[a-zA-Z0-9$-_@.&+!*\\(),%]+").expect("valid URL pattern"));

static WWW_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"www\.[a-zA-Z0-9$-_@.&+!*\\(),%]+").expect("valid www pattern"));

static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static BOILERPLATE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)cookies?\spolicy").expect("valid cookie policy pattern"),
        Regex::new(r"(?i)privacy\spolicy").expect("valid privacy policy pattern"),
        Regex::new(r"(?i)terms\sof\sservice").expect("valid terms of service pattern"),
    ]
});

/// Cleans raw page content into ASCII-only, single-spaced plain text with no markup,
/// no link text and no URLs.
///
/// Deterministic, and idempotent: `clean_text(&clean_text(x)) == clean_text(x)`.
///
/// ```
/// # use sitemap_ltx::clean_text;
/// let raw = r#"<p>Caf&eacute; menu, see <a href="/m">our menu</a> or https://example.com/m</p>"#;
/// assert_eq!(clean_text(raw), "Caf menu, see or");
/// ```
pub fn clean_text(raw: &str) -> String {
    let mut current = clean_pass(raw);
    loop {
        let next = clean_pass(&current);
        if next.len() >= current.len() {
            return current;
        }
        current = next;
    }
}

fn clean_pass(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let visible = visible_text(&decoded);

    let without_urls = HTTP_URL_PATTERN.replace_all(&visible, "");
    let without_urls = WWW_URL_PATTERN.replace_all(&without_urls, "");

    // also folds newline runs, which `\s` covers
    let collapsed = WHITESPACE_PATTERN.replace_all(&without_urls, " ");

    let ascii: String = collapsed.chars().filter(char::is_ascii).collect();
    let normalized: String = ascii.nfkd().collect();

    strip_boilerplate(normalized).trim().to_string()
}

/// Removes boilerplate phrases until none are left, including ones that only form once an
/// inner phrase is gone (`cookie cookie policy policy`).
fn strip_boilerplate(mut text: String) -> String {
    loop {
        let stripped = BOILERPLATE_PATTERNS
            .iter()
            .fold(text.clone(), |text, pattern| pattern.replace_all(&text, "").into_owned());
        let stripped = WHITESPACE_PATTERN.replace_all(&stripped, " ").into_owned();
        if stripped.len() >= text.len() {
            return text;
        }
        text = stripped;
    }
}

/// Decodes named HTML5 entities and decimal / hexadecimal character references.
/// Anything unrecognized is left as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    ENTITY_PATTERN.replace_all(text, |caps: &Captures| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
}

fn decode_entity(reference: &str) -> Option<String> {
    match reference.strip_prefix('#') {
        Some(number) => {
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code).map(String::from)
        }
        None => resolve_html5_entity(reference).map(str::to_string),
    }
}

/// Text of every node that is not inside an anchor, script, style, noscript or template element.
fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len());

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => DROPPED_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}
