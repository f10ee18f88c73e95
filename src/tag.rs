//! Tag tokenization.
//!
//! Recognizes any syntactically tag-shaped sequence: `<`, optional `/`, a
//! name (ASCII letter then alphanumerics), attribute bytes up to the next
//! `>`, optional trailing `/`. The first `>` always terminates a token; the
//! scanner has no quote awareness. This is deliberately not an HTML parser:
//! it exists so the balance analyzer and the validator agree on what counts
//! as a tag, and so repair outcomes stay stable if the grammar ever gets a
//! real scanner behind it.

use std::sync::LazyLock;

use memchr::memchr;
use rustc_hash::FxHashSet;

/// Elements that cannot take a closing tag.
static VOID_ELEMENTS: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    [
        "br", "hr", "img", "input", "meta", "link", "area", "base", "col", "embed", "source",
        "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// How a tag token participates in nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>` — opens an element.
    Open,
    /// `</name>` — closes an element.
    Close,
    /// `<name ... />`, or any void element; no stack effect.
    SelfClosing,
}

/// One tag-shaped token in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset just past the `>`.
    pub end: usize,
    pub kind: TagKind,
    name_start: usize,
    name_end: usize,
}

impl TagToken {
    /// The tag name as written in `text` (original case).
    pub fn name<'a>(&self, text: &'a str) -> &'a str {
        &text[self.name_start..self.name_end]
    }

    /// ASCII case-insensitive name comparison.
    pub fn name_eq(&self, text: &str, other: &TagToken) -> bool {
        self.name(text).eq_ignore_ascii_case(other.name(text))
    }
}

/// Tokenize every tag-shaped sequence in `text`, left to right.
///
/// Non-tag uses of `<` are skipped, not errors.
///
/// # Example
/// ```
/// use mendmark::tag::{scan_tags, TagKind};
///
/// let tokens = scan_tags("<div><br/></div>");
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[1].kind, TagKind::SelfClosing);
/// assert_eq!(tokens[2].kind, TagKind::Close);
/// ```
pub fn scan_tags(text: &str) -> Vec<TagToken> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while let Some(rel) = memchr(b'<', &bytes[pos..]) {
        let start = pos + rel;
        match parse_tag_at(text, start) {
            Some(token) => {
                pos = token.end;
                tokens.push(token);
            }
            None => pos = start + 1,
        }
    }
    tokens
}

/// Parse one tag token starting at the `<` at `start`.
///
/// Returns `None` when the text at `start` is not tag-shaped (`< 5`, `<_x>`,
/// `<!-- -->`, an unterminated `<div`).
pub fn parse_tag_at(text: &str, start: usize) -> Option<TagToken> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(start), Some(&b'<'));

    let mut pos = start + 1;
    let closing = bytes.get(pos) == Some(&b'/');
    if closing {
        pos += 1;
    }

    if !bytes.get(pos).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let name_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_alphanumeric) {
        pos += 1;
    }
    let name_end = pos;
    // Word boundary after the name; `<div_>` is not a tag.
    if bytes.get(pos) == Some(&b'_') {
        return None;
    }

    let close_rel = memchr(b'>', &bytes[pos..])?;
    let end = pos + close_rel + 1;

    let name = &text[name_start..name_end];
    let self_syntax = bytes[end - 2] == b'/' && end - 2 >= name_end;
    let kind = if self_syntax || is_void_element(name) {
        TagKind::SelfClosing
    } else if closing {
        TagKind::Close
    } else {
        TagKind::Open
    };

    Some(TagToken {
        start,
        end,
        kind,
        name_start,
        name_end,
    })
}

/// Whether `name` is a void element (case-insensitive).
pub fn is_void_element(name: &str) -> bool {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        VOID_ELEMENTS.contains(name.to_ascii_lowercase().as_str())
    } else {
        VOID_ELEMENTS.contains(name)
    }
}
