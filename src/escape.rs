//! Prose angle-bracket escaping.
//!
//! Generated prose mixes real markup with text that merely looks like it:
//! comparisons (`x < 3`), generic types (`Array<string>`), arrows. A strict
//! template compiler chokes on bare brackets, so anything not clearly a tag
//! gets entity-escaped. Only local lexical context is consulted; ambiguity
//! resolves toward escaping for standalone brackets and toward preserving
//! for the generic-type shape when a known tag name precedes it.

use std::sync::LazyLock;

use memchr::{memchr, memchr_iter};
use rustc_hash::FxHashSet;

use crate::verbatim::FRAME;

/// Element names considered legitimate markup in this document dialect.
/// Consulted only by the generic-type rule; the tag scanner itself accepts
/// any tag-shaped sequence regardless of name.
static KNOWN_TAGS: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    [
        "div", "span", "p", "a", "img", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "ul",
        "ol", "li", "table", "tr", "td", "th", "thead", "tbody", "strong", "em", "b", "i", "u",
        "s", "code", "pre", "blockquote", "sup", "sub", "mark", "small", "details", "summary",
        "figure", "figcaption", "video", "audio", "source", "iframe",
    ]
    .into_iter()
    .collect()
});

/// Check a name against the known-tag allow-list, ASCII case-insensitively.
pub fn is_known_tag(name: &str) -> bool {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        KNOWN_TAGS.contains(name.to_ascii_lowercase().as_str())
    } else {
        KNOWN_TAGS.contains(name)
    }
}

/// Escape angle-bracket sequences that are not clearly markup.
///
/// Three rules, applied in order:
/// 1. `identifier<identifier(,identifier)*>` is escaped unless the leading
///    identifier is a known tag name (then the whole match is presumed
///    markup and left untouched).
/// 2. A `<` not followed by a letter, `/`, `!`, or a placeholder frame byte
///    is escaped.
/// 3. A `>` not preceded by a letter, digit, quote, hyphen, or `/` is
///    escaped.
///
/// # Example
/// ```
/// let out = mendmark::escape::escape_prose("Array<string> where n < 10");
/// assert_eq!(out, "Array&lt;string&gt; where n &lt; 10");
/// ```
pub fn escape_prose(input: &str) -> String {
    let generics = escape_generic_types(input);
    let opens = escape_stray_open(&generics);
    escape_stray_close(&opens)
}

/// Rule 1: the generic-type shape.
fn escape_generic_types(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    let mut search = 0;

    while let Some(rel) = memchr(b'<', &bytes[search..]) {
        let lt = search + rel;
        let word_start = word_run_start(bytes, lt);
        if word_start == lt {
            search = lt + 1;
            continue;
        }
        let Some(gt) = match_generic_args(bytes, lt + 1) else {
            search = lt + 1;
            continue;
        };
        if is_known_tag(&input[word_start..lt]) {
            // A tag name directly against `<` cannot occur in real markup
            // text, but the allow-list errs toward preserving it.
            search = gt + 1;
            continue;
        }
        out.push_str(&input[pos..lt]);
        out.push_str("&lt;");
        out.push_str(&input[lt + 1..gt]);
        out.push_str("&gt;");
        pos = gt + 1;
        search = pos;
    }
    out.push_str(&input[pos..]);
    out
}

/// Rule 2: standalone `<` in prose. End of input counts as prose.
fn escape_stray_open(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    for lt in memchr_iter(b'<', bytes) {
        let markup = matches!(
            bytes.get(lt + 1),
            Some(&b) if b.is_ascii_alphabetic() || b == b'/' || b == b'!' || b == FRAME
        );
        if markup {
            continue;
        }
        out.push_str(&input[pos..lt]);
        out.push_str("&lt;");
        pos = lt + 1;
    }
    out.push_str(&input[pos..]);
    out
}

/// Rule 3: standalone `>` in prose. Start of input counts as prose.
fn escape_stray_close(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    for gt in memchr_iter(b'>', bytes) {
        let markup = gt > 0 && {
            let prev = bytes[gt - 1];
            prev.is_ascii_alphanumeric() || matches!(prev, b'"' | b'\'' | b'-' | b'/')
        };
        if markup {
            continue;
        }
        out.push_str(&input[pos..gt]);
        out.push_str("&gt;");
        pos = gt + 1;
    }
    out.push_str(&input[pos..]);
    out
}

/// Start of the word-character run ending at `end` (exclusive).
fn word_run_start(bytes: &[u8], end: usize) -> usize {
    let mut start = end;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    start
}

/// Match `identifier(,identifier)*>` starting at `start`, with optional
/// whitespace after each comma. Returns the index of the closing `>`.
fn match_generic_args(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    loop {
        let word_end = word_run_end(bytes, pos);
        if word_end == pos {
            return None;
        }
        pos = word_end;
        match bytes.get(pos)? {
            b'>' => return Some(pos),
            b',' => {
                pos += 1;
                while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
                    pos += 1;
                }
            }
            _ => return None,
        }
    }
}

fn word_run_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }
    end
}

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
