//! Verbatim region protection.
//!
//! Code regions must survive repair byte-for-byte. Fenced blocks and inline
//! code spans are swapped for placeholder tokens before any other pass runs,
//! then substituted back unchanged at the end. Placeholders are framed by an
//! ASCII control byte that cannot appear in generated text, so they never
//! collide with document content.

use memchr::{memchr, memmem};

/// Frame byte for placeholder tokens (ASCII SUB).
pub const FRAME: u8 = 0x1A;

const FRAME_CHAR: char = '\u{1A}';
const FENCE: &[u8] = b"```";

/// Recovered verbatim regions, keyed by insertion index per kind.
///
/// One store per `protect` call. Each region is consumed exactly once by
/// [`restore`]; restoration is keyed by index, not position.
#[derive(Debug, Default)]
pub struct VerbatimStore {
    fenced: Vec<String>,
    inline: Vec<String>,
}

impl VerbatimStore {
    /// Total number of protected regions.
    pub fn len(&self) -> usize {
        self.fenced.len() + self.inline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fenced.is_empty() && self.inline.is_empty()
    }
}

/// Replace code regions with opaque placeholders.
///
/// Fenced spans are taken first (left-to-right, non-overlapping, shortest
/// span between a fence marker and the next one), then inline spans on the
/// remaining text. An unpaired trailing delimiter is left as plain text.
///
/// # Example
/// ```
/// use mendmark::verbatim;
///
/// let (masked, store) = verbatim::protect("see `<div>` here");
/// assert!(!masked.contains("<div>"));
/// assert_eq!(verbatim::restore(&masked, &store), "see `<div>` here");
/// ```
pub fn protect(input: &str) -> (String, VerbatimStore) {
    let mut store = VerbatimStore::default();

    let spans = fenced_spans(input.as_bytes());
    let masked = replace_spans(input, &spans, |text| {
        let token = placeholder('F', store.fenced.len());
        store.fenced.push(text.to_string());
        token
    });

    let spans = inline_spans(masked.as_bytes());
    let masked = replace_spans(&masked, &spans, |text| {
        let token = placeholder('I', store.inline.len());
        store.inline.push(text.to_string());
        token
    });

    (masked, store)
}

/// Substitute every placeholder back with its recorded region.
///
/// A frame byte that does not form a well-shaped placeholder passes through
/// untouched, so the function is total over arbitrary input.
pub fn restore(masked: &str, store: &VerbatimStore) -> String {
    let bytes = masked.as_bytes();
    let mut out = String::with_capacity(masked.len());
    let mut pos = 0;

    while let Some(rel) = memchr(FRAME, &bytes[pos..]) {
        let start = pos + rel;
        out.push_str(&masked[pos..start]);
        match parse_placeholder(&bytes[start..]) {
            Some((kind, index, len)) => {
                let regions = match kind {
                    b'F' => &store.fenced,
                    _ => &store.inline,
                };
                match regions.get(index) {
                    Some(text) => out.push_str(text),
                    // Forged token with an out-of-range index: pass through.
                    None => out.push_str(&masked[start..start + len]),
                }
                pos = start + len;
            }
            None => {
                out.push(FRAME_CHAR);
                pos = start + 1;
            }
        }
    }
    out.push_str(&masked[pos..]);
    out
}

/// Delete code regions outright (no placeholders, no restoration).
///
/// Used by the validator, which only needs code excluded from its counts.
pub fn strip_regions(input: &str) -> String {
    let spans = fenced_spans(input.as_bytes());
    let stripped = replace_spans(input, &spans, |_| String::new());
    let spans = inline_spans(stripped.as_bytes());
    replace_spans(&stripped, &spans, |_| String::new())
}

/// Non-overlapping fenced spans, left to right. Each span runs from a fence
/// marker to the end of the next one; a dangling marker is not a span.
fn fenced_spans(bytes: &[u8]) -> Vec<(usize, usize)> {
    let finder = memmem::Finder::new(FENCE);
    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(rel) = finder.find(&bytes[pos..]) {
        let open = pos + rel;
        let Some(close_rel) = finder.find(&bytes[open + FENCE.len()..]) else {
            break;
        };
        let end = open + FENCE.len() + close_rel + FENCE.len();
        spans.push((open, end));
        pos = end;
    }
    spans
}

/// Inline code spans: backtick pairs with non-empty content and no embedded
/// newline. An odd trailing backtick is plain text.
fn inline_spans(bytes: &[u8]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(rel) = memchr(b'`', &bytes[pos..]) {
        let open = pos + rel;
        let rest = &bytes[open + 1..];
        match memchr(b'`', rest) {
            Some(close) if close > 0 && memchr(b'\n', &rest[..close]).is_none() => {
                let end = open + 1 + close + 1;
                spans.push((open, end));
                pos = end;
            }
            _ => pos = open + 1,
        }
    }
    spans
}

/// Rebuild `input` with each span replaced by whatever `replacement` returns
/// for the span's text. Spans must be sorted and non-overlapping.
fn replace_spans<F>(input: &str, spans: &[(usize, usize)], mut replacement: F) -> String
where
    F: FnMut(&str) -> String,
{
    if spans.is_empty() {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    for &(start, end) in spans {
        out.push_str(&input[pos..start]);
        out.push_str(&replacement(&input[start..end]));
        pos = end;
    }
    out.push_str(&input[pos..]);
    out
}

fn placeholder(kind: char, index: usize) -> String {
    format!("{FRAME_CHAR}{kind}{index}{FRAME_CHAR}")
}

/// Parse a placeholder at the start of `bytes` (which begins with a frame
/// byte). Returns `(kind, index, total_len)`.
fn parse_placeholder(bytes: &[u8]) -> Option<(u8, usize, usize)> {
    let kind = *bytes.get(1)?;
    if kind != b'F' && kind != b'I' {
        return None;
    }
    let mut index: usize = 0;
    let mut pos = 2;
    let mut digits = 0;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'0'..=b'9' => {
                index = index.checked_mul(10)?.checked_add((b - b'0') as usize)?;
                digits += 1;
                pos += 1;
            }
            FRAME if digits > 0 => return Some((kind, index, pos + 1)),
            _ => return None,
        }
    }
    None
}
