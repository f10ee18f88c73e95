//! Aggressive markup stripping.
//!
//! The last-resort mode for documents the repair pass cannot make
//! acceptable: every tag-shaped sequence outside the leading metadata block
//! is deleted outright, and entity-escaped brackets are decoded back to
//! plain text since no markup is left to collide with. Formatting fidelity
//! is deliberately sacrificed for guaranteed structural validity. Code
//! regions are still protected and restored byte-for-byte.

use memchr::memchr;

use crate::verbatim;

/// Delimiter line bounding the leading metadata block.
const METADATA_DELIMITER: &str = "---";

/// Remove all markup outside the leading metadata block.
///
/// The metadata block is the region between the first and second bare `---`
/// line and passes through unmodified.
///
/// # Example
/// ```
/// let out = mendmark::strip_all("---\ntitle: x\n---\n<div>hi</div>");
/// assert_eq!(out, "---\ntitle: x\n---\nhi");
/// ```
pub fn strip_all(document: &str) -> String {
    let (masked, store) = verbatim::protect(document);

    let mut out = String::with_capacity(masked.len());
    let mut delimiters_seen = 0u32;
    for (i, line) in masked.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.trim() == METADATA_DELIMITER {
            delimiters_seen += 1;
            out.push_str(line);
            continue;
        }
        if delimiters_seen == 1 {
            // Inside the metadata block.
            out.push_str(line);
            continue;
        }
        strip_line_into(&mut out, line);
    }

    verbatim::restore(&out, &store)
}

/// Delete tag-shaped sequences from one line, then decode entities.
fn strip_line_into(out: &mut String, line: &str) {
    let bytes = line.as_bytes();
    let mut cleaned = String::with_capacity(line.len());
    let mut pos = 0;
    while let Some(rel) = memchr(b'<', &bytes[pos..]) {
        let lt = pos + rel;
        match memchr(b'>', &bytes[lt + 1..]) {
            // Anything bracketed goes, valid tag or not; `<>` stays.
            Some(close) if close > 0 => {
                cleaned.push_str(&line[pos..lt]);
                pos = lt + 1 + close + 1;
            }
            _ => {
                cleaned.push_str(&line[pos..lt + 1]);
                pos = lt + 1;
            }
        }
    }
    cleaned.push_str(&line[pos..]);
    out.push_str(&html_escape::decode_html_entities(&cleaned));
}
