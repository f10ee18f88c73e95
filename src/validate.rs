//! Advisory structural validation.
//!
//! A cheap heuristic pass, independent of the repair pipeline: it flags
//! documents that are likely to be rejected downstream but never mutates
//! anything. Callers use it to decide whether repair is worth attempting or
//! whether to escalate straight to the aggressive stripper. Its findings are
//! warnings, not errors; nothing here feeds back into the repairer.

use memchr::{memchr_iter, memmem};

use crate::tag::{TagKind, parse_tag_at};
use crate::verbatim;

/// How far the `<` / `>` counts may drift before it is worth reporting.
const BRACKET_TOLERANCE: usize = 2;

/// Validation outcome. `valid` is simply "no findings".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Run all structural checks against `document`.
///
/// Code regions are excluded by removal first, since markup inside code is
/// legitimate text.
///
/// # Example
/// ```
/// let report = mendmark::validate("</ div>");
/// assert!(!report.valid);
/// assert_eq!(report.errors.len(), 1);
/// ```
pub fn check(document: &str) -> Report {
    let text = verbatim::strip_regions(document);
    let mut errors = Vec::new();

    check_bracket_counts(&text, &mut errors);
    check_generic_shape(&text, &mut errors);
    check_space_after_close_slash(&text, &mut errors);
    check_unclosed_at_line_end(&text, &mut errors);

    Report {
        valid: errors.is_empty(),
        errors,
    }
}

/// Gross magnitude mismatch between `<`-like openers and `>`-like closers.
/// Comment markers (`<!`, `<-`, `->`) are not counted.
fn check_bracket_counts(text: &str, errors: &mut Vec<String>) {
    let bytes = text.as_bytes();
    let openers = memchr_iter(b'<', bytes)
        .filter(|&lt| !matches!(bytes.get(lt + 1), Some(&b'!') | Some(&b'-')))
        .count();
    let closers = memchr_iter(b'>', bytes)
        .filter(|&gt| gt == 0 || bytes[gt - 1] != b'-')
        .count();
    if openers.abs_diff(closers) > BRACKET_TOLERANCE {
        errors.push(format!(
            "Angle bracket mismatch: {openers} opening vs {closers} closing"
        ));
    }
}

/// A generic-type shape (`Upper<Upper...>`) outside any code region almost
/// always means un-escaped prose.
fn check_generic_shape(text: &str, errors: &mut Vec<String>) {
    let bytes = text.as_bytes();
    for lt in memchr_iter(b'<', bytes) {
        // Some word-character run ending in an uppercase-led suffix must
        // touch the `<`.
        let before_is_type = lt > 0
            && is_word_byte(bytes[lt - 1])
            && word_run_before(bytes, lt).any(|b| b.is_ascii_uppercase());
        if !before_is_type {
            continue;
        }
        if !bytes.get(lt + 1).is_some_and(u8::is_ascii_uppercase) {
            continue;
        }
        let mut pos = lt + 2;
        while bytes.get(pos).is_some_and(|&b| is_word_byte(b)) {
            pos += 1;
        }
        if bytes.get(pos) == Some(&b'>') && bytes.get(pos + 1) != Some(&b'`') {
            errors.push("Suspicious pattern: Generic type outside code block".to_string());
            return;
        }
    }
}

/// `</ name>` — whitespace between the close slash and the name.
fn check_space_after_close_slash(text: &str, errors: &mut Vec<String>) {
    let bytes = text.as_bytes();
    for slash in memmem::find_iter(bytes, b"</") {
        let mut pos = slash + 2;
        let ws_start = pos;
        while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
            pos += 1;
        }
        if pos == ws_start {
            continue;
        }
        let word_start = pos;
        while bytes.get(pos).is_some_and(|&b| is_word_byte(b)) {
            pos += 1;
        }
        if pos > word_start && bytes.get(pos) == Some(&b'>') {
            errors.push("Suspicious pattern: Space after </".to_string());
            return;
        }
    }
}

/// A line that ends with an attributed, non-self-closed open tag whose name
/// never gets a closer afterwards. Void elements are exempt: they cannot be
/// unclosed.
fn check_unclosed_at_line_end(text: &str, errors: &mut Vec<String>) {
    let mut offset = 0;
    for line in text.split('\n') {
        let line_end = offset + line.len();
        if let Some(name) = attributed_open_tag_at_line_end(line) {
            if !has_closer_for(&text[line_end..], name) {
                errors.push("Suspicious pattern: Possibly unclosed tag at end of line".to_string());
                return;
            }
        }
        offset = line_end + 1;
    }
}

/// The name of an open tag with attributes sitting at the end of `line`
/// (trailing whitespace allowed), if any.
fn attributed_open_tag_at_line_end(line: &str) -> Option<&str> {
    let trimmed = line.trim_end();
    if !trimmed.ends_with('>') {
        return None;
    }
    let lt = trimmed.rfind('<')?;
    let token = parse_tag_at(trimmed, lt)?;
    if token.end != trimmed.len() || token.kind != TagKind::Open {
        return None;
    }
    let name = token.name(trimmed);
    // Attributes are required: whitespace must follow the name.
    let after_name = trimmed.as_bytes().get(lt + 1 + name.len())?;
    if !after_name.is_ascii_whitespace() {
        return None;
    }
    Some(name)
}

/// Whether `rest` contains a `</name` closer, case-insensitively, at a word
/// boundary.
fn has_closer_for(rest: &str, name: &str) -> bool {
    let bytes = rest.as_bytes();
    for slash in memmem::find_iter(bytes, b"</") {
        let start = slash + 2;
        let end = start + name.len();
        if end > bytes.len() {
            return false;
        }
        if bytes[start..end].eq_ignore_ascii_case(name.as_bytes())
            && !bytes.get(end).is_some_and(u8::is_ascii_alphanumeric)
        {
            return true;
        }
    }
    false
}

/// Word-character run immediately before `end`, innermost byte first.
fn word_run_before(bytes: &[u8], end: usize) -> impl Iterator<Item = u8> + '_ {
    bytes[..end]
        .iter()
        .rev()
        .take_while(|&&b| is_word_byte(b))
        .copied()
}

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
