//! mendmark: markup repair for generated Markdown/HTML documents
//!
//! Automated content generators emit hybrid markdown/HTML that strict
//! template compilers reject: orphan closing tags, unclosed openers, angle
//! brackets in prose. This crate repairs such documents instead of
//! rejecting them.
//!
//! # Design Principles
//! - Total functions: any input string produces an output, never an error
//! - No regex: pure byte-level scanning
//! - Code regions survive every pass byte-for-byte
//! - Deterministic, idempotent repair
//!
//! The pipeline: protect code regions, escape prose-only brackets, analyze
//! tag balance, repair, restore code regions. [`strip_all`] is the lossy
//! fallback for documents repair cannot save; [`validate()`] is the advisory
//! pre-check that helps a caller pick between the two.

pub mod balance;
pub mod escape;
pub mod strip;
pub mod tag;
pub mod validate;
pub mod verbatim;

// Re-export primary types
pub use balance::{Analysis, analyze, repair};
pub use tag::{TagKind, TagToken, scan_tags};
pub use validate::Report;
pub use verbatim::VerbatimStore;

pub use strip::strip_all;

/// Repair malformed markup in a document.
///
/// This is the primary API. It never rejects: structural problems are
/// repaired, prose-like brackets are escaped, and code regions come through
/// untouched.
///
/// # Example
/// ```
/// assert_eq!(mendmark::sanitize("<div><p>hello"), "<div><p>hello</p></div>");
/// assert_eq!(mendmark::sanitize("<p>hello</p></div>"), "<p>hello</p>");
/// ```
pub fn sanitize(document: &str) -> String {
    let (masked, store) = verbatim::protect(document);
    let escaped = escape::escape_prose(&masked);
    let analysis = balance::analyze(&escaped);
    let repaired = balance::repair(&escaped, &analysis);
    verbatim::restore(&repaired, &store)
}

/// Advisory structural check. Never mutates; findings are warnings for the
/// caller, not errors.
///
/// # Example
/// ```
/// assert!(mendmark::validate("<p>fine</p>").valid);
/// assert!(!mendmark::validate("</ p>").valid);
/// ```
pub fn validate(document: &str) -> Report {
    validate::check(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphan_removal() {
        assert_eq!(sanitize("<p>hello</p></div>"), "<p>hello</p>");
    }

    #[test]
    fn test_unclosed_closing() {
        assert_eq!(sanitize("<div><p>hello"), "<div><p>hello</p></div>");
    }

    #[test]
    fn test_nearest_match_tie_break() {
        assert_eq!(
            sanitize("<div><span><div>inner</div>"),
            "<div><span><div>inner</div></span></div>"
        );
    }

    #[test]
    fn test_prose_escaping() {
        assert_eq!(
            sanitize("Array<string> is a type"),
            "Array&lt;string&gt; is a type"
        );
        assert_eq!(sanitize("<div>ok</div>"), "<div>ok</div>");
    }

    #[test]
    fn test_code_region_immunity() {
        assert_eq!(
            sanitize("see `<div>` broken <p>"),
            "see `<div>` broken <p></p>"
        );
    }

    #[test]
    fn test_fenced_region_immunity() {
        let doc = "intro\n```\n<div><oops>\n```\ntail <p>";
        assert_eq!(sanitize(doc), "intro\n```\n<div><oops>\n```\ntail <p></p>");
    }

    #[test]
    fn test_well_formed_unchanged() {
        let doc = "# Title\n\n<div>\n  <p>body</p>\n</div>\n";
        assert_eq!(sanitize(doc), doc);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(strip_all(""), "");
        assert!(validate("").valid);
    }

    #[test]
    fn test_sanitize_idempotent() {
        let docs = [
            "<div><p>hello",
            "<p>x</p></div></span>",
            "a < b, Vec<T>, `<kept>`",
            "<div><span><div>inner</div></span>",
            "text with trailing ` tick",
        ];
        for doc in docs {
            let once = sanitize(doc);
            assert_eq!(sanitize(&once), once, "not idempotent for {doc:?}");
        }
    }

    #[test]
    fn test_no_placeholder_leakage() {
        let docs = [
            "`a` ```\nb\n``` `c`",
            "<div>`x`",
            "`tick` </div> `tock`",
        ];
        for doc in docs {
            assert!(!sanitize(doc).contains('\u{1A}'), "leak in sanitize({doc:?})");
            assert!(!strip_all(doc).contains('\u{1A}'), "leak in strip_all({doc:?})");
        }
    }

    #[test]
    fn test_validate_then_repair_flow() {
        let doc = "<div class=\"card\">\nunfinished";
        assert!(!validate(doc).valid);
        let fixed = sanitize(doc);
        assert_eq!(fixed, "<div class=\"card\">\nunfinished</div>");
    }
}
