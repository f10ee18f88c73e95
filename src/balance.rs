//! Tag balance analysis and structural repair.
//!
//! A single left-to-right pass over the tag tokens drives a nesting stack.
//! Closing tags match the *nearest* enclosing open tag with the same name;
//! entries stacked above a matched opener stay put and surface as unclosed.
//! This is tag-soup recovery, not XML well-formedness: a simpler
//! top-of-stack-only match would change which tags get flagged.

use smallvec::SmallVec;

use crate::tag::{TagKind, TagToken, scan_tags};

/// What a scan found wrong with a document's tag structure.
#[derive(Debug, Default)]
pub struct Analysis {
    /// Closing tags with no open tag to match, in scan order.
    pub orphan_closers: Vec<TagToken>,
    /// Open tags never closed, in stack order (innermost last).
    pub unclosed_openers: Vec<TagToken>,
}

impl Analysis {
    /// True when repair would leave the text unchanged.
    pub fn is_balanced(&self) -> bool {
        self.orphan_closers.is_empty() && self.unclosed_openers.is_empty()
    }
}

/// Classify every tag token in `text` as matched, orphan, or unclosed.
///
/// # Example
/// ```
/// let analysis = mendmark::balance::analyze("<div><p>hi");
/// assert_eq!(analysis.unclosed_openers.len(), 2);
/// assert!(analysis.orphan_closers.is_empty());
/// ```
pub fn analyze(text: &str) -> Analysis {
    let mut stack: SmallVec<[TagToken; 16]> = SmallVec::new();
    let mut orphan_closers = Vec::new();

    for token in scan_tags(text) {
        match token.kind {
            TagKind::SelfClosing => {}
            TagKind::Open => stack.push(token),
            TagKind::Close => {
                match stack.iter().rposition(|open| open.name_eq(text, &token)) {
                    // Nearest enclosing same-name entry; anything stacked
                    // above it stays and is reported unclosed later.
                    Some(i) => {
                        stack.remove(i);
                    }
                    None => orphan_closers.push(token),
                }
            }
        }
    }

    Analysis {
        orphan_closers,
        unclosed_openers: stack.into_vec(),
    }
}

/// Apply an analysis to `text`: delete orphan closers, then append synthetic
/// closers for whatever stayed open.
///
/// Deletion runs in descending source-offset order so earlier removals never
/// invalidate later spans. Appended closers go at the very end in reverse
/// stack order (innermost first), lowercased. Running `analyze` on the
/// result finds nothing left to repair.
pub fn repair(text: &str, analysis: &Analysis) -> String {
    let mut out = String::with_capacity(text.len() + analysis.unclosed_openers.len() * 8);
    out.push_str(text);

    for orphan in analysis.orphan_closers.iter().rev() {
        out.replace_range(orphan.start..orphan.end, "");
    }

    for opener in analysis.unclosed_openers.iter().rev() {
        out.push_str("</");
        out.push_str(&opener.name(text).to_ascii_lowercase());
        out.push('>');
    }
    out
}
