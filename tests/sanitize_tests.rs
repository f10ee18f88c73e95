use mendmark::{analyze, sanitize};

#[test]
fn orphan_closer_removed() {
    assert_eq!(sanitize("<p>hello</p></div>"), "<p>hello</p>");
}

#[test]
fn orphan_closer_removed_mid_text() {
    assert_eq!(sanitize("before </div> after"), "before  after");
}

#[test]
fn unclosed_openers_closed_innermost_first() {
    assert_eq!(sanitize("<div><p>hello"), "<div><p>hello</p></div>");
}

#[test]
fn nearest_match_prefers_innermost_same_name() {
    // The inner </div> pairs with the inner <div>, not the outer one.
    // <span> stays open across the match and closes at the end.
    assert_eq!(
        sanitize("<div><span><div>inner</div>"),
        "<div><span><div>inner</div></span></div>"
    );
}

#[test]
fn nearest_match_with_span_closed_explicitly() {
    assert_eq!(
        sanitize("<div><span><div>inner</div></span>"),
        "<div><span><div>inner</div></span></div>"
    );
}

#[test]
fn well_formed_document_unchanged() {
    let doc = "# Title\n\n<div class=\"card\">\n  <p>body</p>\n</div>\n\ndone\n";
    assert_eq!(sanitize(doc), doc);
}

#[test]
fn void_elements_need_no_closer() {
    let doc = "line one<br>\n<hr>\n<img src=\"x.png\">\n";
    assert_eq!(sanitize(doc), doc);
}

#[test]
fn self_closing_syntax_needs_no_closer() {
    assert_eq!(sanitize("<custom/>"), "<custom/>");
}

#[test]
fn mixed_case_tags_match() {
    assert_eq!(sanitize("<DIV>x</div>"), "<DIV>x</div>");
    assert_eq!(sanitize("<Span>x"), "<Span>x</span>");
}

#[test]
fn prose_comparisons_escaped() {
    assert_eq!(sanitize("if x < 10 then y > 3"), "if x &lt; 10 then y &gt; 3");
}

#[test]
fn generic_types_escaped() {
    assert_eq!(
        sanitize("returns Promise<void> and Map<K, V>"),
        "returns Promise&lt;void&gt; and Map&lt;K, V&gt;"
    );
}

#[test]
fn known_tag_before_bracket_preserved() {
    // `code<T>` keeps its brackets because `code` is a known element name;
    // the resulting <T> is then treated as a real tag and closed.
    assert_eq!(sanitize("code<T>"), "code<T></t>");
}

#[test]
fn inline_code_immune() {
    assert_eq!(
        sanitize("see `<div>` broken <p>"),
        "see `<div>` broken <p></p>"
    );
}

#[test]
fn fenced_code_immune() {
    let doc = "intro\n```html\n<div><span>\n</notreal>\n```\noutro";
    assert_eq!(sanitize(doc), doc);
}

#[test]
fn fenced_code_with_generics_immune() {
    let doc = "```ts\nconst x: Array<string> = [];\n```\n";
    assert_eq!(sanitize(doc), doc);
}

#[test]
fn repair_applies_outside_code_only() {
    let doc = "```\n<unclosed>\n```\n<div>text";
    assert_eq!(sanitize(doc), "```\n<unclosed>\n```\n<div>text</div>");
}

#[test]
fn comments_pass_through() {
    assert_eq!(sanitize("<!-- keep me -->"), "<!-- keep me -->");
}

#[test]
fn empty_and_whitespace() {
    assert_eq!(sanitize(""), "");
    assert_eq!(sanitize("   \n\n   "), "   \n\n   ");
}

#[test]
fn crlf_documents_survive() {
    assert_eq!(sanitize("<div>a\r\nb"), "<div>a\r\nb</div>");
}

#[test]
fn deeply_nested_unclosed() {
    assert_eq!(
        sanitize("<div><ul><li><em>x"),
        "<div><ul><li><em>x</em></li></ul></div>"
    );
}

#[test]
fn orphans_and_unclosed_together() {
    // </section> has no opener and goes away; <article> never closes and
    // gets a closer at the end.
    assert_eq!(
        sanitize("<article>one</section>two"),
        "<article>onetwo</article>"
    );
}

#[test]
fn sanitize_output_is_fixed_point() {
    let docs = [
        "<div><p>a",
        "</div>",
        "a < b and c > d",
        "Vec<Vec<T>> in prose",
        "mix `<code>` and <div><span>",
        "<!-- c --> <p>x</p></p>",
        "<DIV><p>deep<br>",
    ];
    for doc in docs {
        let once = sanitize(doc);
        let twice = sanitize(&once);
        assert_eq!(twice, once, "sanitize not idempotent for {doc:?}");
        assert!(
            analyze(&once).is_balanced() || once.contains('`'),
            "repaired output still unbalanced for {doc:?}: {once:?}"
        );
    }
}

#[test]
fn repaired_output_passes_analyzer() {
    let doc = "<div><span>text</div> stray</b>";
    let once = sanitize(doc);
    assert!(analyze(&once).is_balanced(), "still unbalanced: {once:?}");
}
