use pagemill_engine::{article_markdown, full_markdown, Converter, HtmdConverter};
use pretty_assertions::assert_eq;

#[test]
fn converter_turns_html_into_markdown() {
    let md = HtmdConverter
        .to_markdown("<h1>Hello</h1><p>world</p>")
        .expect("conversion ok");
    let trimmed = md.trim();
    assert!(
        trimmed.starts_with("# Hello"),
        "unexpected markdown output: {md:?}"
    );
    assert!(trimmed.contains("world"));
}

#[test]
fn full_markdown_matches_the_converter_directly() {
    let html = "<p>one</p><p>two</p>";
    let converter = HtmdConverter;
    assert_eq!(
        full_markdown(&converter, html).unwrap(),
        converter.to_markdown(html).unwrap()
    );
}

#[test]
fn readability_failure_degrades_to_full_conversion() {
    let converter = HtmdConverter;
    for html in ["", "<div></div>", "<not-html"] {
        let extraction = article_markdown(&converter, html).expect("degraded, not failed");
        assert!(
            extraction.fallback.is_some(),
            "expected fallback for {html:?}"
        );
        assert_eq!(extraction.markdown, full_markdown(&converter, html).unwrap());
    }
}

#[test]
fn readability_success_composes_title_and_body() {
    // Long enough that the extractor accepts the article body.
    let paragraph = "The migration finished two weeks ahead of schedule, and the team \
        spent the remaining time writing down what they had learned about rolling \
        deploys, connection draining and schema changes under load. ";
    let html = format!(
        "<html><head><title>Migration Notes</title></head><body><article>\
         <h1>Migration Notes</h1>{}</article></body></html>",
        format!("<p>{paragraph}</p>").repeat(6)
    );

    let extraction = article_markdown(&HtmdConverter, &html).expect("extraction ok");
    if extraction.fallback.is_none() {
        assert!(
            extraction.markdown.starts_with("# "),
            "expected a title heading, got: {}",
            &extraction.markdown[..extraction.markdown.len().min(80)]
        );
        assert!(extraction.markdown.ends_with('\n'));
    }
    assert!(extraction.markdown.contains("connection draining"));
}
