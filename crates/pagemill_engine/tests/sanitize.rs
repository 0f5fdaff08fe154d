use pagemill_engine::{strip_hidden, strip_images, strip_nav};
use pretty_assertions::assert_eq;

#[test]
fn scripts_styles_and_comments_are_removed() {
    let html = "<div>hello</div><script>alert(1)</script><p>world</p>";
    assert_eq!(strip_hidden(html), "<div>hello</div><p>world</p>");

    let html = "<style>body { color: red }</style>a<!-- note -->b<noscript>x</noscript>";
    assert_eq!(strip_hidden(html), "ab");

    let html = "<template><li>row</li></template><p>kept</p>";
    assert_eq!(strip_hidden(html), "<p>kept</p>");
}

#[test]
fn attribute_scans_do_not_run_inside_script_bodies() {
    // The script mentions a hidden div; stripping scripts first means the
    // attribute pass never sees it.
    let html = r#"<script>var s = '<div hidden>';</script><p>ok</p>"#;
    assert_eq!(strip_hidden(html), "<p>ok</p>");
}

#[test]
fn nested_hidden_elements_remove_exactly_the_outer_span() {
    let html = "<div hidden>a<div hidden>b</div>c</div><p>keep</p>";
    assert_eq!(strip_hidden(html), "<p>keep</p>");

    // Same-named visible siblings after the hidden span stay intact.
    let html = "<div hidden><div>inner</div></div><div>visible</div>";
    assert_eq!(strip_hidden(html), "<div>visible</div>");
}

#[test]
fn unbalanced_hidden_element_drops_only_the_opening_tag() {
    let html = "<div hidden><p>truncated page";
    assert_eq!(strip_hidden(html), "<p>truncated page");
}

#[test]
fn aria_hidden_and_inline_styles_are_stripped() {
    let html = r#"<span aria-hidden="true">x</span>rest"#;
    assert_eq!(strip_hidden(html), "rest");

    let html = r#"<div style="display:none">gone</div>kept"#;
    assert_eq!(strip_hidden(html), "kept");

    // Tolerant of whitespace around the colon.
    let html = r#"<div style="display : none">gone</div>kept"#;
    assert_eq!(strip_hidden(html), "kept");

    let html = r#"<div style="visibility: hidden">gone</div>kept"#;
    assert_eq!(strip_hidden(html), "kept");
}

#[test]
fn consent_banners_and_dialogs_are_stripped() {
    let html = r#"<div id="onetrust-consent-sdk"><p>cookies?</p></div><main>content</main>"#;
    assert_eq!(strip_hidden(html), "<main>content</main>");

    let html = r#"<div role="dialog"><button>ok</button></div>after"#;
    assert_eq!(strip_hidden(html), "after");

    let html = r#"<div role="alertdialog">warning</div>after"#;
    assert_eq!(strip_hidden(html), "after");
}

#[test]
fn zero_width_and_bidi_characters_are_stripped() {
    let html = "a\u{200B}b\u{FEFF}c\u{202E}d";
    assert_eq!(strip_hidden(html), "abcd");
}

#[test]
fn nav_is_removed_everywhere_even_inside_articles() {
    let html = "<article><nav>toc</nav><p>body</p></article>";
    assert_eq!(strip_nav(html), "<article><p>body</p></article>");

    let html = r#"<div role="navigation"><a href="/">home</a></div><p>stay</p>"#;
    assert_eq!(strip_nav(html), "<p>stay</p>");
}

#[test]
fn page_furniture_is_removed_when_no_article_exists() {
    let html = "<header>head</header><main>content</main><footer>foot</footer><aside>ads</aside>";
    assert_eq!(strip_nav(html), "<main>content</main>");

    let html = r#"<div role="banner">b</div><div role="contentinfo">c</div><div role="complementary">d</div>x"#;
    assert_eq!(strip_nav(html), "x");
}

#[test]
fn article_interior_furniture_survives_byte_identical() {
    let html =
        "<header>head</header><main><article><h1>T</h1><p>B</p></article></main><footer>f</footer>";
    assert_eq!(
        strip_nav(html),
        "<main><article><h1>T</h1><p>B</p></article></main>"
    );

    // A byline header and author-bio footer inside the article are content.
    let article = "<article><header>By Jane</header><p>B</p><footer>Jane writes.</footer></article>";
    let html = format!("<header>site</header>{article}<footer>site</footer>");
    assert_eq!(strip_nav(&html), article);
}

#[test]
fn multiple_articles_are_restored_in_original_order() {
    let html = "<article>first</article><aside>x</aside><article>second</article>";
    assert_eq!(strip_nav(html), "<article>first</article><article>second</article>");
}

#[test]
fn literal_placeholder_text_in_the_page_is_preserved() {
    let html = "<article>A</article>\u{0}article\u{0}<header>h</header>";
    assert_eq!(strip_nav(html), "<article>A</article>\u{0}article\u{0}");
}

#[test]
fn images_are_removed_without_touching_surroundings() {
    let html = r#"before <img src="a.png" alt="x"> after"#;
    assert_eq!(strip_images(html), "before  after");

    let html = r#"<img src="a.png"/><p>text</p>"#;
    assert_eq!(strip_images(html), "<p>text</p>");
}
