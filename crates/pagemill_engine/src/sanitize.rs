//! HTML sanitization: pure text-to-text passes removing non-visible content
//! and structural boilerplate before markdown conversion.
//!
//! The document is never parsed into a tree. Statically bracketed elements
//! (`<script>`, `<nav>`, ...) fall to non-greedy regexes; attribute-matched
//! elements go through [`strip_balanced`], a linear scan that tracks nesting
//! depth of same-named tags to find the true matching close tag.

use std::sync::LazyLock;

use regex::Regex;

// Non-visible content that adds noise and prompt-injection risk.
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap());
static NOSCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<noscript\b[^>]*>.*?</noscript>").unwrap());
static TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<template\b[^>]*>.*?</template>").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static ZERO_WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{200B}\u{200C}\u{200D}\u{FEFF}\u{2060}\u{202A}\u{202B}\u{202C}\u{202D}\u{202E}]")
        .unwrap()
});

// Opening-tag matchers for attribute-based stripping (capture group 1 = tag
// name).
static HIDDEN_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(\w+)\b[^>]*\bhidden\b[^>]*>").unwrap());
static ARIA_HIDDEN_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<(\w+)\b[^>]*\baria-hidden\s*=\s*"true"[^>]*>"#).unwrap());
static DISPLAY_NONE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(\w+)\b[^>]*\bstyle\s*=\s*"[^"]*display\s*:\s*none[^"]*"[^>]*>"#).unwrap()
});
static VISIBILITY_HIDDEN_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(\w+)\b[^>]*\bstyle\s*=\s*"[^"]*visibility\s*:\s*hidden[^"]*"[^>]*>"#)
        .unwrap()
});

// Cookie/consent banner matchers: common consent SDK wrapper ids and
// role="dialog" modals.
static CONSENT_ID_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<(\w+)\b[^>]*\bid\s*=\s*"(?:onetrust-consent-sdk|cookiebot|CybotCookiebotDialog|cookie-consent|cookie-banner|cookie-notice|consent-banner|gdpr-consent|cc-window|cc_div)"[^>]*>"#,
    )
    .unwrap()
});
static ROLE_DIALOG_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(\w+)\b[^>]*\brole\s*=\s*"(?:dialog|alertdialog)"[^>]*>"#).unwrap()
});

// Semantic boilerplate. Nav is stripped everywhere; header/footer/aside only
// outside <article>, where they are page furniture rather than content.
static NAV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<nav\b[^>]*>.*?</nav>").unwrap());
static ROLE_NAV_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<(\w+)\b[^>]*\brole\s*=\s*"navigation"[^>]*>"#).unwrap());

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<header\b[^>]*>.*?</header>").unwrap());
static FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<footer\b[^>]*>.*?</footer>").unwrap());
static ASIDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<aside\b[^>]*>.*?</aside>").unwrap());

static ROLE_BANNER_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<(\w+)\b[^>]*\brole\s*=\s*"banner"[^>]*>"#).unwrap());
static ROLE_CONTENTINFO_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<(\w+)\b[^>]*\brole\s*=\s*"contentinfo"[^>]*>"#).unwrap());
static ROLE_COMPLEMENTARY_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(\w+)\b[^>]*\brole\s*=\s*"complementary"[^>]*>"#).unwrap()
});

static ARTICLE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<article\b[^>]*>").unwrap());
static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<article\b[^>]*>.*?</article>").unwrap());

static IMG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*/?>").unwrap());

/// Removes non-visible HTML content: script/style/noscript/template elements,
/// HTML comments, hidden/aria-hidden elements, display:none and
/// visibility:hidden elements, cookie/consent banners, modal dialogs, and
/// zero-width or bidirectional-control characters.
pub fn strip_hidden(html: &str) -> String {
    // Scripts and comments go first so the attribute scans below never have
    // to look inside script bodies.
    let html = SCRIPT_RE.replace_all(html, "");
    let html = STYLE_RE.replace_all(&html, "");
    let html = NOSCRIPT_RE.replace_all(&html, "");
    let html = TEMPLATE_RE.replace_all(&html, "");
    let html = COMMENT_RE.replace_all(&html, "").into_owned();

    let html = strip_balanced(html, &HIDDEN_OPEN_RE);
    let html = strip_balanced(html, &ARIA_HIDDEN_OPEN_RE);
    let html = strip_balanced(html, &DISPLAY_NONE_OPEN_RE);
    let html = strip_balanced(html, &VISIBILITY_HIDDEN_OPEN_RE);
    let html = strip_balanced(html, &CONSENT_ID_OPEN_RE);
    let html = strip_balanced(html, &ROLE_DIALOG_OPEN_RE);

    ZERO_WIDTH_RE.replace_all(&html, "").into_owned()
}

/// Removes semantic navigation and boilerplate elements.
///
/// `<nav>` and `role="navigation"` are stripped everywhere, article or not.
/// Header, footer, aside and their ARIA role equivalents are only stripped
/// outside `<article>` spans; inside an article they are real content
/// (bylines, author bios).
pub fn strip_nav(html: &str) -> String {
    let html = NAV_RE.replace_all(html, "").into_owned();
    let html = strip_balanced(html, &ROLE_NAV_OPEN_RE);

    if !ARTICLE_OPEN_RE.is_match(&html) {
        return strip_page_furniture(html);
    }

    // Swap article spans for a placeholder, strip the remainder, then
    // restore the originals in order.
    let placeholder = article_placeholder(&html);
    let articles: Vec<&str> = ARTICLE_RE.find_iter(&html).map(|m| m.as_str()).collect();
    let shell = ARTICLE_RE
        .replace_all(&html, placeholder.as_str())
        .into_owned();
    let mut shell = strip_page_furniture(shell);
    for article in articles {
        shell = shell.replacen(&placeholder, article, 1);
    }
    shell
}

/// Removes `<img>` tags only, leaving surrounding content untouched.
pub fn strip_images(html: &str) -> String {
    IMG_RE.replace_all(html, "").into_owned()
}

fn strip_page_furniture(html: String) -> String {
    let html = HEADER_RE.replace_all(&html, "");
    let html = FOOTER_RE.replace_all(&html, "");
    let html = ASIDE_RE.replace_all(&html, "").into_owned();
    let html = strip_balanced(html, &ROLE_BANNER_OPEN_RE);
    let html = strip_balanced(html, &ROLE_CONTENTINFO_OPEN_RE);
    strip_balanced(html, &ROLE_COMPLEMENTARY_OPEN_RE)
}

/// Picks a placeholder token that does not occur anywhere in `html`, so a
/// literal occurrence of the sentinel in page text can never be clobbered.
fn article_placeholder(html: &str) -> String {
    let mut token = String::from("\u{0}article\u{0}");
    let mut n = 0u32;
    while html.contains(&token) {
        n += 1;
        token = format!("\u{0}article-{n}\u{0}");
    }
    token
}

/// Finds elements whose opening tag matches `open_re` (capture group 1 must
/// be the tag name) and deletes everything from the opening tag through the
/// balanced closing tag.
///
/// Flat patterns cannot express arbitrary nesting depth, so the scan counts
/// nested opens of the same tag name to locate the true matching close. If
/// the markup never balances, only the opening tag is deleted and scanning
/// continues from that point.
fn strip_balanced(mut html: String, open_re: &Regex) -> String {
    while let Some((open, name)) = find_open(&html, open_re) {
        let open_tag = format!("<{name}");
        let close_tag = format!("</{name}>");
        // ASCII lowercasing keeps byte offsets valid for the original text.
        let rest_lower = html[open.end..].to_ascii_lowercase();

        match matching_close(&rest_lower, &open_tag, &close_tag) {
            Some(end) => html.replace_range(open.start..open.end + end, ""),
            None => html.replace_range(open.clone(), ""),
        }
    }
    html
}

fn find_open(html: &str, open_re: &Regex) -> Option<(std::ops::Range<usize>, String)> {
    let caps = open_re.captures(html)?;
    let whole = caps.get(0)?;
    let name = caps.get(1)?.as_str().to_ascii_lowercase();
    Some((whole.range(), name))
}

/// Scans `rest` (the text after an already-consumed opening tag) for the
/// matching close tag, tracking nested opens of the same name. Returns the
/// offset just past the matching close, or None if the markup never
/// balances.
fn matching_close(rest: &str, open_tag: &str, close_tag: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = 0usize;
    while depth > 0 {
        let close_idx = rest[pos..].find(close_tag)?;
        depth += count_opens(&rest[pos..pos + close_idx], open_tag);
        depth -= 1;
        pos += close_idx + close_tag.len();
    }
    Some(pos)
}

/// Counts real opening tags of `open_tag` within `segment`. A hit only
/// counts when followed by whitespace, `>` or `/`, so `<b` never matches
/// `<body`.
fn count_opens(segment: &str, open_tag: &str) -> usize {
    let mut count = 0;
    let mut search = 0;
    while let Some(idx) = segment[search..].find(open_tag) {
        let next = search + idx + open_tag.len();
        if let Some(&ch) = segment.as_bytes().get(next) {
            if matches!(ch, b' ' | b'>' | b'/' | b'\t' | b'\n') {
                count += 1;
            }
        }
        search = next;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::{article_placeholder, matching_close};

    #[test]
    fn placeholder_sidesteps_literal_sentinel() {
        let html = "text \u{0}article\u{0} more";
        let token = article_placeholder(html);
        assert!(!html.contains(&token));
    }

    #[test]
    fn matching_close_skips_nested_same_named_tags() {
        // after consuming `<div hidden>`: one nested div, then both closes.
        let rest = "a<div>b</div>c</div>tail";
        let end = matching_close(rest, "<div", "</div>").unwrap();
        assert_eq!(&rest[end..], "tail");
    }

    #[test]
    fn matching_close_reports_unbalanced_markup() {
        assert_eq!(matching_close("<div>never closed", "<div", "</div>"), None);
    }
}
