use pulldown_cmark::{html, Options, Parser};

const PAGE_PREFIX: &str = r#"<!DOCTYPE html>
<html><head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>pagemill preview</title>
<style>
body { max-width: 800px; margin: 40px auto; padding: 0 20px;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
  line-height: 1.6; color: #333; background: #fff; }
h1, h2, h3 { margin-top: 1.5em; }
code { background: #f4f4f4; padding: 2px 6px; border-radius: 3px; font-size: 0.9em; }
pre { background: #f4f4f4; padding: 16px; border-radius: 6px; overflow-x: auto; }
pre code { background: none; padding: 0; }
blockquote { border-left: 4px solid #ddd; margin-left: 0; padding-left: 16px; color: #666; }
img { max-width: 100%; }
a { color: #0366d6; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ddd; padding: 8px 12px; }
@media (prefers-color-scheme: dark) {
  body { background: #1a1a1a; color: #d4d4d4; }
  code, pre { background: #2d2d2d; }
  blockquote { border-color: #555; color: #aaa; }
  a { color: #58a6ff; }
  th, td { border-color: #444; }
}
</style>
</head><body>
"#;

const PAGE_SUFFIX: &str = "\n</body></html>\n";

/// Renders markdown into a complete, self-contained HTML page with an
/// embedded stylesheet supporting light and dark schemes.
pub fn render_preview(markdown: &str) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
    );
    let mut body = String::new();
    html::push_html(&mut body, parser);
    format!("{PAGE_PREFIX}{body}{PAGE_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::render_preview;

    #[test]
    fn preview_is_a_complete_document() {
        let page = render_preview("# Hello\n\nworld\n");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h1>Hello</h1>"));
        assert!(page.contains("prefers-color-scheme: dark"));
        assert!(page.ends_with("</body></html>\n"));
    }
}
