use std::sync::LazyLock;

use pulldown_cmark::{Options, Parser};
use pulldown_cmark_to_cmark::cmark;
use regex::Regex;
use thiserror::Error;

// Links whose target is empty or a same-page anchor; dead weight outside
// page context.
static JUNK_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\((#[^)]*|\s*)?\)").unwrap());

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("formatting markdown: {0}")]
    Format(String),
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Replaces markdown links with an empty or `#anchor` target by their bare
/// text. Idempotent: the replacement contains no link syntax to re-match.
pub fn strip_junk_links(markdown: &str) -> String {
    JUNK_LINK_RE.replace_all(markdown, "$1").into_owned()
}

/// Reparses the markdown and re-renders it canonically (ATX headings,
/// normalized blank lines) to remove conversion-induced whitespace
/// irregularities.
pub fn format_markdown(markdown: &str) -> Result<String, FormatError> {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut out = String::new();
    cmark(parser, &mut out).map_err(|err| FormatError::Format(err.to_string()))?;
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
