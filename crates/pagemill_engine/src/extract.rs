use dom_smoothie::Readability;
use engine_logging::engine_debug;

use crate::convert::{ConvertError, Converter};

/// Why readability extraction fell back to full-page conversion.
///
/// The public contract hides the fallback entirely; the tag exists so tests
/// can assert which degradation path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The extractor rejected the document outright.
    ParseFailed,
    /// Extraction succeeded but the article body was empty after trimming.
    EmptyBody,
}

/// Result of [`article_markdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub markdown: String,
    pub fallback: Option<FallbackReason>,
}

/// Converts the entire page to markdown. Conversion failure is a hard error.
pub fn full_markdown(converter: &dyn Converter, html: &str) -> Result<String, ConvertError> {
    converter.to_markdown(html)
}

/// Extracts the main article (title, byline, body) and converts it to
/// markdown. Extraction failure of any kind falls back to full-page
/// conversion and is never surfaced; converter failure remains fatal.
pub fn article_markdown(converter: &dyn Converter, html: &str) -> Result<Extraction, ConvertError> {
    let article = match parse_article(html) {
        Some(article) => article,
        None => return fall_back(converter, html, FallbackReason::ParseFailed),
    };

    let body = converter.to_markdown(&article.content)?;
    let body = body.trim();
    if body.is_empty() {
        return fall_back(converter, html, FallbackReason::EmptyBody);
    }

    Ok(Extraction {
        markdown: compose_article(article.title.trim(), article.byline.as_deref(), body),
        fallback: None,
    })
}

fn parse_article(html: &str) -> Option<dom_smoothie::Article> {
    let mut readability = Readability::new(html, None, None).ok()?;
    readability.parse().ok()
}

fn fall_back(
    converter: &dyn Converter,
    html: &str,
    reason: FallbackReason,
) -> Result<Extraction, ConvertError> {
    engine_debug!("readability fell back to full conversion: {reason:?}");
    Ok(Extraction {
        markdown: full_markdown(converter, html)?,
        fallback: Some(reason),
    })
}

/// Composes `# Title`, `*Byline*` and the body, blank-line separated, with a
/// trailing newline. Empty title or byline blocks are omitted.
fn compose_article(title: &str, byline: Option<&str>, body: &str) -> String {
    let mut out = String::new();
    if !title.is_empty() {
        out.push_str(&format!("# {title}\n\n"));
    }
    if let Some(byline) = byline.map(str::trim) {
        if !byline.is_empty() {
            out.push_str(&format!("*{byline}*\n\n"));
        }
    }
    out.push_str(body);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::compose_article;

    #[test]
    fn compose_includes_title_and_byline_blocks() {
        let out = compose_article("The Title", Some("Jane Doe"), "Body text");
        assert_eq!(out, "# The Title\n\n*Jane Doe*\n\nBody text\n");
    }

    #[test]
    fn compose_omits_empty_title_and_byline() {
        assert_eq!(compose_article("", None, "Body"), "Body\n");
        assert_eq!(compose_article("", Some("   "), "Body"), "Body\n");
    }
}
