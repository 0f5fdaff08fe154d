use std::sync::OnceLock;

use htmd::HtmlToMarkdown;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("converting HTML to markdown: {0}")]
    Conversion(String),
}

/// Converts sanitized HTML into markdown.
pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> Result<String, ConvertError>;
}

/// Whole-document converter backed by htmd.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmdConverter;

impl HtmdConverter {
    fn shared() -> &'static HtmlToMarkdown {
        static CONVERTER: OnceLock<HtmlToMarkdown> = OnceLock::new();
        CONVERTER.get_or_init(|| {
            HtmlToMarkdown::builder()
                .skip_tags(vec!["head", "script", "style"])
                .build()
        })
    }
}

impl Converter for HtmdConverter {
    fn to_markdown(&self, html: &str) -> Result<String, ConvertError> {
        Self::shared()
            .convert(html)
            .map_err(|err| ConvertError::Conversion(err.to_string()))
    }
}
