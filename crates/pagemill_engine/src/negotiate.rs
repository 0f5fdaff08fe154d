use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// Why a content-negotiation attempt did not produce markdown.
///
/// Callers treat every reason as "unsupported, use the browser path"; the
/// distinction exists so tests can assert why the shortcut fell through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    /// The request could not be built, sent or completed in time.
    Transport(String),
    /// The origin answered with a non-markdown content type.
    ContentType(Option<String>),
    /// The response body could not be read.
    Body(String),
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::Transport(message) => write!(f, "transport error: {message}"),
            Unsupported::ContentType(Some(ct)) => write!(f, "content type {ct}"),
            Unsupported::ContentType(None) => write!(f, "no content type"),
            Unsupported::Body(message) => write!(f, "reading body: {message}"),
        }
    }
}

/// Requests a markdown representation of `url` directly from the origin.
///
/// Issues one GET with `Accept: text/markdown` and succeeds only when the
/// response declares a markdown content type. The HTTP status is not
/// inspected; only the declared representation decides.
pub async fn negotiate_markdown(url: &str, timeout: Duration) -> Result<String, Unsupported> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| Unsupported::Transport(err.to_string()))?;

    let response = client
        .get(url)
        .header(ACCEPT, MARKDOWN_CONTENT_TYPE)
        .send()
        .await
        .map_err(|err| Unsupported::Transport(err.to_string()))?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    match content_type.as_deref() {
        Some(ct) if ct.starts_with(MARKDOWN_CONTENT_TYPE) => {}
        _ => return Err(Unsupported::ContentType(content_type)),
    }

    response
        .text()
        .await
        .map_err(|err| Unsupported::Body(err.to_string()))
}
