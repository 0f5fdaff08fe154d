use std::time::Duration;

use thiserror::Error;

/// How the markdown for a request was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    /// The origin served markdown directly via content negotiation.
    Negotiated,
    /// The page was rendered in a browser and converted.
    Rendered,
}

impl FetchMethod {
    /// Tag used in frontmatter output.
    pub fn as_str(self) -> &'static str {
        match self {
            FetchMethod::Negotiated => "markdown",
            FetchMethod::Rendered => "browser",
        }
    }
}

/// Immutable description of a single conversion request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub url: String,
    /// Deadline spanning navigation, load and DOM-stability waits.
    pub timeout: Duration,
    /// Unconditional delay after the page settles, for known slow renderers.
    pub extra_wait: Duration,
    pub user_agent: Option<String>,
    pub mobile: bool,
    pub keep_images: bool,
    pub keep_nav: bool,
    pub frontmatter: bool,
    pub article: bool,
}

impl PageRequest {
    /// A request for `url` with the default 15 second timeout and all
    /// toggles off.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(15),
            extra_wait: Duration::ZERO,
            user_agent: None,
            mobile: false,
            keep_images: false,
            keep_nav: false,
            frontmatter: false,
            article: false,
        }
    }
}

/// Raw output of a browser fetch.
///
/// `html` is empty only when navigation failed before any content arrived;
/// a mid-pipeline timeout still carries whatever HTML the page had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub timed_out: bool,
    pub method: FetchMethod,
}

/// Hard failures of the browser fetch path. Deadline overruns are not
/// errors; they surface as `RenderedPage::timed_out`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connecting to browser: {0}")]
    Connect(String),
    #[error("creating page: {0}")]
    Page(String),
    #[error("setting mobile viewport: {0}")]
    Emulation(String),
    #[error("setting user agent: {0}")]
    UserAgent(String),
    #[error("navigating to {url}: {message}")]
    Navigation { url: String, message: String },
    #[error("waiting for page load: {0}")]
    Load(String),
    #[error("waiting for DOM stable: {0}")]
    Stability(String),
    #[error("extracting HTML: {0}")]
    Extract(String),
}
