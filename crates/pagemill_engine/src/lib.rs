//! Pagemill engine: renders web pages and converts them to clean markdown.
mod browser;
mod convert;
mod extract;
mod frontmatter;
mod negotiate;
mod pipeline;
mod postprocess;
mod preview;
mod sanitize;
mod timing;
mod types;

pub use browser::{Fetcher, PageFetcher};
pub use convert::{ConvertError, Converter, HtmdConverter};
pub use extract::{article_markdown, full_markdown, Extraction, FallbackReason};
pub use frontmatter::{build_frontmatter, Metadata};
pub use negotiate::{negotiate_markdown, Unsupported};
pub use pipeline::{convert_negotiated, convert_page, convert_rendered, Conversion, PipelineError};
pub use postprocess::{format_markdown, strip_junk_links, FormatError};
pub use preview::render_preview;
pub use sanitize::{strip_hidden, strip_images, strip_nav};
pub use timing::{TimingStep, Timings};
pub use types::{FetchError, FetchMethod, PageRequest, RenderedPage};
