use std::time::Instant;

use engine_logging::{engine_debug, engine_info};
use thiserror::Error;

use crate::browser::Fetcher;
use crate::convert::{ConvertError, HtmdConverter};
use crate::extract;
use crate::frontmatter::{build_frontmatter, Metadata};
use crate::negotiate::negotiate_markdown;
use crate::postprocess::{self, FormatError};
use crate::sanitize;
use crate::timing::Timings;
use crate::types::{FetchError, FetchMethod, PageRequest};

/// A finished conversion: the final markdown plus the recorded timing trail.
#[derive(Debug)]
pub struct Conversion {
    pub markdown: String,
    pub method: FetchMethod,
    pub timed_out: bool,
    pub timings: Timings,
}

/// Failures that reach the caller. Everything else in the pipeline degrades
/// to best-effort output.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Full pipeline for one request: the content-negotiation shortcut first,
/// browser rendering otherwise.
pub async fn convert_page(
    fetcher: &dyn Fetcher,
    request: &PageRequest,
) -> Result<Conversion, PipelineError> {
    if let Some(done) = convert_negotiated(request).await? {
        return Ok(done);
    }
    convert_rendered(fetcher, request).await
}

/// Attempts the direct-markdown shortcut alone. `None` means the origin does
/// not serve markdown and the browser path is required.
pub async fn convert_negotiated(
    request: &PageRequest,
) -> Result<Option<Conversion>, PipelineError> {
    let start = Instant::now();
    let mut timings = Timings::new();

    let markdown = match negotiate_markdown(&request.url, request.timeout).await {
        Ok(markdown) => markdown,
        Err(reason) => {
            engine_debug!("content negotiation unsupported for {}: {reason}", request.url);
            return Ok(None);
        }
    };
    timings.record("fetch", start.elapsed());
    engine_info!("{} served markdown directly", request.url);

    let step = Instant::now();
    let markdown = postprocess::format_markdown(&markdown)?;
    timings.record("format", step.elapsed());
    timings.record("total", start.elapsed());

    Ok(Some(assemble(
        markdown,
        FetchMethod::Negotiated,
        false,
        timings,
        request,
    )))
}

/// Browser path: render, sanitize, extract, postprocess.
pub async fn convert_rendered(
    fetcher: &dyn Fetcher,
    request: &PageRequest,
) -> Result<Conversion, PipelineError> {
    let start = Instant::now();
    let mut timings = Timings::new();

    let page = fetcher.fetch(request).await?;
    timings.record("fetch", start.elapsed());

    let step = Instant::now();
    let mut html = sanitize::strip_hidden(&page.html);
    timings.record("strip_hidden", step.elapsed());

    if !request.keep_nav {
        let step = Instant::now();
        html = sanitize::strip_nav(&html);
        timings.record("strip_nav", step.elapsed());
    }

    if !request.keep_images {
        let step = Instant::now();
        html = sanitize::strip_images(&html);
        timings.record("strip_images", step.elapsed());
    }

    let converter = HtmdConverter;
    let step = Instant::now();
    let markdown = if html.is_empty() {
        // Navigation produced nothing; neither converter runs.
        String::new()
    } else if request.article {
        extract::article_markdown(&converter, &html)?.markdown
    } else {
        extract::full_markdown(&converter, &html)?
    };
    timings.record("convert", step.elapsed());

    let step = Instant::now();
    let markdown = postprocess::strip_junk_links(&markdown);
    timings.record("strip_junk_links", step.elapsed());

    let step = Instant::now();
    let markdown = postprocess::format_markdown(&markdown)?;
    timings.record("format", step.elapsed());
    timings.record("total", start.elapsed());

    Ok(assemble(
        markdown,
        FetchMethod::Rendered,
        page.timed_out,
        timings,
        request,
    ))
}

/// Prepends frontmatter and the timeout banner. The banner goes first so the
/// warning is visible before any metadata block.
fn assemble(
    markdown: String,
    method: FetchMethod,
    timed_out: bool,
    timings: Timings,
    request: &PageRequest,
) -> Conversion {
    let mut out = markdown;

    if request.frontmatter {
        let block = build_frontmatter(&Metadata {
            source_url: &request.url,
            method,
            timed_out,
            timing: &timings,
        });
        out = format!("{block}{out}");
    }

    if timed_out {
        out = format!(
            "[pagemill: page timed out after {:?}; content may be incomplete]\n\n{out}",
            request.timeout
        );
    }

    Conversion {
        markdown: out,
        method,
        timed_out,
        timings,
    }
}
