use std::time::Duration;

use crate::timing::Timings;
use crate::types::FetchMethod;

/// Metadata describing one fetch, rendered into the frontmatter block.
#[derive(Debug, Clone)]
pub struct Metadata<'a> {
    pub source_url: &'a str,
    pub method: FetchMethod,
    pub timed_out: bool,
    pub timing: &'a Timings,
}

/// Renders the frontmatter block: source URL, fetch method, timed-out flag
/// and the ordered, millisecond-rounded timing steps. The markdown body is
/// appended untouched by the caller.
pub fn build_frontmatter(metadata: &Metadata) -> String {
    let mut out = format!(
        "---\nsource: {source}\nfetch_method: {method}\ntimed_out: {timed_out}\n",
        source = metadata.source_url,
        method = metadata.method.as_str(),
        timed_out = metadata.timed_out,
    );
    if !metadata.timing.is_empty() {
        out.push_str("timing:\n");
        for step in metadata.timing.steps() {
            out.push_str(&format!(
                "  {}: {}ms\n",
                step.name,
                millis_rounded(step.duration)
            ));
        }
    }
    out.push_str("---\n\n");
    out
}

fn millis_rounded(duration: Duration) -> u128 {
    (duration.as_secs_f64() * 1000.0).round() as u128
}
