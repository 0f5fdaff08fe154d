use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pagemill_engine::PageRequest;

#[derive(Parser, Debug)]
#[command(name = "pagemill")]
#[command(about = "Convert web pages to agent-friendly markdown")]
#[command(
    long_about = "Fetch a URL through a headless browser and convert it to clean markdown.\n\
                  Default mode converts the full page; use --article to extract main content."
)]
#[command(version)]
pub struct Cli {
    /// URL to convert (omit when running `serve`)
    pub url: Option<String>,

    /// Extract main article content via readability
    #[arg(long)]
    pub article: bool,

    /// Emulate a mobile device (iPhone viewport and user-agent)
    #[arg(long)]
    pub mobile: bool,

    /// Include images in markdown output
    #[arg(long)]
    pub images: bool,

    /// Keep navigation, header and footer elements
    #[arg(long)]
    pub keep_nav: bool,

    /// Prepend a frontmatter block with fetch metadata
    #[arg(long)]
    pub frontmatter: bool,

    /// Page load timeout (e.g. 15s, 500ms)
    #[arg(long, default_value = "15s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Extra wait after page load for JS-heavy sites
    #[arg(long, default_value = "0s", value_parser = parse_duration)]
    pub wait: Duration,

    /// Custom User-Agent string
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Write to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Browser control endpoint (DevTools URL of a running browser)
    #[arg(long, global = true, env = "PAGEMILL_BROWSER_URL")]
    pub browser_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an HTTP server that converts URLs to markdown
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

impl Cli {
    /// Builds the immutable per-call request from the parsed flags.
    pub fn to_request(&self, url: String) -> PageRequest {
        PageRequest {
            url,
            timeout: self.timeout,
            extra_wait: self.wait,
            user_agent: self.user_agent.clone(),
            mobile: self.mobile,
            keep_images: self.images,
            keep_nav: self.keep_nav,
            frontmatter: self.frontmatter,
            article: self.article,
        }
    }
}

/// Parses durations like `15s`, `500ms`, `2m` or bare seconds (`15`).
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err("empty duration".to_string());
    }

    let (value, unit) = match raw.find(|c: char| c.is_ascii_alphabetic()) {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {input}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("invalid duration: {input}"));
    }

    let seconds = match unit {
        "ms" => value / 1000.0,
        "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        _ => return Err(format!("unknown duration unit in: {input}")),
    };
    Ok(Duration::from_secs_f64(seconds))
}

#[cfg(test)]
mod tests {
    use super::parse_duration;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn common_duration_forms_parse() {
        assert_eq!(parse_duration("15s").unwrap(), Duration::from_secs(15));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("15").unwrap(), Duration::from_secs(15));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn bad_durations_are_rejected() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("-3s").is_err());
        assert!(parse_duration("10parsec").is_err());
    }
}
