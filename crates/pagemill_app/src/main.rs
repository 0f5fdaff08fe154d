mod cli;
mod logging;
mod serve;

use std::fmt;
use std::fs;
use std::path::Path;

use clap::Parser;
use pagemill_engine::{convert_negotiated, convert_rendered, PageFetcher};

use crate::cli::{Cli, Command};

/// Terminal failure carried to the process exit path.
#[derive(Debug)]
pub struct AppError(String);

impl AppError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for AppError {}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::initialize(log::LevelFilter::Info);

    if let Err(err) = run(cli).await {
        eprintln!("pagemill: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match &cli.command {
        Some(Command::Serve { host, port }) => {
            let browser_url = require_browser_url(&cli)?;
            serve::run(&browser_url, host, *port).await
        }
        None => convert_once(&cli).await,
    }
}

async fn convert_once(cli: &Cli) -> Result<(), AppError> {
    let url = cli
        .url
        .clone()
        .ok_or_else(|| AppError::new("missing required <url> argument"))?;
    let request = cli.to_request(url);

    // Negotiation shortcut first; the browser is only contacted when the
    // origin cannot serve markdown itself.
    let conversion = match convert_negotiated(&request).await.map_err(app_err)? {
        Some(done) => done,
        None => {
            let browser_url = require_browser_url(cli)?;
            let fetcher = PageFetcher::connect(&browser_url).await.map_err(app_err)?;
            let result = convert_rendered(&fetcher, &request).await;
            fetcher.disconnect();
            result.map_err(app_err)?
        }
    };

    write_output(cli.output.as_deref(), &conversion.markdown)
}

fn require_browser_url(cli: &Cli) -> Result<String, AppError> {
    cli.browser_url.clone().ok_or_else(|| {
        AppError::new("no browser control endpoint; pass --browser-url or set PAGEMILL_BROWSER_URL")
    })
}

fn app_err(err: impl fmt::Display) -> AppError {
    AppError::new(err.to_string())
}

fn write_output(path: Option<&Path>, markdown: &str) -> Result<(), AppError> {
    match path {
        Some(path) => {
            fs::write(path, markdown).map_err(|err| AppError::new(format!("writing output file: {err}")))
        }
        None => {
            print!("{markdown}");
            Ok(())
        }
    }
}
