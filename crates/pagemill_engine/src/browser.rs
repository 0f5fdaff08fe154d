use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::Page;
use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::types::{FetchError, FetchMethod, PageRequest, RenderedPage};

/// iPhone 14 Pro Max dimensions and UA for mobile emulation.
const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const MOBILE_VIEWPORT_WIDTH: i64 = 430;
const MOBILE_VIEWPORT_HEIGHT: i64 = 932;
const MOBILE_SCALE_FACTOR: f64 = 3.0;

/// The DOM counts as settled once structural mutations within one quiet
/// window stay at or below this fraction of the document's node count.
const STABLE_CHURN_TOLERANCE: f64 = 0.1;
const STABLE_QUIET_WINDOW: Duration = Duration::from_millis(300);

const MUTATION_OBSERVER_JS: &str = r#"(() => {
    if (window.__pagemill_mutations === undefined) {
        window.__pagemill_mutations = 0;
        new MutationObserver((records) => {
            window.__pagemill_mutations += records.length;
        }).observe(document.documentElement, { childList: true, subtree: true, characterData: true });
    }
})()"#;

const MUTATION_SAMPLE_JS: &str =
    "[window.__pagemill_mutations || 0, document.getElementsByTagName('*').length]";

/// Fetches rendered pages. The trait seam lets the pipeline run against a
/// fake in tests; `PageFetcher` is the CDP-backed implementation.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &PageRequest) -> Result<RenderedPage, FetchError>;
}

/// Drives a browser page through navigation, load and DOM-stability waits.
///
/// Holds one long-lived connection to a browser control endpoint; every
/// fetch opens an isolated page, so concurrent requests never share DOM
/// state. The browser process itself is owned by whoever launched it.
pub struct PageFetcher {
    browser: Browser,
    event_pump: JoinHandle<()>,
}

impl PageFetcher {
    /// Connect to a running browser's DevTools control endpoint.
    ///
    /// Failure here is fatal for the request, never a timeout.
    pub async fn connect(control_url: &str) -> Result<Self, FetchError> {
        let (browser, mut handler) = Browser::connect(control_url)
            .await
            .map_err(|err| FetchError::Connect(err.to_string()))?;

        // The handler stream must be polled for the connection to make
        // progress at all.
        let event_pump = tokio::spawn(async move { while handler.next().await.is_some() {} });

        Ok(Self {
            browser,
            event_pump,
        })
    }

    /// Drop the control connection. The browser keeps running.
    pub fn disconnect(self) {
        self.event_pump.abort();
        drop(self.browser);
    }

    async fn fetch_on_page(
        &self,
        page: &Page,
        request: &PageRequest,
    ) -> Result<RenderedPage, FetchError> {
        if request.mobile {
            let metrics = SetDeviceMetricsOverrideParams::builder()
                .width(MOBILE_VIEWPORT_WIDTH)
                .height(MOBILE_VIEWPORT_HEIGHT)
                .device_scale_factor(MOBILE_SCALE_FACTOR)
                .mobile(true)
                .build()
                .map_err(FetchError::Emulation)?;
            page.execute(metrics)
                .await
                .map_err(|err| FetchError::Emulation(err.to_string()))?;
        }

        let user_agent = match (&request.user_agent, request.mobile) {
            (Some(ua), _) => Some(ua.clone()),
            (None, true) => Some(MOBILE_USER_AGENT.to_string()),
            (None, false) => None,
        };
        if let Some(ua) = user_agent {
            let override_params = SetUserAgentOverrideParams::builder()
                .user_agent(ua)
                .build()
                .map_err(FetchError::UserAgent)?;
            page.execute(override_params)
                .await
                .map_err(|err| FetchError::UserAgent(err.to_string()))?;
        }

        // One deadline spans navigation, load and stability waits. HTML
        // extraction is exempt: partial content from a timed-out page is
        // still worth returning.
        let deadline = Instant::now() + request.timeout;
        let mut timed_out = false;

        match tokio::time::timeout_at(deadline, page.goto(request.url.as_str())).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                return Err(FetchError::Navigation {
                    url: request.url.clone(),
                    message: err.to_string(),
                })
            }
            // Nothing arrived before the deadline; terminal, but not an error.
            Err(_) => {
                return Ok(RenderedPage {
                    html: String::new(),
                    timed_out: true,
                    method: FetchMethod::Rendered,
                })
            }
        }

        match tokio::time::timeout_at(deadline, page.wait_for_navigation()).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => return Err(FetchError::Load(err.to_string())),
            Err(_) => timed_out = true,
        }

        if !timed_out {
            timed_out = wait_dom_stable(page, deadline).await?;
        }

        if !timed_out && !request.extra_wait.is_zero() {
            tokio::time::sleep(request.extra_wait).await;
        }

        if timed_out {
            engine_debug!("fetch of {} timed out; extracting partial content", request.url);
        }

        let html = page
            .content()
            .await
            .map_err(|err| FetchError::Extract(err.to_string()))?;

        Ok(RenderedPage {
            html,
            timed_out,
            method: FetchMethod::Rendered,
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for PageFetcher {
    /// Navigate to the request URL and return the fully rendered HTML.
    ///
    /// Deadline overruns after navigation degrade to `timed_out = true`
    /// with whatever content the page holds at that point.
    async fn fetch(&self, request: &PageRequest) -> Result<RenderedPage, FetchError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|err| FetchError::Page(err.to_string()))?;

        let result = self.fetch_on_page(&page, request).await;

        if let Err(err) = page.close().await {
            engine_warn!("closing page for {}: {err}", request.url);
        }

        result
    }
}

/// Waits until structural DOM mutation stays below the churn tolerance for a
/// full quiet window, accommodating script-driven rendering that finishes
/// asynchronously. Returns true if the deadline elapsed first.
async fn wait_dom_stable(page: &Page, deadline: Instant) -> Result<bool, FetchError> {
    page.evaluate(MUTATION_OBSERVER_JS)
        .await
        .map_err(|err| FetchError::Stability(err.to_string()))?;

    let (mut last_count, _) = sample_mutations(page).await?;
    loop {
        if tokio::time::timeout_at(deadline, tokio::time::sleep(STABLE_QUIET_WINDOW))
            .await
            .is_err()
        {
            return Ok(true);
        }

        let (count, nodes) = sample_mutations(page).await?;
        if is_stable(count.saturating_sub(last_count), nodes) {
            return Ok(false);
        }
        last_count = count;
    }
}

async fn sample_mutations(page: &Page) -> Result<(u64, u64), FetchError> {
    page.evaluate(MUTATION_SAMPLE_JS)
        .await
        .map_err(|err| FetchError::Stability(err.to_string()))?
        .into_value()
        .map_err(|err| FetchError::Stability(err.to_string()))
}

fn is_stable(mutations_in_window: u64, node_count: u64) -> bool {
    mutations_in_window as f64 <= STABLE_CHURN_TOLERANCE * node_count.max(1) as f64
}
