//! HTTP service mode: a persistent server sharing one browser connection
//! across concurrent conversion requests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use engine_logging::engine_info;
use pagemill_engine::{convert_page, render_preview, PageFetcher, PageRequest};

use crate::cli::parse_duration;
use crate::AppError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

struct ServeState {
    fetcher: PageFetcher,
}

/// Connects to the browser once, then serves conversions until ctrl-c.
pub async fn run(browser_url: &str, host: &str, port: u16) -> Result<(), AppError> {
    let fetcher = PageFetcher::connect(browser_url)
        .await
        .map_err(|err| AppError::new(err.to_string()))?;
    let state = Arc::new(ServeState { fetcher });

    let app = Router::new()
        .route("/", get(handle_convert))
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|err| AppError::new(format!("invalid listen address: {err}")))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::new(format!("binding {addr}: {err}")))?;

    engine_info!("pagemill server listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::new(err.to_string()))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn handle_convert(
    State(state): State<Arc<ServeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(url) = params.get("url").filter(|url| !url.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            "missing required 'url' query parameter",
        )
            .into_response();
    };

    let request = PageRequest {
        url: url.clone(),
        timeout: duration_param(&params, "timeout").unwrap_or(DEFAULT_TIMEOUT),
        extra_wait: duration_param(&params, "wait").unwrap_or(Duration::ZERO),
        user_agent: params.get("user-agent").cloned().filter(|ua| !ua.is_empty()),
        mobile: bool_param(&params, "mobile"),
        keep_images: bool_param(&params, "images"),
        keep_nav: bool_param(&params, "keep-nav"),
        frontmatter: bool_param(&params, "frontmatter"),
        article: bool_param(&params, "article"),
    };

    let conversion = match convert_page(&state.fetcher, &request).await {
        Ok(conversion) => conversion,
        Err(err) => return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    };

    if bool_param(&params, "preview") {
        return Html(render_preview(&conversion.markdown)).into_response();
    }

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        conversion.markdown,
    )
        .into_response()
}

/// A toggle is on when the parameter is present with any value other than
/// `false` or `0`; a bare `?article` counts as on.
fn bool_param(params: &HashMap<String, String>, name: &str) -> bool {
    match params.get(name) {
        Some(value) => value != "false" && value != "0",
        None => false,
    }
}

fn duration_param(params: &HashMap<String, String>, name: &str) -> Option<Duration> {
    params.get(name).and_then(|value| parse_duration(value).ok())
}

#[cfg(test)]
mod tests {
    use super::{bool_param, duration_param};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn bare_and_truthy_params_toggle_on() {
        let p = params(&[("article", ""), ("mobile", "true"), ("images", "1")]);
        assert!(bool_param(&p, "article"));
        assert!(bool_param(&p, "mobile"));
        assert!(bool_param(&p, "images"));
    }

    #[test]
    fn false_zero_and_absent_params_toggle_off() {
        let p = params(&[("article", "false"), ("mobile", "0")]);
        assert!(!bool_param(&p, "article"));
        assert!(!bool_param(&p, "mobile"));
        assert!(!bool_param(&p, "frontmatter"));
    }

    #[test]
    fn durations_parse_and_bad_values_fall_back() {
        let p = params(&[("timeout", "30s"), ("wait", "nonsense")]);
        assert_eq!(duration_param(&p, "timeout"), Some(Duration::from_secs(30)));
        assert_eq!(duration_param(&p, "wait"), None);
        assert_eq!(duration_param(&p, "missing"), None);
    }
}
