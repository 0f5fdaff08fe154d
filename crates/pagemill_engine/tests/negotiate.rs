use std::time::Duration;

use pagemill_engine::{negotiate_markdown, Unsupported};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn markdown_content_type_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .and(header("Accept", "text/markdown"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("# Direct\n", "text/markdown; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/doc", server.uri());
    let markdown = negotiate_markdown(&url, TIMEOUT).await.expect("negotiated");
    assert_eq!(markdown, "# Direct\n");
}

#[tokio::test]
async fn html_content_type_is_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/doc", server.uri());
    let err = negotiate_markdown(&url, TIMEOUT).await.unwrap_err();
    assert_eq!(
        err,
        Unsupported::ContentType(Some("text/html; charset=utf-8".to_string()))
    );
}

#[tokio::test]
async fn missing_content_type_is_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let url = format!("{}/doc", server.uri());
    let err = negotiate_markdown(&url, TIMEOUT).await.unwrap_err();
    assert_eq!(err, Unsupported::ContentType(None));
}

#[tokio::test]
async fn connection_failure_is_a_transport_reason() {
    // Port 9 (discard) is not listening in the test environment.
    let err = negotiate_markdown("http://127.0.0.1:9/doc", TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, Unsupported::Transport(_)));
}

#[tokio::test]
async fn slow_origin_times_out_as_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("# Late\n", "text/markdown"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/slow", server.uri());
    let err = negotiate_markdown(&url, Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, Unsupported::Transport(_)));
}
