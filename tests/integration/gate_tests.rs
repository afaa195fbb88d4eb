use crate::fake_browser::{FakeDocument, FakePage};
use crate::test_config;
use sitegrove::config::GateConfig;
use sitegrove::crawler::{build_http_client, head_request, ContentTypeGate, Crawler, GateVerdict};
use sitegrove::{CrawlError, CrawlTarget};
use std::time::{Duration, Instant};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_head(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("HEAD"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

fn with_type(content_type: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("content-type", content_type)
}

fn gate() -> ContentTypeGate {
    ContentTypeGate::new(&GateConfig::default()).unwrap()
}

fn url(server: &MockServer, at: &str) -> Url {
    Url::parse(&server.uri()).unwrap().join(at).unwrap()
}

#[tokio::test]
async fn test_html_passes() {
    let server = MockServer::start().await;
    mount_head(&server, "/page", with_type("text/html; charset=utf-8")).await;

    let verdict = gate().check(&url(&server, "/page")).await;
    assert!(matches!(verdict, GateVerdict::Html));
}

#[tokio::test]
async fn test_pdf_is_not_loaded() {
    let server = MockServer::start().await;
    mount_head(&server, "/report.pdf", with_type("application/pdf")).await;

    let verdict = gate().check(&url(&server, "/report.pdf")).await;
    assert!(!verdict.should_load());
    match verdict {
        GateVerdict::NotHtml { content_type } => assert_eq!(content_type, "application/pdf"),
        other => panic!("expected NotHtml, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_status_fails_open() {
    let server = MockServer::start().await;
    mount_head(&server, "/no-head", ResponseTemplate::new(405)).await;

    let verdict = gate().check(&url(&server, "/no-head")).await;
    assert!(verdict.should_load());
    match verdict {
        GateVerdict::Inconclusive {
            reason: CrawlError::FetchFailure { reason, .. },
        } => assert_eq!(reason, "HTTP 405"),
        other => panic!("expected Inconclusive, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_content_type_fails_open() {
    let server = MockServer::start().await;
    mount_head(&server, "/bare", ResponseTemplate::new(200)).await;

    let verdict = gate().check(&url(&server, "/bare")).await;
    assert!(matches!(verdict, GateVerdict::Inconclusive { .. }));
    assert!(verdict.should_load());
}

#[tokio::test]
async fn test_unreachable_server_fails_open() {
    // bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let unreachable = Url::parse(&format!("http://127.0.0.1:{}/gone", port)).unwrap();

    let verdict = gate().check(&unreachable).await;
    assert!(matches!(
        verdict,
        GateVerdict::Inconclusive {
            reason: CrawlError::FetchFailure { .. }
        }
    ));
}

#[tokio::test]
async fn test_head_request_follows_redirects() {
    let server = MockServer::start().await;
    mount_head(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/new"),
    )
    .await;
    mount_head(&server, "/new", with_type("text/html")).await;

    let client = build_http_client(&GateConfig::default()).unwrap();
    let response = head_request(&client, &url(&server, "/old")).await.unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.content_type.as_deref(), Some("text/html"));
}

#[tokio::test]
async fn test_rate_limit_spaces_requests() {
    let server = MockServer::start().await;
    mount_head(&server, "/page", with_type("text/html")).await;

    let config = GateConfig {
        requests_per_second: 2,
        ..GateConfig::default()
    };
    let gate = ContentTypeGate::new(&config).unwrap();
    let target = url(&server, "/page");

    let start = Instant::now();
    for _ in 0..4 {
        assert!(matches!(gate.check(&target).await, GateVerdict::Html));
    }

    // two requests burst, the other two wait 500ms each
    assert!(
        start.elapsed() >= Duration::from_millis(900),
        "four checks took only {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_crawl_skips_non_html_without_extraction() {
    let server = MockServer::start().await;
    mount_head(&server, "/", with_type("text/html")).await;
    mount_head(&server, "/a", with_type("text/html")).await;
    mount_head(&server, "/doc.pdf", with_type("application/pdf")).await;

    let root = format!("{}/", server.uri());
    let page = FakePage::new(&root)
        .page("/", FakeDocument::new().anchor("/doc.pdf").anchor("/a"))
        .page("/a", FakeDocument::new())
        // reachable in the browser, but must never be opened
        .page("/doc.pdf", FakeDocument::new().anchor("/hidden"))
        .page("/hidden", FakeDocument::new());

    let mut config = test_config();
    config.gate.enabled = true;

    let report = Crawler::new(&page, CrawlTarget::parse(&root).unwrap(), &config)
        .unwrap()
        .run()
        .await;

    assert!(report.status.is_finished());
    let paths: Vec<_> = report.visited.iter().map(|u| u.path()).collect();
    assert_eq!(paths, vec!["/", "/doc.pdf", "/a"]);
    assert_eq!(report.skipped, 1);
    assert_eq!(page.open_count("/doc.pdf"), 0);
    assert_eq!(page.open_count("/hidden"), 0);
}

#[tokio::test]
async fn test_crawl_loads_when_head_unsupported() {
    let server = MockServer::start().await;
    // no HEAD mocks: every pre-check gets a 404 and fails open

    let root = format!("{}/", server.uri());
    let page = FakePage::new(&root)
        .page("/", FakeDocument::new().anchor("/a"))
        .page("/a", FakeDocument::new());

    let mut config = test_config();
    config.gate.enabled = true;

    let report = Crawler::new(&page, CrawlTarget::parse(&root).unwrap(), &config)
        .unwrap()
        .run()
        .await;

    assert_eq!(report.visited.len(), 2);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn test_crawl_with_supplied_gate() {
    let server = MockServer::start().await;
    mount_head(&server, "/", with_type("text/html")).await;
    mount_head(&server, "/photo.jpg", with_type("image/jpeg")).await;

    let root = format!("{}/", server.uri());
    let page = FakePage::new(&root)
        .page("/", FakeDocument::new().anchor("/photo.jpg"))
        .page("/photo.jpg", FakeDocument::new());

    // the config leaves the gate off; the supplied one still applies
    let client = build_http_client(&GateConfig::default()).unwrap();
    let gate = ContentTypeGate::with_client(client, 50);

    let report = Crawler::new(&page, CrawlTarget::parse(&root).unwrap(), &test_config())
        .unwrap()
        .with_gate(Some(gate))
        .run()
        .await;

    assert_eq!(report.skipped, 1);
    assert_eq!(page.open_count("/photo.jpg"), 0);
}
