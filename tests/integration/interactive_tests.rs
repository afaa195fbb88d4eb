use crate::fake_browser::{FakeDocument, FakePage};
use crate::test_config;
use sitegrove::browser::BrowserPage;
use sitegrove::crawler::{
    CrawlEvent, CrawlStatus, Crawler, EventSink, InteractiveLinkExtractor, LinkDiscovery,
};
use sitegrove::CrawlTarget;
use url::Url;

const ROOT: &str = "https://example.com/";

fn target() -> CrawlTarget {
    CrawlTarget::parse(ROOT).unwrap()
}

fn paths(urls: &[Url]) -> Vec<String> {
    urls.iter().map(|u| u.path().to_string()).collect()
}

/// Loads `path` on the fake page the way the crawler does
async fn load(page: &FakePage, path: &str) -> Url {
    let url = page.url(path);
    page.open(url.as_str()).await.unwrap();
    url
}

#[tokio::test]
async fn test_click_discovers_target() {
    let page = FakePage::new(ROOT)
        .page("/", FakeDocument::new().clickable_to("/gallery"))
        .page("/gallery", FakeDocument::new());
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert_eq!(paths(&links), vec!["/gallery"]);
    // restored to where the pass started
    assert_eq!(page.location(), ROOT);
}

#[tokio::test]
async fn test_click_without_navigation_yields_nothing() {
    let page = FakePage::new(ROOT).page("/", FakeDocument::new().inert_clickable());
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert!(links.is_empty());
    assert_eq!(page.clicks().len(), 1);
    // location never changed, so nothing to restore
    assert_eq!(page.open_count("/"), 1);
}

#[tokio::test]
async fn test_each_candidate_starts_from_origin() {
    let page = FakePage::new(ROOT)
        .page(
            "/",
            FakeDocument::new()
                .clickable_to("/one")
                .clickable_to("/two")
                .clickable_to("/three"),
        )
        .page("/one", FakeDocument::new())
        .page("/two", FakeDocument::new())
        .page("/three", FakeDocument::new());
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert_eq!(paths(&links), vec!["/one", "/two", "/three"]);
    assert_eq!(page.clicks(), vec![ROOT.to_string(); 3]);
    assert_eq!(page.location(), ROOT);
}

#[tokio::test]
async fn test_restoration_after_failed_click() {
    let page = FakePage::new(ROOT)
        .page(
            "/",
            FakeDocument::new()
                .stalling_clickable("/trap")
                .clickable_to("/next"),
        )
        .page("/trap", FakeDocument::new())
        .page("/next", FakeDocument::new());
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    // the stalled candidate is forfeited, the next one still runs from the origin
    assert_eq!(paths(&links), vec!["/next"]);
    assert_eq!(page.clicks(), vec![ROOT.to_string(); 2]);
    assert_eq!(page.location(), ROOT);
}

#[tokio::test]
async fn test_restore_waits_for_network_idle() {
    let page = FakePage::new(ROOT)
        .page("/", FakeDocument::new().clickable_to("/gallery"))
        .page("/gallery", FakeDocument::new());
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    extractor.discover_links(&page, &base, &target()).await.unwrap();

    // once after the click, once after navigating back
    assert_eq!(page.open_count("/"), 2);
    assert_eq!(page.idle_waits(), 2);
}

#[tokio::test]
async fn test_failed_restore_keeps_discovered_link() {
    let page = FakePage::new(ROOT)
        .page("/", FakeDocument::new().clickable_to("/one").clickable_to("/two"))
        .page("/one", FakeDocument::new().clickable_to("/x").clickable_to("/elsewhere"))
        .page("/two", FakeDocument::new())
        .page("/x", FakeDocument::new())
        .page("/elsewhere", FakeDocument::new());
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    // the navigation back after the first click fails
    page.refuse_opens(1);
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert_eq!(paths(&links), vec!["/one", "/two"]);
    // the second candidate was clicked on the origin, not on /one
    assert_eq!(page.clicks(), vec![ROOT.to_string(); 2]);
    assert_eq!(page.location(), ROOT);
}

#[tokio::test]
async fn test_candidate_skipped_when_origin_unreachable() {
    let page = FakePage::new(ROOT)
        .page(
            "/",
            FakeDocument::new()
                .clickable_to("/one")
                .clickable_to("/two")
                .clickable_to("/three"),
        )
        .page("/one", FakeDocument::new())
        .page("/two", FakeDocument::new())
        .page("/three", FakeDocument::new());
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    // the restore after /one and the return before /two both fail
    page.refuse_opens(2);
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert_eq!(paths(&links), vec!["/one", "/three"]);
    // nothing was clicked away from the origin
    assert_eq!(page.clicks(), vec![ROOT.to_string(); 2]);
    assert_eq!(page.location(), ROOT);
}

#[tokio::test]
async fn test_failed_click_retried_from_the_top() {
    let page = FakePage::new(ROOT)
        .page("/", FakeDocument::new().stalling_clickable("/trap"))
        .page("/trap", FakeDocument::new());

    let mut config = test_config();
    config.crawler.interactive_attempts = 3;
    let extractor = InteractiveLinkExtractor::from_config(&config);

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert!(links.is_empty());
    // every attempt re-queried, waited and clicked from the origin
    assert_eq!(page.clicks(), vec![ROOT.to_string(); 3]);
    assert_eq!(page.visibility_checks(), 3);
    assert_eq!(page.location(), ROOT);
}

#[tokio::test]
async fn test_hidden_candidate_abandoned_without_retry() {
    let page = FakePage::new(ROOT)
        .page(
            "/",
            FakeDocument::new()
                .hidden_clickable("/secret")
                .clickable_to("/shown"),
        )
        .page("/secret", FakeDocument::new())
        .page("/shown", FakeDocument::new());

    let mut config = test_config();
    config.crawler.interactive_attempts = 3;
    let extractor = InteractiveLinkExtractor::from_config(&config);

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert_eq!(paths(&links), vec!["/shown"]);
    // one visibility check for each candidate, one click for the visible one
    assert_eq!(page.visibility_checks(), 2);
    assert_eq!(page.clicks().len(), 1);
}

#[tokio::test]
async fn test_off_site_click_not_reported() {
    let page = FakePage::new(ROOT)
        .page("/", FakeDocument::new().clickable_to("https://other.com/promo"))
        .page("https://other.com/promo", FakeDocument::new());
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert!(links.is_empty());
    assert_eq!(page.location(), ROOT);
}

#[tokio::test]
async fn test_fragment_navigation_is_not_a_new_page() {
    let page = FakePage::new(ROOT).page("/", FakeDocument::new().clickable_to("/#/gallery"));
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();

    assert!(links.is_empty());
}

#[tokio::test]
async fn test_trigger_gates_interactive_pass() {
    let page = FakePage::new(ROOT)
        .page("/", FakeDocument::new().clickable_to("/a"))
        .page(
            "/gallery",
            FakeDocument::new().marker("#gallery").clickable_to("/b"),
        )
        .page("/a", FakeDocument::new())
        .page("/b", FakeDocument::new());

    let mut config = test_config();
    config.crawler.interactive_trigger = Some("#gallery".to_string());
    let extractor = InteractiveLinkExtractor::from_config(&config);

    let base = load(&page, "/").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();
    assert!(links.is_empty());
    assert!(page.clicks().is_empty());

    let base = load(&page, "/gallery").await;
    let links = extractor.discover_links(&page, &base, &target()).await.unwrap();
    assert_eq!(paths(&links), vec!["/b"]);
}

#[tokio::test]
async fn test_crawl_follows_clicked_links() {
    let page = FakePage::new(ROOT)
        .page(
            "/",
            FakeDocument::new()
                .anchor("/about")
                .clickable_to("/gallery")
                .inert_clickable(),
        )
        .page("/about", FakeDocument::new())
        .page("/gallery", FakeDocument::new().clickable_to("/gallery/2"))
        .page("/gallery/2", FakeDocument::new());

    let (sink, mut receiver) = EventSink::channel();
    let report = Crawler::new(&page, target(), &test_config())
        .unwrap()
        .with_events(sink)
        .run()
        .await;

    assert!(report.status.is_finished());
    assert_eq!(
        paths(&report.visited),
        vec!["/", "/about", "/gallery", "/gallery/2"]
    );

    let mut sources = Vec::new();
    let mut failures = 0;
    while let Some(event) = receiver.recv().await {
        match event {
            CrawlEvent::LinkFound { url, source, .. } => {
                sources.push((url.path().to_string(), source))
            }
            CrawlEvent::OperationFailed { .. } => failures += 1,
            _ => {}
        }
    }

    assert_eq!(
        sources,
        vec![
            ("/about".to_string(), "anchor"),
            ("/gallery".to_string(), "interactive"),
            ("/gallery/2".to_string(), "interactive"),
        ]
    );
    // the inert element is neither a link nor an error
    assert_eq!(failures, 0);
}

#[tokio::test]
async fn test_browser_loss_during_clicks_is_fatal() {
    let page = FakePage::new(ROOT).page(
        "/",
        FakeDocument::new()
            .crashing_clickable()
            .clickable_to("/never"),
    );
    let extractor = InteractiveLinkExtractor::from_config(&test_config());

    let base = load(&page, "/").await;
    let result = extractor.discover_links(&page, &base, &target()).await;

    match result {
        Err(e) => assert!(e.is_fatal(), "unexpected error {:?}", e),
        Ok(links) => panic!("expected a fatal error, got {:?}", links),
    }
    // the second candidate was never attempted
    assert_eq!(page.clicks().len(), 1);
}

#[tokio::test]
async fn test_browser_loss_during_clicks_aborts_crawl() {
    let page = FakePage::new(ROOT)
        .page("/", FakeDocument::new().anchor("/a").crashing_clickable())
        .page("/a", FakeDocument::new());

    let report = Crawler::new(&page, target(), &test_config())
        .unwrap()
        .run()
        .await;

    assert!(matches!(report.status, CrawlStatus::Aborted(_)));
    // the root was loaded before the browser went away
    assert_eq!(paths(&report.visited), vec!["/"]);
    assert_eq!(report.pending, 1);
}
