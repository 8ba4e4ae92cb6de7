mod support;

use std::sync::Arc;

use preview_core::{
    ContentType, LinkDescriptor, PreviewSlot, Session, TtlPolicy, PREVIEW_ERROR,
};
use preview_engine::{
    CacheStore, DecodePolicy, ExtractLimits, ExtractorRegistry, FixedClock, PreviewEntry,
    PreviewError, PreviewFetcher, PreviewOutcome, SharedSession,
};
use support::{article_url, init_logging, semantic_article, shared, FakeFetcher, FlakyStore};

const NOW: i64 = 1_600_000_000_000;
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

struct Harness {
    store: Arc<FlakyStore>,
    fetcher: Arc<FakeFetcher>,
    clock: Arc<FixedClock>,
    previews: PreviewFetcher,
}

fn harness(fetcher: FakeFetcher) -> Harness {
    init_logging();
    let store = shared(FlakyStore::new());
    let fetcher = shared(fetcher);
    let clock = shared(FixedClock::new(NOW));
    let extractors = Arc::new(ExtractorRegistry::standard(ExtractLimits::default()).unwrap());
    let previews = PreviewFetcher::new(
        store.clone(),
        fetcher.clone(),
        extractors,
        clock.clone(),
        TtlPolicy::default(),
    );
    Harness {
        store,
        fetcher,
        clock,
        previews,
    }
}

fn article_link() -> LinkDescriptor {
    LinkDescriptor {
        url: article_url(),
        content_type: ContentType::Article,
    }
}

fn session() -> SharedSession {
    SharedSession::new(Session::new(1, "https://apnews.com/Politics"))
}

fn article_html() -> String {
    semantic_article("Headline", &["First.", "Second.", "Third."])
}

const ARTICLE_MARKUP: &str = "<h3>Headline</h3>\n<p>First.</p>\n<p>Second.</p>";

#[tokio::test]
async fn cache_miss_fetches_extracts_and_caches_for_a_day() {
    let h = harness(FakeFetcher::new().page(article_url(), article_html()));
    let session = session();

    let outcome = h.previews.run(&article_link(), &session).await;

    assert_eq!(outcome, PreviewOutcome::Fetched { persisted: true });
    assert_eq!(
        session.slot(&article_url()),
        Some(PreviewSlot::Ready(ARTICLE_MARKUP.to_string()))
    );
    let entry = h.store.get(&article_url()).await.unwrap().expect("cached");
    assert_eq!(entry.preview_markup, ARTICLE_MARKUP);
    assert_eq!(entry.expires_at, NOW + DAY_MS);
    assert_eq!(h.fetcher.calls(&article_url()), 1);
}

#[tokio::test]
async fn second_run_within_ttl_is_served_from_cache() {
    let h = harness(FakeFetcher::new().page(article_url(), article_html()));
    h.previews.run(&article_link(), &session()).await;

    h.clock.advance(DAY_MS - 1);
    let next_page = session();
    let outcome = h.previews.run(&article_link(), &next_page).await;

    assert_eq!(outcome, PreviewOutcome::CacheHit);
    assert_eq!(h.fetcher.calls(&article_url()), 1);
    assert_eq!(
        next_page.slot(&article_url()),
        Some(PreviewSlot::Ready(ARTICLE_MARKUP.to_string()))
    );
}

#[tokio::test]
async fn expired_entry_is_refetched() {
    let h = harness(FakeFetcher::new().page(article_url(), article_html()));
    h.store
        .set(
            &article_url(),
            PreviewEntry {
                preview_markup: "<h3>stale</h3>".to_string(),
                expires_at: NOW,
            },
        )
        .await
        .unwrap();

    let session = session();
    let outcome = h.previews.run(&article_link(), &session).await;

    assert_eq!(outcome, PreviewOutcome::Fetched { persisted: true });
    assert_eq!(h.fetcher.calls(&article_url()), 1);
    assert_eq!(
        session.slot(&article_url()),
        Some(PreviewSlot::Ready(ARTICLE_MARKUP.to_string()))
    );
}

#[tokio::test]
async fn topic_entries_expire_after_four_hours() {
    let url = "https://apnews.com/Politics";
    let html = support::topic_page("Politics", None, &[Some("A")]);
    let h = harness(FakeFetcher::new().page(url, html));
    let link = LinkDescriptor {
        url: url.to_string(),
        content_type: ContentType::Topic,
    };
    h.previews.run(&link, &session()).await;
    let entry = h.store.get(url).await.unwrap().unwrap();
    assert_eq!(entry.expires_at, NOW + 4 * 60 * 60 * 1000);

    h.clock.set(entry.expires_at);
    assert_eq!(
        h.previews.run(&link, &session()).await,
        PreviewOutcome::Fetched { persisted: true }
    );
    assert_eq!(h.fetcher.calls(url), 2);
}

#[tokio::test]
async fn network_error_sets_error_sentinel_without_caching() {
    let h = harness(FakeFetcher::new().failing(article_url()));
    let session = session();

    let outcome = h.previews.run(&article_link(), &session).await;

    assert!(matches!(outcome, PreviewOutcome::Failed(PreviewError::Network(_))));
    assert_eq!(session.slot(&article_url()), Some(PreviewSlot::Failed));
    assert_eq!(
        session.with(|s| s.slot(&article_url()).map(|slot| slot.markup().to_string())),
        Some(PREVIEW_ERROR.to_string())
    );
    assert_eq!(h.store.writes(), 0);
}

#[tokio::test]
async fn store_read_error_fails_closed_without_fetching() {
    let h = harness(FakeFetcher::new().page(article_url(), article_html()));
    h.store.fail_reads();
    let session = session();

    let outcome = h.previews.run(&article_link(), &session).await;

    assert!(matches!(outcome, PreviewOutcome::Failed(PreviewError::StoreRead(_))));
    assert_eq!(session.slot(&article_url()), Some(PreviewSlot::Failed));
    assert_eq!(h.fetcher.total_calls(), 0);
}

#[tokio::test]
async fn store_write_error_keeps_the_preview() {
    let h = harness(FakeFetcher::new().page(article_url(), article_html()));
    h.store.fail_writes();
    let session = session();

    let outcome = h.previews.run(&article_link(), &session).await;

    assert_eq!(outcome, PreviewOutcome::Fetched { persisted: false });
    assert_eq!(
        session.slot(&article_url()),
        Some(PreviewSlot::Ready(ARTICLE_MARKUP.to_string()))
    );
    assert_eq!(h.store.writes(), 1);
    assert_eq!(h.store.entries(), 0);
}

#[tokio::test]
async fn extraction_failure_sets_error_sentinel() {
    let h = harness(FakeFetcher::new().page(article_url(), "<html><body>nothing</body></html>"));
    let session = session();

    let outcome = h.previews.run(&article_link(), &session).await;

    assert!(matches!(outcome, PreviewOutcome::Failed(PreviewError::Extraction(_))));
    assert_eq!(session.slot(&article_url()), Some(PreviewSlot::Failed));
    assert_eq!(h.store.writes(), 0);
}

#[tokio::test]
async fn strict_decoding_turns_malformed_bodies_into_parse_errors() {
    let mut body = article_html().into_bytes();
    body.extend_from_slice(b"\xff\xfe");
    let h = harness(FakeFetcher::new().raw_page(article_url(), body));
    let previews = h.previews.clone().with_decode_policy(DecodePolicy::Strict);
    let session = session();

    let outcome = previews.run(&article_link(), &session).await;

    assert!(matches!(outcome, PreviewOutcome::Failed(PreviewError::Parse(_))));
    assert_eq!(session.slot(&article_url()), Some(PreviewSlot::Failed));
}

#[tokio::test]
async fn lossy_decoding_still_extracts_malformed_bodies() {
    let mut body = article_html().into_bytes();
    body.extend_from_slice(b"\xff\xfe");
    let h = harness(FakeFetcher::new().raw_page(article_url(), body));

    let outcome = h.previews.run(&article_link(), &session()).await;

    assert_eq!(outcome, PreviewOutcome::Fetched { persisted: true });
}

#[tokio::test]
async fn unknown_pages_fail_but_stay_registered() {
    let h = harness(FakeFetcher::new());
    let session = session();
    let link = LinkDescriptor {
        url: "https://apnews.com/Missing".to_string(),
        content_type: ContentType::Topic,
    };

    let outcome = h.previews.run(&link, &session).await;

    assert!(matches!(outcome, PreviewOutcome::Failed(PreviewError::Network(_))));
    assert!(session.with(|s| s.is_registered("https://apnews.com/Missing")));
}
