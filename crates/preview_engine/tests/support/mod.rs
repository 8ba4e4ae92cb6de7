#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use preview_engine::{
    CacheStore, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, MemoryCacheStore,
    PreviewEntry, StoreError,
};

pub const TOKEN: &str = "0123456789abcdef0123456789abcdef";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(preview_logging::initialize_for_tests);
}

pub fn article_url() -> String {
    format!("https://apnews.com/{TOKEN}")
}

/// Serves canned bodies and counts requests per URL.
#[derive(Default)]
pub struct FakeFetcher {
    pages: Mutex<HashMap<String, Result<Vec<u8>, FetchError>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.raw_page(url, html.into().into_bytes())
    }

    pub fn raw_page(self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.pages.lock().unwrap().insert(url.into(), Ok(bytes));
        self
    }

    pub fn failing(self, url: impl Into<String>) -> Self {
        self.pages.lock().unwrap().insert(
            url.into(),
            Err(FetchError::new(FailureKind::Network, "connection reset")),
        );
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
        let page = self
            .pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::new(FailureKind::HttpStatus(404), "not found")));
        let bytes = page?;
        Ok(FetchOutput {
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("text/html; charset=utf-8".to_string()),
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

/// Memory store with switchable read/write failures.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryCacheStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn entries(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait::async_trait]
impl CacheStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<PreviewEntry>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Read("storage unavailable".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, entry: PreviewEntry) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("quota exceeded".to_string()));
        }
        self.inner.set(key, entry).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.clear().await
    }

    async fn size_in_use(&self) -> Result<u64, StoreError> {
        self.inner.size_in_use().await
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}

pub fn semantic_article(title: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    format!(
        "<html><body><article><div class=\"headline-wrapper\"><h1>{title}</h1></div>{body}</article></body></html>"
    )
}

pub fn wire_story(title: &str, timestamp: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    format!(
        "<html><body><div class=\"CardHeadline\"><div><h1>{title}</h1></div>\
         <span data-key=\"timestamp\">{timestamp}</span></div>\
         <div class=\"Article\">{body}</div></body></html>"
    )
}

/// `cards` entries of `None` are cards without a headline.
pub fn topic_page(title: &str, description: Option<&str>, cards: &[Option<&str>]) -> String {
    let description = description
        .map(|d| format!("<div class=\"hub-description\">{d}</div>"))
        .unwrap_or_default();
    let cards: String = cards
        .iter()
        .map(|card| match card {
            Some(h) => format!(
                "<div class=\"FeedCard\"><div class=\"CardHeadline\"><h1>{h}</h1></div></div>"
            ),
            None => "<div class=\"FeedCard\"><div class=\"Ad\">sponsored</div></div>".to_string(),
        })
        .collect();
    format!(
        "<html><body><div class=\"Body\"><h1 data-key=\"hub-title\">{title}</h1>{description}</div>\
         <article>{cards}</article></body></html>"
    )
}

pub fn feed_page(title: &str, cards: &[Option<&str>]) -> String {
    let cards: String = cards
        .iter()
        .map(|card| match card {
            Some(h) => format!(
                "<div class=\"FeedCard\"><div class=\"CardHeadline\"><a href=\"/x\"><h1>{h}</h1></a></div></div>"
            ),
            None => "<div class=\"FeedCard\"><div class=\"CardHeadline\"><h1>unlinked</h1></div></div>"
                .to_string(),
        })
        .collect();
    format!(
        "<html><body><div class=\"Body\"><h1 data-key=\"hub-title\">{title}</h1></div>\
         <article>{cards}</article></body></html>"
    )
}

/// A host page whose content container links to `hrefs`.
pub fn host_page(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|h| format!("<a href=\"{h}\">link</a> "))
        .collect();
    format!(
        "<html><head><script src=\"https://apnews.com/dist/index.js?v=3\"></script></head>\
         <body><div class=\"Article\"><p>{links}</p></div></body></html>"
    )
}
