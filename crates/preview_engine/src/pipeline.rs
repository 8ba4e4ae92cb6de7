use std::sync::Arc;

use preview_core::{ContentType, LinkDescriptor, TtlPolicy};
use preview_logging::{preview_debug, preview_warn};
use scraper::Html;

use crate::{
    decode_body, CacheStore, Clock, DecodePolicy, ExtractorRegistry, FetchOutput, Fetcher,
    PreviewEntry, PreviewError, PreviewOutcome, SharedSession,
};

/// Resolves the preview of one link: cache, then network, then extraction.
///
/// For a given link the cache read always precedes the fetch, and the fetch
/// always precedes the cache write. Different links run independently.
#[derive(Clone)]
pub struct PreviewFetcher {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    extractors: Arc<ExtractorRegistry>,
    clock: Arc<dyn Clock>,
    ttl: TtlPolicy,
    decode: DecodePolicy,
}

impl PreviewFetcher {
    pub fn new(
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        extractors: Arc<ExtractorRegistry>,
        clock: Arc<dyn Clock>,
        ttl: TtlPolicy,
    ) -> Self {
        Self {
            store,
            fetcher,
            extractors,
            clock,
            ttl,
            decode: DecodePolicy::default(),
        }
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    /// Registers the link in `session` with the loading sentinel, then
    /// settles it to a preview or the error sentinel.
    pub async fn run(&self, link: &LinkDescriptor, session: &SharedSession) -> PreviewOutcome {
        session.register(&link.url);
        let outcome = self.resolve(link, session).await;
        if let PreviewOutcome::Failed(err) = &outcome {
            preview_debug!("preview for {} failed: {}", link.url, err);
            session.fail(&link.url);
        }
        outcome
    }

    async fn resolve(&self, link: &LinkDescriptor, session: &SharedSession) -> PreviewOutcome {
        let cached = match self.store.get(&link.url).await {
            Ok(cached) => cached,
            Err(err) => {
                // No fetch on a broken store; the link shows the error sentinel.
                preview_warn!("cache read for {} failed: {}", link.url, err);
                return PreviewOutcome::Failed(PreviewError::StoreRead(err.to_string()));
            }
        };

        if let Some(entry) = cached {
            if entry.is_fresh(self.clock.now_millis()) {
                preview_debug!("cache hit for {}", link.url);
                session.resolve(&link.url, entry.preview_markup);
                return PreviewOutcome::CacheHit;
            }
            preview_debug!("cache entry for {} expired", link.url);
        }

        let output = match self.fetcher.fetch(&link.url).await {
            Ok(output) => output,
            Err(err) => return PreviewOutcome::Failed(err.into()),
        };

        let markup = match self.render(link.content_type, &output) {
            Ok(markup) => markup,
            Err(err) => return PreviewOutcome::Failed(err),
        };
        session.resolve(&link.url, markup.clone());

        let ttl = self.ttl.ttl(link.content_type);
        let entry = PreviewEntry::expiring(markup, self.clock.now_millis(), ttl);
        match self.store.set(&link.url, entry).await {
            Ok(()) => PreviewOutcome::Fetched { persisted: true },
            Err(err) => {
                preview_warn!("cache write for {} failed: {}", link.url, err);
                PreviewOutcome::Fetched { persisted: false }
            }
        }
    }

    fn render(&self, content_type: ContentType, output: &FetchOutput) -> Result<String, PreviewError> {
        let body = decode_body(
            &output.bytes,
            output.metadata.content_type.as_deref(),
            self.decode,
        )?;
        let doc = Html::parse_document(&body.text);
        Ok(self.extractors.extract(content_type, &doc)?)
    }
}
