use std::sync::Arc;

use anyhow::Context;
use preview_core::PREVIEW_ELEMENT_ID;
use preview_engine::{
    clear_cache, decode_body, report_cache_size, CacheStore, EngineContext, Fetcher,
    PageActivator, PreviewSettings, ReqwestFetcher, SessionBinding, StaticPageHost, SystemClock,
};
use preview_logging::preview_info;

/// Prints the popup's cache size line.
pub(crate) async fn status(store: &dyn CacheStore) -> anyhow::Result<()> {
    let size = report_cache_size(store)
        .await
        .context("reading cache size")?;
    println!("Cache size: {size}");
    Ok(())
}

pub(crate) async fn clear(store: &dyn CacheStore) -> anyhow::Result<()> {
    let size = clear_cache(store).await.context("clearing cache")?;
    preview_info!("cache cleared");
    println!("Cache cleared. Cache size: {size}");
    Ok(())
}

/// Loads `url` as the host page and builds previews for every link on it,
/// the same way the engine does after a navigation.
pub(crate) async fn scan(url: &str, store: Arc<dyn CacheStore>) -> anyhow::Result<()> {
    let settings = PreviewSettings::default();
    let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch.clone()));
    let page = fetcher
        .fetch(url)
        .await
        .with_context(|| format!("fetching {url}"))?;
    let body = decode_body(
        &page.bytes,
        page.metadata.content_type.as_deref(),
        settings.decode,
    )
    .with_context(|| format!("decoding {url}"))?;

    let location = page.metadata.final_url;
    let host = Arc::new(StaticPageHost::new(location.clone(), body.text));
    let ctx = EngineContext {
        settings,
        host: host.clone(),
        surface: host,
        store,
        fetcher,
        clock: Arc::new(SystemClock),
    };
    let activator = PageActivator::new(&ctx, SessionBinding::default())?;
    let activation = activator.activate(1, location.clone()).await;
    let links = activation.links.clone();
    let session = activation.settle().await.snapshot();

    println!("{} previewable links on {location}", links.len());
    for link in links {
        println!("\n[{}] {}", link.content_type, link.url);
        if let Some(slot) = session.slot(&link.url) {
            println!("<div id=\"{PREVIEW_ELEMENT_ID}\">{}</div>", slot.markup());
        }
    }
    Ok(())
}
