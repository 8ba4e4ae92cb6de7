use std::collections::HashSet;
use std::sync::Arc;

use preview_core::{LinkDescriptor, UrlClassifier};
use preview_logging::{preview_debug, preview_trace};
use scraper::{Html, Selector};
use url::Url;

use crate::ExtractError;

/// Finds the previewable links in the main content of a page.
#[derive(Debug, Clone)]
pub struct PageScanner {
    classifier: Arc<UrlClassifier>,
    styled_container: Selector,
    article_container: Selector,
    anchor: Selector,
}

impl PageScanner {
    pub fn new(classifier: Arc<UrlClassifier>) -> Result<Self, ExtractError> {
        let parse = |css: &'static str| {
            Selector::parse(css).map_err(|err| ExtractError::InvalidSelector {
                selector: css,
                message: err.to_string(),
            })
        };
        Ok(Self {
            classifier,
            styled_container: parse(".Article")?,
            article_container: parse("article")?,
            anchor: parse("a[href]")?,
        })
    }

    pub fn classifier(&self) -> &UrlClassifier {
        &self.classifier
    }

    /// Classified links inside the content container, in document order,
    /// one per URL. A page without a content container yields nothing.
    pub fn scan(&self, page_url: &str, html: &str) -> Vec<LinkDescriptor> {
        let document = Html::parse_document(html);
        let base = Url::parse(page_url).ok();

        let container = document
            .select(&self.styled_container)
            .next()
            .or_else(|| document.select(&self.article_container).next());
        let Some(container) = container else {
            preview_debug!("no content container on {}", page_url);
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for anchor in container.select(&self.anchor) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(url) = resolve_href(href, base.as_ref()) else {
                continue;
            };
            match self.classifier.describe(url.as_str()) {
                Some(link) => {
                    if seen.insert(link.url.clone()) {
                        preview_trace!("{} -> {}", link.url, link.content_type);
                        links.push(link);
                    }
                }
                None => preview_trace!("ignoring {}", url),
            }
        }
        links
    }
}

fn resolve_href(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") || lower.starts_with("mailto:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}
