use regex::Regex;
use url::Url;

use crate::ContentType;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("invalid site host {0:?}")]
    InvalidHost(String),
    #[error("invalid classification pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A link found on the current page together with what it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkDescriptor {
    pub url: String,
    pub content_type: ContentType,
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    content_type: ContentType,
}

/// Ordered URL rules for one site. The first matching rule wins.
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    site_root: String,
    rules: Vec<Rule>,
}

impl UrlClassifier {
    /// Builds the rule list for `host`:
    /// 1. a 32 character lowercase alphanumeric token path -> article
    /// 2. an uppercase initial segment, optionally under `tag/` -> topic
    /// 3. a `feed_prefix` segment, optionally under `tag/` -> feed
    pub fn for_site(host: &str, feed_prefix: &str) -> Result<Self, ClassifierError> {
        let root = Url::parse(&format!("https://{host}/"))
            .map_err(|_| ClassifierError::InvalidHost(host.to_string()))?;
        if root.host_str() != Some(host) {
            return Err(ClassifierError::InvalidHost(host.to_string()));
        }

        let base = format!("^https?://{}/", regex::escape(host));
        let rules = vec![
            Rule {
                pattern: Regex::new(&format!(r"{base}[a-z0-9]{{32}}($|\?|/)"))?,
                content_type: ContentType::Article,
            },
            Rule {
                pattern: Regex::new(&format!(r"{base}(tag/)?[A-Z]"))?,
                content_type: ContentType::Topic,
            },
            Rule {
                pattern: Regex::new(&format!(r"{base}(tag/)?{}", regex::escape(feed_prefix)))?,
                content_type: ContentType::Feed,
            },
        ];

        Ok(Self {
            site_root: root.to_string(),
            rules,
        })
    }

    /// The site's front page, e.g. `https://apnews.com/`.
    pub fn site_root(&self) -> &str {
        &self.site_root
    }

    /// Classifies an absolute URL. `None` means the link is out of scope.
    pub fn classify(&self, url: &str) -> Option<ContentType> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(url))
            .map(|rule| rule.content_type)
    }

    /// Normalizes `href` the way a browser exposes an anchor's absolute URL
    /// and classifies it.
    pub fn describe(&self, href: &str) -> Option<LinkDescriptor> {
        let url = canonical_url(href)?;
        let content_type = self.classify(&url)?;
        Some(LinkDescriptor { url, content_type })
    }
}

fn canonical_url(href: &str) -> Option<String> {
    Url::parse(href.trim()).ok().map(String::from)
}
