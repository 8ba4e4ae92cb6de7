use std::fmt;
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(60 * 60);

/// What kind of page a link points at. Decides the extractor and the TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Article,
    Topic,
    Feed,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Article, ContentType::Topic, ContentType::Feed];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Topic => "topic",
            ContentType::Feed => "feed",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long a cached preview of each content type stays trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub article: Duration,
    pub topic: Duration,
    pub feed: Duration,
}

impl TtlPolicy {
    pub fn ttl(&self, content_type: ContentType) -> Duration {
        match content_type {
            ContentType::Article => self.article,
            ContentType::Topic => self.topic,
            ContentType::Feed => self.feed,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            article: 24 * HOUR,
            topic: 4 * HOUR,
            feed: 4 * HOUR,
        }
    }
}
