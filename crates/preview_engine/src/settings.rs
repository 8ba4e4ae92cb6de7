use std::time::Duration;

use preview_core::{ClassifierError, TtlPolicy, UrlClassifier};

use crate::{DecodePolicy, ExtractLimits, FetchSettings};

#[derive(Debug, Clone)]
pub struct PreviewSettings {
    /// Host whose links get previews; also the only host that is fetched.
    pub site_host: String,
    /// Path prefix of feed pages.
    pub feed_prefix: String,
    /// URL prefix of the script whose load marks the end of page bootstrap.
    pub marker_script: String,
    pub limits: ExtractLimits,
    pub ttl: TtlPolicy,
    pub poll_interval: Duration,
    pub decode: DecodePolicy,
    pub fetch: FetchSettings,
}

impl PreviewSettings {
    pub fn classifier(&self) -> Result<UrlClassifier, ClassifierError> {
        UrlClassifier::for_site(&self.site_host, &self.feed_prefix)
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            site_host: "apnews.com".to_string(),
            feed_prefix: "apf-".to_string(),
            marker_script: "https://apnews.com/dist/index.js".to_string(),
            limits: ExtractLimits::default(),
            ttl: TtlPolicy::default(),
            poll_interval: Duration::from_secs(1),
            decode: DecodePolicy::default(),
            fetch: FetchSettings::default(),
        }
    }
}
