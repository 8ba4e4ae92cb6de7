use pretty_assertions::assert_eq;
use preview_core::{ContentType, LinkDescriptor, UrlClassifier};

const TOKEN: &str = "ab12cd34ef56ab12cd34ef56ab12cd34";

fn classifier() -> UrlClassifier {
    UrlClassifier::for_site("apnews.com", "apf-").expect("classifier")
}

#[test]
fn token_paths_are_articles() {
    let c = classifier();
    for url in [
        format!("https://apnews.com/{TOKEN}"),
        format!("https://apnews.com/{TOKEN}/"),
        format!("https://apnews.com/{TOKEN}?utm=x"),
        format!("http://apnews.com/{TOKEN}/some-slug"),
    ] {
        assert_eq!(c.classify(&url), Some(ContentType::Article), "{url}");
    }
}

#[test]
fn token_must_be_exactly_32_lowercase_characters() {
    let c = classifier();
    assert_eq!(c.classify(&format!("https://apnews.com/{TOKEN}0")), None);
    assert_eq!(c.classify("https://apnews.com/ab12cd34"), None);
    let upper = TOKEN.to_ascii_uppercase();
    // Uppercase initial makes it a topic, not an article.
    assert_eq!(
        c.classify(&format!("https://apnews.com/{upper}")),
        Some(ContentType::Topic)
    );
}

#[test]
fn uppercase_segments_are_topics() {
    let c = classifier();
    assert_eq!(c.classify("https://apnews.com/Politics"), Some(ContentType::Topic));
    assert_eq!(
        c.classify("https://apnews.com/tag/Coronavirus"),
        Some(ContentType::Topic)
    );
}

#[test]
fn feed_prefixed_segments_are_feeds() {
    let c = classifier();
    assert_eq!(
        c.classify("https://apnews.com/apf-topnews"),
        Some(ContentType::Feed)
    );
    assert_eq!(
        c.classify("https://apnews.com/tag/apf-sports"),
        Some(ContentType::Feed)
    );
}

#[test]
fn everything_else_is_ignored() {
    let c = classifier();
    for url in [
        "https://apnews.com/",
        "https://apnews.com/politics",
        "https://apnews.com/tag/politics",
        "https://example.com/Politics",
        "https://www.apnews.com/Politics",
        "ftp://apnews.com/Politics",
    ] {
        assert_eq!(c.classify(url), None, "{url}");
    }
}

#[test]
fn classification_is_idempotent() {
    let c = classifier();
    let url = format!("https://apnews.com/{TOKEN}");
    assert_eq!(c.classify(&url), c.classify(&url));
}

#[test]
fn describe_normalizes_before_classifying() {
    let c = classifier();
    assert_eq!(
        c.describe(" https://APNEWS.com/Politics "),
        Some(LinkDescriptor {
            url: "https://apnews.com/Politics".to_string(),
            content_type: ContentType::Topic,
        })
    );
    assert_eq!(c.describe("not a url"), None);
}

#[test]
fn site_root_is_exposed() {
    assert_eq!(classifier().site_root(), "https://apnews.com/");
}

#[test]
fn invalid_host_is_rejected() {
    assert!(UrlClassifier::for_site("bad host", "apf-").is_err());
}
