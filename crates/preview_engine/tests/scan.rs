mod support;

use std::sync::Arc;

use preview_core::{ContentType, LinkDescriptor, UrlClassifier};
use preview_engine::PageScanner;
use support::{article_url, host_page, init_logging};

const PAGE: &str = "https://apnews.com/Politics";

fn scanner() -> PageScanner {
    let classifier = UrlClassifier::for_site("apnews.com", "apf-").unwrap();
    PageScanner::new(Arc::new(classifier)).unwrap()
}

#[test]
fn classifies_links_in_the_content_container() {
    init_logging();
    let html = host_page(&[
        article_url().as_str(),
        "/tag/Sports",
        "/apf-topnews",
        "/about",
        "https://example.com/X",
    ]);
    let links = scanner().scan(PAGE, &html);
    assert_eq!(
        links,
        vec![
            LinkDescriptor {
                url: article_url(),
                content_type: ContentType::Article,
            },
            LinkDescriptor {
                url: "https://apnews.com/tag/Sports".to_string(),
                content_type: ContentType::Topic,
            },
            LinkDescriptor {
                url: "https://apnews.com/apf-topnews".to_string(),
                content_type: ContentType::Feed,
            },
        ]
    );
}

#[test]
fn links_outside_the_container_are_ignored() {
    let html = "<html><body><nav><a href=\"/Sports\">nav</a></nav>\
                <div class=\"Article\"><a href=\"/Politics\">in</a></div></body></html>";
    let links = scanner().scan(PAGE, html);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, "https://apnews.com/Politics");
}

#[test]
fn styled_container_is_preferred_over_article_element() {
    let html = "<html><body><article><a href=\"/Sports\">a</a></article>\
                <div class=\"Article\"><a href=\"/Business\">b</a></div></body></html>";
    let links = scanner().scan(PAGE, html);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].url, "https://apnews.com/Business");
}

#[test]
fn falls_back_to_article_element() {
    let html = "<html><body><article><a href=\"/Sports\">a</a></article></body></html>";
    let links = scanner().scan(PAGE, html);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].content_type, ContentType::Topic);
}

#[test]
fn page_without_container_yields_nothing() {
    let html = "<html><body><a href=\"/Sports\">a</a></body></html>";
    assert!(scanner().scan(PAGE, html).is_empty());
}

#[test]
fn repeated_links_are_dispatched_once() {
    let html = host_page(&["/Sports", "https://apnews.com/Sports", "#top"]);
    let links = scanner().scan(PAGE, &html);
    assert_eq!(links.len(), 1);
}
