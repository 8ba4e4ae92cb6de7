use std::collections::HashMap;

use html_escape::encode_text;
use preview_core::ContentType;
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no recognizable article structure")]
    NoArticleStructure,
    #[error("{content_type} page has no {element}")]
    MissingElement {
        content_type: ContentType,
        element: &'static str,
    },
    #[error("no extractor registered for {0}")]
    Unregistered(ContentType),
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector {
        selector: &'static str,
        message: String,
    },
}

/// How much of a linked page ends up in its preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    pub article_paragraphs: usize,
    pub topic_headlines: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            article_paragraphs: 2,
            topic_headlines: 5,
        }
    }
}

/// Turns a parsed linked page into preview markup.
pub trait Extractor: Send + Sync {
    fn extract(&self, doc: &Html) -> Result<String, ExtractError>;
}

fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|err| ExtractError::InvalidSelector {
        selector: css,
        message: err.to_string(),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First `limit` paragraphs with visible text. Stops reading as soon as the
/// limit is reached.
fn collect_excerpts<'a>(
    paragraphs: impl Iterator<Item = ElementRef<'a>>,
    limit: usize,
) -> Vec<String> {
    paragraphs
        .map(text_of)
        .filter(|text| !text.is_empty())
        .take(limit)
        .collect()
}

fn render_list(items: &[String]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|item| format!("<li>{}</li>", encode_text(item)))
        .collect();
    format!("<ul>{}</ul>", items.join("\n"))
}

/// Article pages come in two shapes: a semantic `<article>` element, or an
/// older wire-story layout built from `div.Article`.
pub struct ArticleExtractor {
    paragraphs: usize,
    article: Selector,
    headline: Selector,
    story_body: Selector,
    story_headline: Selector,
    timestamp: Selector,
    paragraph: Selector,
}

impl ArticleExtractor {
    pub fn new(paragraphs: usize) -> Result<Self, ExtractError> {
        Ok(Self {
            paragraphs,
            article: selector("article")?,
            headline: selector("div[class^='headline']")?,
            story_body: selector("div.Article")?,
            story_headline: selector("div.CardHeadline div h1")?,
            timestamp: selector("span[data-key='timestamp']")?,
            paragraph: selector("p")?,
        })
    }

    fn missing(element: &'static str) -> ExtractError {
        ExtractError::MissingElement {
            content_type: ContentType::Article,
            element,
        }
    }

    fn render(title: &str, date: Option<&str>, excerpts: &[String]) -> String {
        let mut markup = format!("<h3>{}</h3>\n", encode_text(title));
        if let Some(date) = date {
            markup.push_str(&format!("<p>{}</p>\n", encode_text(date)));
        }
        let paragraphs: Vec<String> = excerpts
            .iter()
            .map(|p| format!("<p>{}</p>", encode_text(p)))
            .collect();
        markup.push_str(&paragraphs.join("\n"));
        markup
    }
}

impl Extractor for ArticleExtractor {
    fn extract(&self, doc: &Html) -> Result<String, ExtractError> {
        if let Some(article) = doc.select(&self.article).next() {
            let title = article
                .select(&self.headline)
                .next()
                .map(text_of)
                .ok_or_else(|| Self::missing("headline"))?;
            let excerpts = collect_excerpts(article.select(&self.paragraph), self.paragraphs);
            return Ok(Self::render(&title, None, &excerpts));
        }

        if let Some(body) = doc.select(&self.story_body).next() {
            let title = doc
                .select(&self.story_headline)
                .next()
                .map(text_of)
                .ok_or_else(|| Self::missing("card headline"))?;
            let date = doc
                .select(&self.timestamp)
                .next()
                .map(text_of)
                .and_then(non_empty);
            let excerpts = collect_excerpts(body.select(&self.paragraph), self.paragraphs);
            return Ok(Self::render(&title, date.as_deref(), &excerpts));
        }

        Err(ExtractError::NoArticleStructure)
    }
}

/// Topic hubs: a title, an optional blurb right after it, and the headlines
/// of the first feed cards.
pub struct TopicExtractor {
    headlines: usize,
    hub_title: Selector,
    main: Selector,
    card: Selector,
    card_headline: Selector,
}

impl TopicExtractor {
    pub fn new(headlines: usize) -> Result<Self, ExtractError> {
        Ok(Self {
            headlines,
            hub_title: selector("h1[data-key='hub-title']")?,
            main: selector("article")?,
            card: selector("div.FeedCard")?,
            card_headline: selector("div.CardHeadline h1")?,
        })
    }
}

impl Extractor for TopicExtractor {
    fn extract(&self, doc: &Html) -> Result<String, ExtractError> {
        let title_el = doc
            .select(&self.hub_title)
            .next()
            .ok_or(ExtractError::MissingElement {
                content_type: ContentType::Topic,
                element: "hub title",
            })?;
        let description = title_el
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(text_of)
            .and_then(non_empty);

        let headlines: Vec<String> = match doc.select(&self.main).next() {
            Some(main) => main
                .select(&self.card)
                .filter_map(|card| card.select(&self.card_headline).next())
                .map(text_of)
                .take(self.headlines)
                .collect(),
            None => Vec::new(),
        };

        let mut markup = format!("<h3>Topic: {}</h3>\n", encode_text(&text_of(title_el)));
        if let Some(description) = description {
            markup.push_str(&format!("<p>{}</p>\n", encode_text(&description)));
        }
        markup.push_str(&render_list(&headlines));
        Ok(markup)
    }
}

/// `apf-` feed pages: a hub title inside the page body and feed card
/// headlines wrapped in links.
pub struct FeedExtractor {
    headlines: usize,
    hub_title: Selector,
    card: Selector,
    card_headline: Selector,
}

impl FeedExtractor {
    pub fn new(headlines: usize) -> Result<Self, ExtractError> {
        Ok(Self {
            headlines,
            hub_title: selector("div.Body h1[data-key='hub-title']")?,
            card: selector("article div.FeedCard")?,
            card_headline: selector("div.CardHeadline a h1")?,
        })
    }
}

impl Extractor for FeedExtractor {
    fn extract(&self, doc: &Html) -> Result<String, ExtractError> {
        let title = doc
            .select(&self.hub_title)
            .next()
            .map(text_of)
            .ok_or(ExtractError::MissingElement {
                content_type: ContentType::Feed,
                element: "hub title",
            })?;

        let headlines: Vec<String> = doc
            .select(&self.card)
            .filter_map(|card| card.select(&self.card_headline).next())
            .map(text_of)
            .take(self.headlines)
            .collect();

        Ok(format!(
            "<h3>Feed: {}</h3>\n{}",
            encode_text(&title),
            render_list(&headlines)
        ))
    }
}

/// Content type -> extractor.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<ContentType, Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The article, topic and feed extractors for the news site.
    pub fn standard(limits: ExtractLimits) -> Result<Self, ExtractError> {
        let mut registry = Self::new();
        registry.register(
            ContentType::Article,
            ArticleExtractor::new(limits.article_paragraphs)?,
        );
        registry.register(
            ContentType::Topic,
            TopicExtractor::new(limits.topic_headlines)?,
        );
        registry.register(
            ContentType::Feed,
            FeedExtractor::new(limits.topic_headlines)?,
        );
        Ok(registry)
    }

    pub fn register(&mut self, content_type: ContentType, extractor: impl Extractor + 'static) {
        self.extractors.insert(content_type, Box::new(extractor));
    }

    pub fn extract(&self, content_type: ContentType, doc: &Html) -> Result<String, ExtractError> {
        self.extractors
            .get(&content_type)
            .ok_or(ExtractError::Unregistered(content_type))?
            .extract(doc)
    }
}
