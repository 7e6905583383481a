//! Product page scraping
//!
//! Pulls a short, comma-separated feature summary out of a product page so
//! the prompt workflow has something better than the default feature list.

use crate::error::{Result, StudioError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument};

/// Desktop browser agent; many storefronts refuse unknown clients
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Timeout applied to page fetches
pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(10);

const META_DESCRIPTION_CHARS: usize = 100;
const MIN_BULLET_CHARS: usize = 5;
const MIN_BULLETS: usize = 3;
const MAX_BULLETS: usize = 14;
const BULLETS_TAKEN: usize = 5;

/// Turns a product URL into feature text
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Fetch `url` and return its feature summary (possibly empty)
    async fn scrape(&self, url: &str) -> Result<String>;
}

/// `PageScraper` over plain HTTP GET
pub struct HttpPageScraper {
    client: Client,
}

impl HttpPageScraper {
    /// # Errors
    /// - HTTP client construction failures
    pub fn new() -> Result<Self> {
        Self::with_timeout(SCRAPE_TIMEOUT)
    }

    /// # Errors
    /// - HTTP client construction failures
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| StudioError::network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageScraper for HttpPageScraper {
    #[instrument(skip(self))]
    async fn scrape(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StudioError::network(format!("Scraping failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(StudioError::network(format!(
                "Website not accessible (Status {})",
                status.as_u16()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| StudioError::network(format!("Scraping failed: {}", e)))?;
        debug!("Fetched {} bytes of HTML", html.len());

        Ok(extract_features(&html))
    }
}

/// Extract a feature summary from a product page
///
/// Priority: the meta description (cut to 100 characters plus "..."), then the
/// first bullet list that looks like a feature list. The page title is used only
/// when neither yields anything. Pieces are joined with ", "; an empty string
/// means nothing usable was found.
#[must_use]
pub fn extract_features(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut features = Vec::new();

    if let Some(description) = meta_description(&document) {
        let truncated: String = description.chars().take(META_DESCRIPTION_CHARS).collect();
        features.push(format!("{}...", truncated));
    }

    if let Some(bullets) = first_feature_list(&document) {
        features.extend(bullets);
    }

    if features.is_empty() {
        if let Some(title) = select_first(&document, "title") {
            let title = stripped_text(title);
            if !title.is_empty() {
                features.push(title);
            }
        }
    }

    features.join(", ")
}

/// `name="description"` wins over `og:description` even when its content is empty
fn meta_description(document: &Html) -> Option<String> {
    let meta = select_first(document, r#"meta[name="description"]"#)
        .or_else(|| select_first(document, r#"meta[property="og:description"]"#))?;
    let content = meta.value().attr("content").unwrap_or_default().trim();
    (!content.is_empty()).then(|| content.to_string())
}

fn first_feature_list(document: &Html) -> Option<Vec<String>> {
    let ul = Selector::parse("ul").ok()?;
    let li = Selector::parse("li").ok()?;

    document.select(&ul).find_map(|list| {
        let items: Vec<String> = list
            .select(&li)
            .map(stripped_text)
            .filter(|text| text.chars().count() > MIN_BULLET_CHARS)
            .collect();
        (MIN_BULLETS..=MAX_BULLETS)
            .contains(&items.len())
            .then(|| items.into_iter().take(BULLETS_TAKEN).collect())
    })
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Concatenate the element's text nodes, each trimmed
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_description_is_truncated() {
        let long = "x".repeat(150);
        let html = format!(
            r#"<html><head><meta name="description" content="  {}  "><title>T</title></head></html>"#,
            long
        );
        let features = extract_features(&html);
        assert_eq!(features, format!("{}...", "x".repeat(100)));
    }

    #[test]
    fn test_short_meta_description_still_gets_ellipsis() {
        let html = r#"<meta property="og:description" content="Great earbuds">"#;
        assert_eq!(extract_features(html), "Great earbuds...");
    }

    #[test]
    fn test_bullet_list_selection() {
        let html = r#"
            <ul><li>Home</li><li>Shop</li></ul>
            <ul>
              <li>Adaptive ANC up to 50dB</li>
              <li>ok</li>
              <li>Bluetooth 5.3 connection</li>
              <li>IPX5 water resistance</li>
              <li>36 hour battery life</li>
              <li>Six microphones for calls</li>
              <li>Hi-Res Audio certified</li>
            </ul>
            <ul><li>Should never be reached</li><li>Second item</li><li>Third item</li></ul>
        "#;
        assert_eq!(
            extract_features(html),
            "Adaptive ANC up to 50dB, Bluetooth 5.3 connection, IPX5 water resistance, \
             36 hour battery life, Six microphones for calls"
        );
    }

    #[test]
    fn test_oversized_lists_are_skipped() {
        let items: String = (0..15).map(|i| format!("<li>Feature {}</li>", i)).collect();
        let html = format!(
            "<title> Product Page </title><ul>{}</ul>",
            items
        );
        assert_eq!(extract_features(&html), "Product Page");
    }

    #[test]
    fn test_meta_and_bullets_combine_without_title() {
        let html = r#"
            <title>Ignored</title>
            <meta name="description" content="Soft">
            <ul><li>Long lasting</li><li>Fragrance free</li><li>Dermatologist tested</li></ul>
        "#;
        assert_eq!(
            extract_features(html),
            "Soft..., Long lasting, Fragrance free, Dermatologist tested"
        );
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(extract_features("<html><body></body></html>"), "");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let scraper = HttpPageScraper::with_timeout(Duration::from_secs(2)).unwrap();
        let err = scraper.scrape("http://127.0.0.1:9/product").await.unwrap_err();
        assert!(matches!(err, StudioError::Network(_)));
    }
}
