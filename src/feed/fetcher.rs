//! Feed retrieval and parsing.
//!
//! Fetches RSS/Atom documents over HTTP with timeouts and a size cap,
//! then parses them into candidate items for ingestion.

use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;

use crate::error::{NewsdeskError, Result};
use crate::feed::types::{ParsedFeed, ParsedItem, MAX_FEED_SIZE, MAX_SUMMARY_LENGTH};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Total request timeout in seconds.
const TOTAL_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for feed fetching.
const USER_AGENT: &str = "newsdesk/0.1 (feed fetcher)";

/// HTTP feed fetcher.
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a new fetcher with default settings.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NewsdeskError::Feed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch and parse a feed from the given URL.
    pub async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NewsdeskError::Feed(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(NewsdeskError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_FEED_SIZE {
                return Err(NewsdeskError::Feed(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, MAX_FEED_SIZE
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NewsdeskError::Feed(format!("failed to read response: {}", e)))?;

        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(NewsdeskError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                MAX_FEED_SIZE
            )));
        }

        parse_feed(&bytes)
    }
}

/// Validate a feed URL: http/https with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| NewsdeskError::Feed(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(NewsdeskError::Feed(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(NewsdeskError::Feed("URL has no host".to_string()));
    }

    Ok(())
}

/// Parse feed bytes into a ParsedFeed.
pub(crate) fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed = parser::parse(bytes)
        .map_err(|e| NewsdeskError::Feed(format!("failed to parse feed: {}", e)))?;

    let title = feed
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled Feed".to_string());

    let items: Vec<ParsedItem> = feed
        .entries
        .into_iter()
        .map(|entry| {
            let item_title = entry.title.map(|t| t.content);
            let link = entry.links.first().map(|l| l.href.clone());
            let summary = entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body))
                .map(|s| truncate_summary(&strip_html(&s)));
            let published_at = entry.published.or(entry.updated);

            ParsedItem {
                title: item_title,
                link,
                summary,
                published_at,
            }
        })
        .collect();

    Ok(ParsedFeed { title, items })
}

/// Strip HTML tags and decode common entities from text.
fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut in_entity = false;
    let mut entity = String::new();

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            '&' if !in_tag => {
                in_entity = true;
                entity.clear();
            }
            ';' if in_entity => {
                in_entity = false;
                match entity.as_str() {
                    "amp" => result.push('&'),
                    "lt" => result.push('<'),
                    "gt" => result.push('>'),
                    "quot" => result.push('"'),
                    "apos" => result.push('\''),
                    "nbsp" => result.push(' '),
                    _ if entity.starts_with('#') => {
                        if let Some(code) = parse_numeric_entity(&entity) {
                            if let Some(c) = char::from_u32(code) {
                                result.push(c);
                            }
                        }
                    }
                    _ => {
                        // Unknown entity, keep as-is
                        result.push('&');
                        result.push_str(&entity);
                        result.push(';');
                    }
                }
            }
            _ if in_entity => {
                entity.push(ch);
            }
            _ if !in_tag => {
                result.push(ch);
            }
            _ => {}
        }
    }

    let result: String = result.split_whitespace().collect::<Vec<&str>>().join(" ");
    result.trim().to_string()
}

/// Parse a numeric HTML entity (e.g., "#123" or "#x7B").
fn parse_numeric_entity(entity: &str) -> Option<u32> {
    if entity.starts_with("#x") || entity.starts_with("#X") {
        u32::from_str_radix(&entity[2..], 16).ok()
    } else if entity.starts_with('#') {
        entity[1..].parse().ok()
    } else {
        None
    }
}

/// Truncate a summary to the maximum stored length.
fn truncate_summary(text: &str) -> String {
    if text.len() <= MAX_SUMMARY_LENGTH {
        text.to_string()
    } else {
        text.chars().take(MAX_SUMMARY_LENGTH).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_valid() {
        assert!(validate_url("https://example.com/feed.xml").is_ok());
        assert!(validate_url("http://example.com/rss").is_ok());
    }

    #[test]
    fn test_validate_url_invalid_scheme() {
        let result = validate_url("ftp://example.com/feed.xml");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unsupported URL scheme"));
    }

    #[test]
    fn test_validate_url_not_a_url() {
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn test_strip_html_basic() {
        assert_eq!(strip_html("<p>Hello</p>"), "Hello");
        assert_eq!(strip_html("<b>Bold</b> text"), "Bold text");
        assert_eq!(strip_html("<div><p>Nested</p></div>"), "Nested");
    }

    #[test]
    fn test_strip_html_entities() {
        assert_eq!(strip_html("&amp;"), "&");
        assert_eq!(strip_html("&lt;tag&gt;"), "<tag>");
        assert_eq!(strip_html("A&nbsp;B"), "A B");
        assert_eq!(strip_html("&#65;&#x42;"), "AB");
    }

    #[test]
    fn test_strip_html_whitespace() {
        assert_eq!(
            strip_html("<p>  Multiple   spaces  </p>"),
            "Multiple spaces"
        );
    }

    #[test]
    fn test_truncate_summary() {
        let short = "Short text";
        assert_eq!(truncate_summary(short), short);

        let long = "a".repeat(MAX_SUMMARY_LENGTH + 100);
        assert_eq!(truncate_summary(&long).len(), MAX_SUMMARY_LENGTH);
    }

    #[test]
    fn test_parse_feed_rss() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <item>
      <title>First Article</title>
      <link>https://example.com/1</link>
      <pubDate>Wed, 01 Jan 2025 00:00:00 GMT</pubDate>
      <description>&lt;p&gt;Description&lt;/p&gt;</description>
    </item>
  </channel>
</rss>"#;

        let feed = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.title, "Test Feed");
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].title.as_deref(), Some("First Article"));
        assert_eq!(feed.items[0].link.as_deref(), Some("https://example.com/1"));
        assert_eq!(feed.items[0].summary.as_deref(), Some("Description"));
        assert!(feed.items[0].published_at.is_some());
    }

    #[test]
    fn test_parse_feed_atom() {
        let atom = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <entry>
    <id>urn:uuid:1</id>
    <title>Atom Entry</title>
    <link href="https://example.com/entry"/>
    <summary>Entry summary</summary>
    <updated>2025-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

        let feed = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(feed.title, "Atom Feed");
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].title.as_deref(), Some("Atom Entry"));
        assert_eq!(
            feed.items[0].link.as_deref(),
            Some("https://example.com/entry")
        );
        assert!(feed.items[0].published_at.is_some());
    }

    #[test]
    fn test_parse_feed_missing_fields() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <item>
      <guid>1</guid>
    </item>
  </channel>
</rss>"#;

        let feed = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(feed.title, "Untitled Feed");
        assert_eq!(feed.items.len(), 1);
        // Defaults are left to ingestion
        assert!(feed.items[0].title.is_none());
        assert!(feed.items[0].link.is_none());
        assert!(feed.items[0].published_at.is_none());
    }

    #[test]
    fn test_parse_feed_invalid() {
        assert!(parse_feed(b"This is not XML").is_err());
    }
}
