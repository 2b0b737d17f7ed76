use std::collections::HashSet;
use std::time::Duration;

use chrono::DateTime;
use reqwest::{header, Client};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::classify;
use crate::config::Config;
use crate::model::{FeedError, NewsItem, NewsResponse};
use crate::parser;
use crate::sources::{Category, FeedTable, Lang};

/// Soft errors per response are capped so the envelope stays small
/// under a widespread outage.
const MAX_REPORTED_ERRORS: usize = 10;

/// Media types a feed endpoint should accept; some publishers reject
/// clients without a plausible Accept header.
const FEED_ACCEPT: &str = "application/rss+xml, application/atom+xml, application/xml;q=0.9, text/xml;q=0.8, text/html;q=0.5";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("timed out")]
    Timeout,
}

impl FetchError {
    fn into_feed_error(self, url: &str) -> FeedError {
        match self {
            FetchError::Status(code) => FeedError {
                url: url.to_string(),
                status: Some(code),
                error: None,
            },
            other => FeedError {
                url: url.to_string(),
                status: None,
                error: Some(other.to_string()),
            },
        }
    }
}

pub struct Fetcher {
    client: Client,
    table: FeedTable,
    strict_categories: bool,
}

impl Fetcher {
    pub fn new(config: &Config, table: FeedTable) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent("KioskNews/1.0 (RSS Aggregator)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            table,
            strict_categories: config.strict_categories,
        }
    }

    /// Aggregate the news list for one request: resolve the feed set,
    /// fetch each feed with per-source failure isolation, then merge.
    /// Only a total failure of every feed turns the envelope negative.
    pub async fn fetch_news(&self, lang: Lang, category: Category, max: usize) -> NewsResponse {
        let sources = self.table.resolve(lang, category);
        info!(
            "Aggregating {} feeds for {}/{}",
            sources.len(),
            lang.as_str(),
            category.as_str()
        );

        let mut items: Vec<NewsItem> = Vec::new();
        let mut errors: Vec<FeedError> = Vec::new();
        let mut succeeded = 0usize;

        for source in &sources {
            // Enough raw material already; the merge stage only shrinks it
            if items.len() >= max {
                break;
            }

            match self.fetch_feed(&source.url).await {
                Ok(body) => {
                    succeeded += 1;
                    let records = parser::parse_feed(&body);
                    debug!("Parsed {} records from {}", records.len(), source.url);

                    for record in records {
                        let item_category = source
                            .category
                            .unwrap_or_else(|| classify::classify_title(lang, &record.title));
                        let host = source_host(&record.link, &source.url);
                        items.push(NewsItem {
                            title: record.title,
                            link: record.link,
                            date: record.date,
                            source: host,
                            description: record.description,
                            category: item_category,
                        });
                    }
                }
                Err(e) => {
                    warn!("Failed to fetch feed {}: {}", source.url, e);
                    errors.push(e.into_feed_error(&source.url));
                }
            }
        }

        errors.truncate(MAX_REPORTED_ERRORS);

        if succeeded == 0 {
            return NewsResponse::failure("all feeds failed", errors);
        }

        let items = finalize(items, category, self.strict_categories, max);
        info!("Returning {} items ({} feed errors)", items.len(), errors.len());
        NewsResponse::success(items, errors)
    }

    async fn fetch_feed(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, FEED_ACCEPT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))
    }
}

/// Merge stage shared by every request: dedupe by link keeping the
/// first occurrence, apply the category policy, order newest first,
/// cap the list.
fn finalize(items: Vec<NewsItem>, requested: Category, strict: bool, max: usize) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    let mut items: Vec<NewsItem> = items
        .into_iter()
        .filter(|item| seen.insert(item.link.clone()))
        .collect();

    items = classify::filter_by_category(items, requested, strict);

    // Stable sort keeps resolver order for equal or missing dates
    items.sort_by_key(|item| std::cmp::Reverse(sort_timestamp(&item.date)));
    items.truncate(max);
    items
}

/// Sort key for best-effort date strings. RFC 2822 covers RSS
/// pubDate, RFC 3339 covers Atom timestamps; anything unparsable
/// sorts as the oldest.
fn sort_timestamp(date: &str) -> i64 {
    DateTime::parse_from_rfc2822(date)
        .or_else(|_| DateTime::parse_from_rfc3339(date))
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}

/// Display hostname for an item: the article's host, else the feed's
/// host, else a flat "news" label.
fn source_host(link: &str, feed_url: &str) -> String {
    host_of(link)
        .or_else(|| host_of(feed_url))
        .unwrap_or_else(|| "news".to_string())
}

fn host_of(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    Some(host.trim_start_matches("www.").to_string())
}
