use serde::Serialize;

use crate::sources::Category;

/// One normalized article, shaped exactly as the kiosk client renders it.
#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub title: String,
    /// Absolute article URL; identity key for de-duplication
    pub link: String,
    /// Publication timestamp as the feed carried it; may be empty and
    /// is never assumed parseable
    pub date: String,
    /// Display hostname, e.g. "tagesschau.de"
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
}

/// Soft failure for one feed URL, surfaced as response data.
#[derive(Debug, Clone, Serialize)]
pub struct FeedError {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The `/api/news` envelope. Always paired with HTTP 200: upstream
/// trouble is data for the client to render, not a transport failure.
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub ok: bool,
    pub items: Vec<NewsItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FeedError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NewsResponse {
    pub fn success(items: Vec<NewsItem>, errors: Vec<FeedError>) -> Self {
        NewsResponse {
            ok: true,
            items,
            errors,
            error: None,
        }
    }

    pub fn failure(message: &str, errors: Vec<FeedError>) -> Self {
        NewsResponse {
            ok: false,
            items: Vec::new(),
            errors,
            error: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(description: Option<&str>) -> NewsItem {
        NewsItem {
            title: "Sturmtief über dem Rheinland".to_string(),
            link: "https://example.com/a".to_string(),
            date: "Wed, 01 Jan 2025 08:00:00 GMT".to_string(),
            source: "example.com".to_string(),
            description: description.map(|d| d.to_string()),
            category: Category::Weather,
        }
    }

    #[test]
    fn test_item_serializes_category_lowercase() {
        let json = serde_json::to_value(sample_item(None)).unwrap();
        assert_eq!(json["category"], "weather");
    }

    #[test]
    fn test_item_omits_missing_description() {
        let json = serde_json::to_value(sample_item(None)).unwrap();
        assert!(json.get("description").is_none());

        let json = serde_json::to_value(sample_item(Some("Ein Teaser."))).unwrap();
        assert_eq!(json["description"], "Ein Teaser.");
    }

    #[test]
    fn test_success_envelope_omits_empty_error_fields() {
        let response = NewsResponse::success(vec![sample_item(None)], Vec::new());
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
        assert!(json.get("errors").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_success_envelope_carries_soft_errors() {
        let errors = vec![FeedError {
            url: "https://example.com/feed.xml".to_string(),
            status: Some(500),
            error: None,
        }];
        let json = serde_json::to_value(NewsResponse::success(Vec::new(), errors)).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["errors"][0]["url"], "https://example.com/feed.xml");
        assert_eq!(json["errors"][0]["status"], 500);
        assert!(json["errors"][0].get("error").is_none());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let json = serde_json::to_value(NewsResponse::failure("all feeds failed", Vec::new()))
            .unwrap();

        assert_eq!(json["ok"], false);
        assert_eq!(json["items"].as_array().unwrap().len(), 0);
        assert_eq!(json["error"], "all feeds failed");
    }
}
