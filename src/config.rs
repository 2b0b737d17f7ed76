use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Directory served for non-API paths (the kiosk client assets)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Per-feed fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Item cap used when a request carries no usable `max` parameter
    #[serde(default = "default_max_items")]
    pub default_max_items: usize,
    /// Drop items outside the requested category instead of widening
    /// back to the full merged set when the filter comes up empty
    #[serde(default)]
    pub strict_categories: bool,
    /// Feed bucket overrides; buckets not listed keep the builtin URLs
    #[serde(default)]
    pub feeds: Vec<FeedOverride>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    8
}

fn default_max_items() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedOverride {
    pub lang: String,
    pub category: String,
    pub url: String,
    /// Marks a feed dedicated to its bucket's topic; its items inherit
    /// the category instead of going through keyword classification
    #[serde(default)]
    pub topical: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, treating a missing file as "all defaults".
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            static_dir: default_static_dir(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            default_max_items: default_max_items(),
            strict_categories: false,
            feeds: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.static_dir, "public");
        assert_eq!(config.fetch_timeout_secs, 8);
        assert_eq!(config.default_max_items, 20);
        assert!(!config.strict_categories);
        assert!(config.feeds.is_empty());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
            listen_addr = "127.0.0.1:8080"
            fetch_timeout_secs = 3
            default_max_items = 6

            [[feeds]]
            lang = "de"
            category = "weather"
            url = "https://example.com/wetter.rss"
            topical = true

            [[feeds]]
            lang = "en"
            category = "mix"
            url = "https://example.org/rss"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.fetch_timeout_secs, 3);
        assert_eq!(config.default_max_items, 6);
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].lang, "de");
        assert_eq!(config.feeds[0].category, "weather");
        assert_eq!(config.feeds[0].url, "https://example.com/wetter.rss");
        assert!(config.feeds[0].topical);
        assert!(!config.feeds[1].topical);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.default_max_items, 20);
        assert!(config.feeds.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config.default_max_items, 20);
    }

    #[test]
    fn test_load_or_default_reads_existing_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"default_max_items = 6")
            .unwrap();

        let config = Config::load_or_default(temp_file.path()).unwrap();
        assert_eq!(config.default_max_items, 6);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let content = "this is not valid toml {{{";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_feed_override_missing_required_fields() {
        let content = r#"
            [[feeds]]
            lang = "de"
            category = "weather"
            # Missing url field
        "#;

        let result = Config::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_strict_categories_flag() {
        let config = Config::from_str("strict_categories = true").unwrap();
        assert!(config.strict_categories);
    }
}
