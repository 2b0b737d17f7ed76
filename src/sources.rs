use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::warn;

use crate::config::FeedOverride;

/// Languages the kiosk ships. Unknown codes read as German, the
/// restaurant's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    De,
    En,
    Fr,
    It,
    Vi,
}

impl Lang {
    pub const ALL: [Lang; 5] = [Lang::De, Lang::En, Lang::Fr, Lang::It, Lang::Vi];

    /// Strict lookup, used for configuration where a typo should surface
    pub fn from_code(code: &str) -> Option<Lang> {
        match code.trim().to_lowercase().as_str() {
            "de" => Some(Lang::De),
            "en" => Some(Lang::En),
            "fr" => Some(Lang::Fr),
            "it" => Some(Lang::It),
            "vi" => Some(Lang::Vi),
            _ => None,
        }
    }

    /// Lenient lookup for query parameters
    pub fn parse(code: &str) -> Lang {
        Lang::from_code(code).unwrap_or(Lang::De)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::De => "de",
            Lang::En => "en",
            Lang::Fr => "fr",
            Lang::It => "it",
            Lang::Vi => "vi",
        }
    }
}

/// News categories matching the kiosk's tab row. `Mix` is the
/// catch-all aggregate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mix,
    World,
    Weather,
    Business,
    Sport,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Mix,
        Category::World,
        Category::Weather,
        Category::Business,
        Category::Sport,
    ];

    /// Topic buckets, i.e. everything except the aggregate view
    pub const TOPICS: [Category; 4] = [
        Category::World,
        Category::Weather,
        Category::Business,
        Category::Sport,
    ];

    /// Strict lookup including the alias table. "deutschland" maps to
    /// the mix bucket: domestic headlines come from the general feeds.
    pub fn from_code(code: &str) -> Option<Category> {
        match code.trim().to_lowercase().as_str() {
            "mix" | "news" | "aktuell" | "deutschland" => Some(Category::Mix),
            "world" | "welt" | "ausland" | "international" => Some(Category::World),
            "weather" | "wetter" => Some(Category::Weather),
            "business" | "biz" | "wirtschaft" | "economy" => Some(Category::Business),
            "sport" | "sports" => Some(Category::Sport),
            _ => None,
        }
    }

    /// Lenient lookup for query parameters
    pub fn parse(code: &str) -> Category {
        Category::from_code(code).unwrap_or(Category::Mix)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mix => "mix",
            Category::World => "world",
            Category::Weather => "weather",
            Category::Business => "business",
            Category::Sport => "sport",
        }
    }
}

/// One upstream feed URL. `category` is set for feeds dedicated to a
/// single topic; their items inherit it without keyword classification.
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub url: String,
    pub category: Option<Category>,
}

impl FeedSource {
    pub fn general(url: &str) -> Self {
        Self {
            url: url.to_string(),
            category: None,
        }
    }

    pub fn topical(url: &str, category: Category) -> Self {
        Self {
            url: url.to_string(),
            category: Some(category),
        }
    }
}

/// Static (lang, category) -> feed URL table, read-only after startup.
pub struct FeedTable {
    buckets: HashMap<(Lang, Category), Vec<FeedSource>>,
}

impl FeedTable {
    pub fn empty() -> Self {
        FeedTable {
            buckets: HashMap::new(),
        }
    }

    /// The feed set the kiosk deploys with
    pub fn builtin() -> Self {
        let mut table = FeedTable::empty();

        // German: general tagesschau/SWR feeds, dedicated weather and
        // sport feeds
        table.set_bucket(
            Lang::De,
            Category::Mix,
            vec![
                FeedSource::general("https://www.tagesschau.de/xml/rss2"),
                FeedSource::general("https://www.swr.de/swraktuell/rss.xml"),
            ],
        );
        table.set_bucket(
            Lang::De,
            Category::World,
            vec![FeedSource::general("https://www.tagesschau.de/xml/rss2")],
        );
        table.set_bucket(
            Lang::De,
            Category::Weather,
            vec![FeedSource::topical(
                "https://www.wetter.com/wetternews/rss.xml",
                Category::Weather,
            )],
        );
        table.set_bucket(
            Lang::De,
            Category::Business,
            vec![FeedSource::general("https://www.tagesschau.de/xml/rss2")],
        );
        table.set_bucket(
            Lang::De,
            Category::Sport,
            vec![FeedSource::topical(
                "https://www.sportschau.de/index~rss2.xml",
                Category::Sport,
            )],
        );

        // English: BBC section feeds
        table.set_bucket(
            Lang::En,
            Category::Mix,
            vec![FeedSource::general("https://feeds.bbci.co.uk/news/rss.xml")],
        );
        table.set_bucket(
            Lang::En,
            Category::World,
            vec![FeedSource::topical(
                "https://feeds.bbci.co.uk/news/world/rss.xml",
                Category::World,
            )],
        );
        table.set_bucket(
            Lang::En,
            Category::Weather,
            vec![FeedSource::topical(
                "https://feeds.bbci.co.uk/news/science_and_environment/rss.xml",
                Category::Weather,
            )],
        );
        table.set_bucket(
            Lang::En,
            Category::Business,
            vec![FeedSource::topical(
                "https://feeds.bbci.co.uk/news/business/rss.xml",
                Category::Business,
            )],
        );
        table.set_bucket(
            Lang::En,
            Category::Sport,
            vec![FeedSource::topical(
                "https://feeds.bbci.co.uk/sport/rss.xml",
                Category::Sport,
            )],
        );

        // French and Italian: one general national feed reused for
        // every tab, categories come from classification
        for category in Category::ALL {
            table.set_bucket(
                Lang::Fr,
                category,
                vec![FeedSource::general("https://www.france24.com/fr/rss")],
            );
            table.set_bucket(
                Lang::It,
                category,
                vec![FeedSource::general("https://www.rainews.it/rss/tutti.xml")],
            );
        }

        // Vietnamese: VnExpress section feeds
        table.set_bucket(
            Lang::Vi,
            Category::Mix,
            vec![FeedSource::general("https://vnexpress.net/rss/tin-moi-nhat.rss")],
        );
        table.set_bucket(
            Lang::Vi,
            Category::World,
            vec![FeedSource::topical(
                "https://vnexpress.net/rss/the-gioi.rss",
                Category::World,
            )],
        );
        table.set_bucket(
            Lang::Vi,
            Category::Weather,
            vec![FeedSource::topical(
                "https://vnexpress.net/rss/thoi-su.rss",
                Category::Weather,
            )],
        );
        table.set_bucket(
            Lang::Vi,
            Category::Business,
            vec![FeedSource::topical(
                "https://vnexpress.net/rss/kinh-doanh.rss",
                Category::Business,
            )],
        );
        table.set_bucket(
            Lang::Vi,
            Category::Sport,
            vec![FeedSource::topical(
                "https://vnexpress.net/rss/the-thao.rss",
                Category::Sport,
            )],
        );

        table
    }

    pub fn set_bucket(&mut self, lang: Lang, category: Category, sources: Vec<FeedSource>) {
        self.buckets.insert((lang, category), sources);
    }

    /// Replace builtin buckets with configured ones. Entries with
    /// unknown codes are skipped so a config typo cannot silently
    /// retarget a different bucket.
    pub fn apply_overrides(&mut self, overrides: &[FeedOverride]) {
        let mut grouped: HashMap<(Lang, Category), Vec<FeedSource>> = HashMap::new();

        for entry in overrides {
            let lang = match Lang::from_code(&entry.lang) {
                Some(lang) => lang,
                None => {
                    warn!("Ignoring feed override with unknown language: {}", entry.lang);
                    continue;
                }
            };
            let category = match Category::from_code(&entry.category) {
                Some(category) => category,
                None => {
                    warn!(
                        "Ignoring feed override with unknown category: {}",
                        entry.category
                    );
                    continue;
                }
            };

            let source = if entry.topical {
                FeedSource::topical(&entry.url, category)
            } else {
                FeedSource::general(&entry.url)
            };
            grouped.entry((lang, category)).or_default().push(source);
        }

        for (key, sources) in grouped {
            self.buckets.insert(key, sources);
        }
    }

    /// Resolve the ordered feed list for a request. Never empty: a
    /// missing bucket falls back to the language's mix bucket, then to
    /// the German mix bucket, then to a compiled-in default, so the
    /// fetch stage always has work to attempt.
    pub fn resolve(&self, lang: Lang, category: Category) -> Vec<FeedSource> {
        let mut sources: Vec<FeedSource> = Vec::new();

        if category == Category::Mix {
            self.extend_from_bucket(&mut sources, lang, Category::Mix);
            // The aggregate view draws from every topic bucket
            for topic in Category::TOPICS {
                self.extend_from_bucket(&mut sources, lang, topic);
            }
        } else {
            self.extend_from_bucket(&mut sources, lang, category);
        }

        if sources.is_empty() {
            self.extend_from_bucket(&mut sources, lang, Category::Mix);
        }
        if sources.is_empty() {
            self.extend_from_bucket(&mut sources, Lang::De, Category::Mix);
        }
        if sources.is_empty() {
            sources.push(FeedSource::general("https://www.tagesschau.de/xml/rss2"));
        }

        dedup_by_url(sources)
    }

    fn extend_from_bucket(&self, out: &mut Vec<FeedSource>, lang: Lang, category: Category) {
        if let Some(bucket) = self.buckets.get(&(lang, category)) {
            out.extend(bucket.iter().cloned());
        }
    }
}

fn dedup_by_url(sources: Vec<FeedSource>) -> Vec<FeedSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|source| seen.insert(source.url.clone()))
        .collect()
}
