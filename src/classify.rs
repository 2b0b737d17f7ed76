use crate::model::NewsItem;
use crate::sources::{Category, Lang};

const DE_WEATHER: &[&str] = &[
    "wetter", "sturm", "gewitter", "schnee", "hochwasser", "hitzewelle", "orkan", "glatteis",
];
const DE_BUSINESS: &[&str] = &[
    "wirtschaft", "börse", "inflation", "konjunktur", "zinsen", "konzern", "aktien", "dax",
];
const DE_SPORT: &[&str] = &[
    "fußball", "fussball", "bundesliga", "olympia", "trainer", "turnier", "pokal", "spieltag",
];

const EN_WEATHER: &[&str] = &[
    "weather", "storm", "flood", "heatwave", "snow", "hurricane", "wildfire", "forecast",
];
const EN_BUSINESS: &[&str] = &[
    "market", "economy", "inflation", "bank", "shares", "profit", "tariff", "stocks",
];
const EN_SPORT: &[&str] = &[
    "football", "league", "olympic", "tennis", "cricket", "champions", "coach", "match",
];

const FR_WEATHER: &[&str] = &[
    "météo", "tempête", "canicule", "orage", "inondation", "neige", "pluie",
];
const FR_BUSINESS: &[&str] = &[
    "économie", "bourse", "inflation", "entreprise", "banque", "croissance",
];
const FR_SPORT: &[&str] = &[
    "football", "ligue", "tournoi", "olympique", "match", "mondial",
];

const IT_WEATHER: &[&str] = &[
    "meteo", "maltempo", "pioggia", "neve", "alluvione", "temporale",
];
const IT_BUSINESS: &[&str] = &[
    "economia", "borsa", "inflazione", "banca", "imprese", "mercati",
];
const IT_SPORT: &[&str] = &[
    "calcio", "serie a", "partita", "campionato", "olimpiadi", "allenatore",
];

const VI_WEATHER: &[&str] = &[
    "thời tiết", "bão", "mưa", "nắng nóng", "ngập", "không khí lạnh",
];
const VI_BUSINESS: &[&str] = &[
    "kinh tế", "chứng khoán", "ngân hàng", "doanh nghiệp", "lạm phát", "giá vàng",
];
const VI_SPORT: &[&str] = &[
    "thể thao", "bóng đá", "đội tuyển", "v-league", "huấn luyện viên", "trận đấu",
];

fn keyword_table(lang: Lang) -> [(Category, &'static [&'static str]); 3] {
    match lang {
        Lang::De => [
            (Category::Weather, DE_WEATHER),
            (Category::Business, DE_BUSINESS),
            (Category::Sport, DE_SPORT),
        ],
        Lang::En => [
            (Category::Weather, EN_WEATHER),
            (Category::Business, EN_BUSINESS),
            (Category::Sport, EN_SPORT),
        ],
        Lang::Fr => [
            (Category::Weather, FR_WEATHER),
            (Category::Business, FR_BUSINESS),
            (Category::Sport, FR_SPORT),
        ],
        Lang::It => [
            (Category::Weather, IT_WEATHER),
            (Category::Business, IT_BUSINESS),
            (Category::Sport, IT_SPORT),
        ],
        Lang::Vi => [
            (Category::Weather, VI_WEATHER),
            (Category::Business, VI_BUSINESS),
            (Category::Sport, VI_SPORT),
        ],
    }
}

/// Classify a headline against the language's keyword table, checked
/// in order weather, business, sport; the first category with a match
/// wins and anything unmatched lands in the generic world bucket.
/// Deterministic for identical input.
pub fn classify_title(lang: Lang, title: &str) -> Category {
    let title = title.to_lowercase();
    for (category, keywords) in keyword_table(lang) {
        if keywords.iter().any(|keyword| title.contains(keyword)) {
            return category;
        }
    }
    Category::World
}

/// Filter to the requested category. `Mix` passes everything through.
/// When the filter would come up empty the full merged set is returned
/// instead, unless strict mode is on.
pub fn filter_by_category(
    items: Vec<NewsItem>,
    requested: Category,
    strict: bool,
) -> Vec<NewsItem> {
    if requested == Category::Mix {
        return items;
    }

    let any_match = items.iter().any(|item| item.category == requested);
    if !any_match {
        if strict {
            return Vec::new();
        }
        return items;
    }

    items
        .into_iter()
        .filter(|item| item.category == requested)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, category: Category) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            link: format!("https://example.com/{}", title.len()),
            date: String::new(),
            source: "example.com".to_string(),
            description: None,
            category,
        }
    }

    mod classify_tests {
        use super::*;

        #[test]
        fn test_german_storm_is_weather() {
            assert_eq!(
                classify_title(Lang::De, "Sturmwarnung Rheinland"),
                Category::Weather
            );
        }

        #[test]
        fn test_classification_is_case_insensitive() {
            assert_eq!(
                classify_title(Lang::De, "STURMTIEF ÜBER DEM NORDEN"),
                Category::Weather
            );
        }

        #[test]
        fn test_weather_checked_before_sport() {
            // Both tables match; the earlier one wins
            assert_eq!(
                classify_title(Lang::De, "Sturm zwingt Bundesliga zur Absage"),
                Category::Weather
            );
        }

        #[test]
        fn test_unmatched_title_defaults_to_world() {
            assert_eq!(
                classify_title(Lang::De, "Parlament debattiert neues Gesetz"),
                Category::World
            );
        }

        #[test]
        fn test_english_keywords() {
            assert_eq!(
                classify_title(Lang::En, "Storm batters the coast"),
                Category::Weather
            );
            assert_eq!(
                classify_title(Lang::En, "Markets rally on rate cut hopes"),
                Category::Business
            );
            assert_eq!(
                classify_title(Lang::En, "Champions League draw announced"),
                Category::Sport
            );
        }

        #[test]
        fn test_french_keywords() {
            assert_eq!(
                classify_title(Lang::Fr, "Météo: vigilance orange"),
                Category::Weather
            );
            assert_eq!(
                classify_title(Lang::Fr, "La bourse de Paris en hausse"),
                Category::Business
            );
        }

        #[test]
        fn test_italian_keywords() {
            assert_eq!(
                classify_title(Lang::It, "Maltempo al nord"),
                Category::Weather
            );
            assert_eq!(
                classify_title(Lang::It, "Serie A: il campionato riparte"),
                Category::Sport
            );
        }

        #[test]
        fn test_vietnamese_keywords() {
            assert_eq!(
                classify_title(Lang::Vi, "Bão số 3 đổ bộ miền Trung"),
                Category::Weather
            );
            assert_eq!(
                classify_title(Lang::Vi, "Đội tuyển Việt Nam thắng lớn"),
                Category::Sport
            );
        }

        #[test]
        fn test_classification_is_deterministic() {
            let title = "Sturm und Fußball am Wochenende";
            let first = classify_title(Lang::De, title);
            let second = classify_title(Lang::De, title);
            assert_eq!(first, second);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_mix_passes_everything_through() {
            let items = vec![
                item("a", Category::Weather),
                item("b", Category::Sport),
                item("c", Category::World),
            ];
            let filtered = filter_by_category(items, Category::Mix, false);
            assert_eq!(filtered.len(), 3);
        }

        #[test]
        fn test_filter_keeps_matching_items_in_order() {
            let items = vec![
                item("a", Category::Weather),
                item("b", Category::Sport),
                item("c", Category::Weather),
            ];
            let filtered = filter_by_category(items, Category::Weather, false);
            assert_eq!(filtered.len(), 2);
            assert_eq!(filtered[0].title, "a");
            assert_eq!(filtered[1].title, "c");
        }

        #[test]
        fn test_empty_filter_result_widens_to_full_set() {
            let items = vec![item("a", Category::World), item("b", Category::Sport)];
            let filtered = filter_by_category(items, Category::Weather, false);
            assert_eq!(filtered.len(), 2);
        }

        #[test]
        fn test_strict_mode_keeps_empty_result() {
            let items = vec![item("a", Category::World), item("b", Category::Sport)];
            let filtered = filter_by_category(items, Category::Weather, true);
            assert!(filtered.is_empty());
        }

        #[test]
        fn test_strict_mode_still_filters_matches() {
            let items = vec![item("a", Category::Weather), item("b", Category::Sport)];
            let filtered = filter_by_category(items, Category::Weather, true);
            assert_eq!(filtered.len(), 1);
            assert_eq!(filtered[0].title, "a");
        }
    }
}
