use std::collections::HashSet;

/// Per-category load state. The enum makes "data and error at the same time"
/// unrepresentable; a category starts in `Loading` and moves exactly once,
/// since each has a single fetch task sending a single action.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> DomainState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, DomainState::Loading)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: f64,
    pub conditions: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetQuote {
    pub id: String,
    pub price_usd: f64,
    pub change_24h: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub source: String,
}

/// Session-scoped favorite sets for cities and cryptos. Toggle semantics:
/// present removes, absent inserts.
#[derive(Debug, Default)]
pub struct Favorites {
    cities: HashSet<String>,
    cryptos: HashSet<String>,
}

impl Favorites {
    pub fn toggle_city(&mut self, city: &str) {
        if !self.cities.remove(city) {
            self.cities.insert(city.to_string());
        }
    }

    pub fn toggle_crypto(&mut self, crypto: &str) {
        if !self.cryptos.remove(crypto) {
            self.cryptos.insert(crypto.to_string());
        }
    }

    pub fn has_city(&self, city: &str) -> bool {
        self.cities.contains(city)
    }

    pub fn has_crypto(&self, crypto: &str) -> bool {
        self.cryptos.contains(crypto)
    }

    pub fn city_summary(&self) -> String {
        Self::summarize(&self.cities)
    }

    pub fn crypto_summary(&self) -> String {
        Self::summarize(&self.cryptos)
    }

    // Sorted so the summary line does not jump around between redraws.
    fn summarize(set: &HashSet<String>) -> String {
        if set.is_empty() {
            return "None".to_string();
        }
        let mut names: Vec<&str> = set.iter().map(String::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

/// Every state mutation flows through one of these; nothing else touches
/// `AppState`. Fetch tasks send Loaded/Failed, key handling sends toggles.
#[derive(Debug, Clone)]
pub enum Action {
    WeatherLoaded(WeatherReport),
    WeatherFailed(String),
    CryptoLoaded(Vec<AssetQuote>),
    CryptoFailed(String),
    NewsLoaded(Vec<NewsItem>),
    NewsFailed(String),
    ToggleFavoriteCity(String),
    ToggleFavoriteCrypto(String),
}

pub struct AppState {
    pub weather: DomainState<WeatherReport>,
    pub crypto: DomainState<Vec<AssetQuote>>,
    pub news: DomainState<Vec<NewsItem>>,
    pub favorites: Favorites,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            weather: DomainState::Loading,
            crypto: DomainState::Loading,
            news: DomainState::Loading,
            favorites: Favorites::default(),
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::WeatherLoaded(report) => self.weather = DomainState::Ready(report),
            Action::WeatherFailed(err) => self.weather = DomainState::Failed(err),
            Action::CryptoLoaded(quotes) => self.crypto = DomainState::Ready(quotes),
            Action::CryptoFailed(err) => self.crypto = DomainState::Failed(err),
            Action::NewsLoaded(items) => self.news = DomainState::Ready(items),
            Action::NewsFailed(err) => self.news = DomainState::Failed(err),
            Action::ToggleFavoriteCity(city) => self.favorites.toggle_city(&city),
            Action::ToggleFavoriteCrypto(crypto) => self.favorites.toggle_crypto(&crypto),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_parity_decides_membership() {
        for toggles in 0..6 {
            let mut favorites = Favorites::default();
            for _ in 0..toggles {
                favorites.toggle_crypto("bitcoin");
            }
            assert_eq!(favorites.has_crypto("bitcoin"), toggles % 2 == 1);
        }
    }

    #[test]
    fn toggles_are_independent_per_identifier() {
        let mut state = AppState::new();
        state.apply(Action::ToggleFavoriteCity("New York".to_string()));
        state.apply(Action::ToggleFavoriteCrypto("bitcoin".to_string()));
        state.apply(Action::ToggleFavoriteCrypto("ethereum".to_string()));
        state.apply(Action::ToggleFavoriteCrypto("ethereum".to_string()));

        assert!(state.favorites.has_city("New York"));
        assert!(state.favorites.has_crypto("bitcoin"));
        assert!(!state.favorites.has_crypto("ethereum"));
    }

    #[test]
    fn summary_is_sorted_or_none() {
        let mut favorites = Favorites::default();
        assert_eq!(favorites.city_summary(), "None");

        favorites.toggle_crypto("ethereum");
        favorites.toggle_crypto("bitcoin");
        assert_eq!(favorites.crypto_summary(), "bitcoin, ethereum");

        favorites.toggle_crypto("bitcoin");
        assert_eq!(favorites.crypto_summary(), "ethereum");
    }

    #[test]
    fn domains_start_loading_and_settle_once() {
        let mut state = AppState::new();
        assert!(state.weather.is_loading());
        assert!(state.crypto.is_loading());
        assert!(state.news.is_loading());

        state.apply(Action::WeatherLoaded(WeatherReport {
            city: "New York".to_string(),
            temperature_c: 21.5,
            conditions: "Clear".to_string(),
        }));
        state.apply(Action::CryptoFailed("CoinCap API returned status 502".to_string()));

        assert!(matches!(state.weather, DomainState::Ready(_)));
        assert!(matches!(state.crypto, DomainState::Failed(_)));
        assert!(state.news.is_loading());
    }
}
