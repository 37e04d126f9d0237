//! Query/filter pipeline.
//!
//! Turns search, region, language, clear and select actions into fetches, then
//! applies the completed fetches to the displayed list. Fetch results arrive
//! asynchronously as `(request id, status, body)`; the pipeline remembers what
//! each request id was for.
//!
//! There is no cancellation. When actions overlap, each completion is applied
//! in arrival order and the last one to resolve decides the display.

use crate::api::{CountryClient, CountryQuery};
use crate::domain::country::Country;
use crate::domain::error::Result;
use crate::domain::session::{RecentSearchEntry, SearchKind};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub const SEARCH_FAILED: &str = "Failed to search countries. Please try again later.";
pub const REGION_FAILED: &str = "Failed to filter countries by region. Please try again later.";
pub const LANGUAGE_FAILED: &str =
    "Failed to filter countries by language. Please try again later.";
pub const FETCH_FAILED: &str = "Failed to fetch countries. Please try again later.";
pub const DETAIL_FAILED: &str = "Failed to load country details. Please try again later.";

/// Identifier carried in the host request context.
pub type RequestId = u64;

/// A GET request the host should issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetch {
    pub id: RequestId,
    pub url: String,
}

/// The search or filter currently applied to the display list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub kind: SearchKind,
    pub value: String,
}

impl ActiveFilter {
    #[must_use]
    pub fn new(kind: SearchKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Heading for the list under `filter`.
#[must_use]
pub fn list_title(filter: Option<&ActiveFilter>) -> String {
    match filter {
        None => "All Countries".to_string(),
        Some(ActiveFilter { kind: SearchKind::Search, value }) => {
            format!("Search results for: \"{value}\"")
        }
        Some(ActiveFilter { kind: SearchKind::Region, value }) => {
            format!("Showing countries in: {value}")
        }
        Some(ActiveFilter { kind: SearchKind::Language, value }) => {
            format!("Showing countries speaking: {value}")
        }
    }
}

/// Side effects requested by a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue another request.
    Fetch(Fetch),
    /// Record an entry in the recent-search log.
    Record(RecentSearchEntry),
    /// The detail view has a country to show.
    DetailOpened,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Purpose {
    Search(String),
    Region(String),
    Language(String),
    FullList,
    Detail,
    Borders(String),
}

#[derive(Debug, Clone)]
struct Pending {
    purpose: Purpose,
    query: CountryQuery,
}

/// Display list, active filter and in-flight fetches.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: CountryClient,
    countries: Vec<Country>,
    display: Vec<Country>,
    filter: Option<ActiveFilter>,
    pending: BTreeMap<RequestId, Pending>,
    next_id: RequestId,
    error: Option<String>,
    detail: Option<Country>,
    border_names: BTreeMap<String, String>,
}

impl Pipeline {
    #[must_use]
    pub fn new(client: CountryClient) -> Self {
        Self {
            client,
            countries: Vec::new(),
            display: Vec::new(),
            filter: None,
            pending: BTreeMap::new(),
            next_id: 1,
            error: None,
            detail: None,
            border_names: BTreeMap::new(),
        }
    }

    /// The full list from the last successful clear.
    #[must_use]
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    #[must_use]
    pub fn display(&self) -> &[Country] {
        &self.display
    }

    #[must_use]
    pub fn filter(&self) -> Option<&ActiveFilter> {
        self.filter.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        !self.pending.is_empty()
    }

    #[must_use]
    pub fn detail(&self) -> Option<&Country> {
        self.detail.as_ref()
    }

    /// Common name of a border country, once resolved.
    #[must_use]
    pub fn border_name(&self, code: &str) -> Option<&str> {
        self.border_names.get(code).map(String::as_str)
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.border_names.clear();
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Searches by name. A blank term restores the full list without a fetch.
    pub fn search(&mut self, term: &str) -> Option<Fetch> {
        self.error = None;
        if term.trim().is_empty() {
            tracing::debug!("blank search, showing full list");
            self.display.clone_from(&self.countries);
            self.filter = None;
            return None;
        }
        self.start(
            Purpose::Search(term.to_string()),
            CountryQuery::ByName(term.to_string()),
        )
    }

    pub fn filter_region(&mut self, region: &str) -> Option<Fetch> {
        self.error = None;
        self.start(
            Purpose::Region(region.to_string()),
            CountryQuery::ByRegion(region.to_string()),
        )
    }

    pub fn filter_language(&mut self, language: &str) -> Option<Fetch> {
        self.error = None;
        self.start(
            Purpose::Language(language.to_string()),
            CountryQuery::ByLanguage(language.to_string()),
        )
    }

    /// Reloads the full list and drops the active filter on success.
    pub fn clear(&mut self) -> Option<Fetch> {
        self.error = None;
        self.start(Purpose::FullList, CountryQuery::All)
    }

    /// Loads one country for the detail view.
    pub fn select(&mut self, code: &str) -> Option<Fetch> {
        self.error = None;
        self.start(Purpose::Detail, CountryQuery::ByCode(code.to_string()))
    }

    /// Re-issues the action a recent-search entry describes.
    pub fn rerun(&mut self, entry: &RecentSearchEntry) -> Option<Fetch> {
        match entry.kind {
            SearchKind::Search => self.search(&entry.value),
            SearchKind::Region => self.filter_region(&entry.value),
            SearchKind::Language => self.filter_language(&entry.value),
        }
    }

    fn start(&mut self, purpose: Purpose, query: CountryQuery) -> Option<Fetch> {
        let request = self.client.request(&query)?;
        let id = self.next_id;
        self.next_id += 1;

        tracing::debug!(id, %query, url = %request.url, "fetch started");
        self.pending.insert(id, Pending { purpose, query });
        Some(Fetch {
            id,
            url: request.url,
        })
    }

    /// Applies a completed fetch.
    ///
    /// Unknown ids are ignored. `now` stamps any recent-search entry produced.
    pub fn complete(
        &mut self,
        id: RequestId,
        status: u16,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        let Some(pending) = self.pending.remove(&id) else {
            tracing::debug!(id, "ignoring completion for unknown request");
            return vec![];
        };

        let _span =
            tracing::debug_span!("fetch_complete", id, status, purpose = ?pending.purpose)
                .entered();

        let result = self.client.decode(&pending.query, status, body);
        match pending.purpose {
            Purpose::Search(term) => self.finish_search(term, result, now),
            Purpose::Region(region) => {
                self.finish_filter(SearchKind::Region, region, result, REGION_FAILED, now)
            }
            Purpose::Language(language) => {
                self.finish_filter(SearchKind::Language, language, result, LANGUAGE_FAILED, now)
            }
            Purpose::FullList => {
                match result {
                    Ok(countries) => {
                        self.countries = countries;
                        self.display.clone_from(&self.countries);
                        self.filter = None;
                    }
                    Err(e) => self.fail(FETCH_FAILED, &e),
                }
                vec![]
            }
            Purpose::Detail => self.finish_detail(result),
            Purpose::Borders(code) => {
                match result {
                    Ok(neighbours) if self.detail.as_ref().is_some_and(|d| d.cca3 == code) => {
                        self.border_names = neighbours
                            .into_iter()
                            .map(|c| (c.cca3.clone(), c.display_name().to_string()))
                            .collect();
                    }
                    Ok(_) => tracing::debug!(code = %code, "detail closed before borders resolved"),
                    Err(e) => tracing::warn!(error = %e, "failed to resolve border names"),
                }
                vec![]
            }
        }
    }

    fn finish_search(
        &mut self,
        term: String,
        result: Result<Vec<Country>>,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        match result {
            Ok(countries) if !countries.is_empty() => {
                self.display = countries;
                self.filter = Some(ActiveFilter::new(SearchKind::Search, term.clone()));
                vec![Effect::Record(RecentSearchEntry::new(
                    SearchKind::Search,
                    term,
                    now,
                ))]
            }
            Ok(_) => {
                self.show_no_matches(term);
                vec![]
            }
            Err(e) if e.is_not_found() => {
                self.show_no_matches(term);
                vec![]
            }
            Err(e) => {
                self.fail(SEARCH_FAILED, &e);
                vec![]
            }
        }
    }

    fn show_no_matches(&mut self, term: String) {
        tracing::debug!(term = %term, "no countries matched search");
        self.display.clear();
        self.filter = Some(ActiveFilter::new(SearchKind::Search, term));
    }

    fn finish_filter(
        &mut self,
        kind: SearchKind,
        value: String,
        result: Result<Vec<Country>>,
        message: &str,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        match result {
            Ok(countries) => {
                self.display = countries;
                self.filter = Some(ActiveFilter::new(kind, value.clone()));
                vec![Effect::Record(RecentSearchEntry::new(kind, value, now))]
            }
            Err(e) => {
                self.fail(message, &e);
                vec![]
            }
        }
    }

    fn finish_detail(&mut self, result: Result<Vec<Country>>) -> Vec<Effect> {
        let country = match result.map(|countries| countries.into_iter().next()) {
            Ok(Some(country)) => country,
            Ok(None) => {
                self.error = Some(DETAIL_FAILED.to_string());
                return vec![];
            }
            Err(e) => {
                self.fail(DETAIL_FAILED, &e);
                return vec![];
            }
        };

        self.border_names.clear();
        let borders = CountryQuery::ByCodes(country.borders.clone());
        let code = country.cca3.clone();
        self.detail = Some(country);

        let mut effects = vec![Effect::DetailOpened];
        if let Some(fetch) = self.start(Purpose::Borders(code), borders) {
            effects.push(Effect::Fetch(fetch));
        }
        effects
    }

    fn fail(&mut self, message: &str, error: &crate::domain::CountryscopeError) {
        tracing::warn!(error = %error, "{message}");
        self.error = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &str = r#"[
        {"cca3": "KEN", "name": {"common": "Kenya"}, "region": "Africa",
         "languages": {"eng": "English", "swa": "Swahili"}},
        {"cca3": "SEN", "name": {"common": "Senegal"}, "region": "Africa",
         "languages": {"fra": "French"}},
        {"cca3": "FRA", "name": {"common": "France"}, "region": "Europe",
         "languages": {"fra": "French"}}
    ]"#;

    const AFRICA: &str = r#"[
        {"cca3": "KEN", "name": {"common": "Kenya"}, "region": "Africa"},
        {"cca3": "SEN", "name": {"common": "Senegal"}, "region": "Africa"}
    ]"#;

    const KENYA: &str = r#"[{"cca3": "KEN", "name": {"common": "Kenya"}, "region": "Africa",
        "borders": ["ETH", "TZA"]}]"#;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(CountryClient::new("https://api.test", vec![]))
    }

    fn loaded() -> Pipeline {
        let mut p = pipeline();
        let fetch = p.clear().unwrap();
        assert!(p.complete(fetch.id, 200, ALL.as_bytes(), now()).is_empty());
        p
    }

    fn codes(p: &Pipeline) -> Vec<&str> {
        p.display().iter().map(|c| c.cca3.as_str()).collect()
    }

    fn recorded(effects: &[Effect]) -> Vec<(SearchKind, &str)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Record(entry) => Some((entry.kind, entry.value.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn initial_load_fills_full_list() {
        let p = loaded();
        assert_eq!(p.countries().len(), 3);
        assert_eq!(codes(&p), vec!["KEN", "SEN", "FRA"]);
        assert!(p.filter().is_none());
        assert!(!p.loading());
    }

    #[test]
    fn search_kenya_records_history() {
        let mut p = loaded();
        let fetch = p.search("Kenya").unwrap();
        assert_eq!(fetch.url, "https://api.test/name/Kenya");
        assert!(p.loading());

        let effects = p.complete(fetch.id, 200, KENYA.as_bytes(), now());
        assert_eq!(codes(&p), vec!["KEN"]);
        assert_eq!(p.filter(), Some(&ActiveFilter::new(SearchKind::Search, "Kenya")));
        assert_eq!(recorded(&effects), vec![(SearchKind::Search, "Kenya")]);
        assert!(p.error().is_none());
        assert!(!p.loading());
    }

    #[test]
    fn search_wakanda_shows_empty_list_without_error() {
        let mut p = loaded();
        let fetch = p.search("Wakanda").unwrap();
        let effects = p.complete(fetch.id, 404, br#"{"status":404,"message":"Not Found"}"#, now());

        assert!(p.display().is_empty());
        assert_eq!(p.filter(), Some(&ActiveFilter::new(SearchKind::Search, "Wakanda")));
        assert!(effects.is_empty());
        assert!(p.error().is_none());
    }

    #[test]
    fn empty_search_result_is_treated_like_not_found() {
        let mut p = loaded();
        let fetch = p.search("Atlantis").unwrap();
        let effects = p.complete(fetch.id, 200, b"[]", now());
        assert!(p.display().is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn blank_search_restores_full_list_without_fetch() {
        let mut p = loaded();
        let fetch = p.filter_region("Africa").unwrap();
        p.complete(fetch.id, 200, AFRICA.as_bytes(), now());

        assert!(p.search("   ").is_none());
        assert_eq!(codes(&p), vec!["KEN", "SEN", "FRA"]);
        assert!(p.filter().is_none());
    }

    #[test]
    fn region_then_language_records_both() {
        let mut p = loaded();

        let region = p.filter_region("Africa").unwrap();
        assert_eq!(region.url, "https://api.test/region/Africa");
        let first = p.complete(region.id, 200, AFRICA.as_bytes(), now());
        assert_eq!(codes(&p), vec!["KEN", "SEN"]);

        let language = p.filter_language("French").unwrap();
        assert_eq!(language.url, "https://api.test/all");
        let second = p.complete(language.id, 200, ALL.as_bytes(), now());

        assert_eq!(codes(&p), vec!["SEN", "FRA"]);
        assert_eq!(p.filter(), Some(&ActiveFilter::new(SearchKind::Language, "French")));
        assert_eq!(recorded(&first), vec![(SearchKind::Region, "Africa")]);
        assert_eq!(recorded(&second), vec![(SearchKind::Language, "French")]);
    }

    #[test]
    fn failures_keep_display_and_set_message() {
        let mut p = loaded();
        let cases = [
            (p.search("Kenya").unwrap(), SEARCH_FAILED),
            (p.filter_region("Asia").unwrap(), REGION_FAILED),
            (p.filter_language("Arabic").unwrap(), LANGUAGE_FAILED),
            (p.clear().unwrap(), FETCH_FAILED),
            (p.select("KEN").unwrap(), DETAIL_FAILED),
        ];
        for (fetch, message) in cases {
            let effects = p.complete(fetch.id, 500, b"", now());
            assert!(effects.is_empty());
            assert_eq!(p.error(), Some(message));
            assert_eq!(codes(&p), vec!["KEN", "SEN", "FRA"]);
            assert!(p.filter().is_none());
        }
        assert!(p.detail().is_none());
    }

    #[test]
    fn starting_an_action_clears_error() {
        let mut p = loaded();
        let fetch = p.filter_region("Asia").unwrap();
        p.complete(fetch.id, 503, b"", now());
        assert!(p.error().is_some());

        let _ = p.filter_region("Europe");
        assert!(p.error().is_none());
    }

    #[test]
    fn clear_drops_filter_on_success() {
        let mut p = loaded();
        let fetch = p.filter_region("Africa").unwrap();
        p.complete(fetch.id, 200, AFRICA.as_bytes(), now());

        let fetch = p.clear().unwrap();
        p.complete(fetch.id, 200, ALL.as_bytes(), now());
        assert!(p.filter().is_none());
        assert_eq!(p.display().len(), 3);
    }

    #[test]
    fn last_completion_wins() {
        let mut p = loaded();
        let region = p.filter_region("Africa").unwrap();
        let search = p.search("France").unwrap();

        p.complete(search.id, 200, br#"[{"cca3": "FRA", "name": {"common": "France"}}]"#, now());
        p.complete(region.id, 200, AFRICA.as_bytes(), now());

        assert_eq!(codes(&p), vec!["KEN", "SEN"]);
        assert_eq!(p.filter(), Some(&ActiveFilter::new(SearchKind::Region, "Africa")));
    }

    #[test]
    fn select_opens_detail_and_resolves_borders() {
        let mut p = loaded();
        let fetch = p.select("KEN").unwrap();
        assert_eq!(fetch.url, "https://api.test/alpha/KEN");

        let effects = p.complete(fetch.id, 200, KENYA.as_bytes(), now());
        assert_eq!(p.detail().map(|c| c.cca3.as_str()), Some("KEN"));
        assert_eq!(effects[0], Effect::DetailOpened);
        let Effect::Fetch(borders) = &effects[1] else {
            panic!("expected border fetch, got {effects:?}");
        };
        assert_eq!(borders.url, "https://api.test/alpha?codes=ETH,TZA");
        assert!(p.filter().is_none());

        p.complete(
            borders.id,
            200,
            br#"[{"cca3": "ETH", "name": {"common": "Ethiopia"}},
                 {"cca3": "TZA", "name": {"common": "Tanzania"}}]"#,
            now(),
        );
        assert_eq!(p.border_name("ETH"), Some("Ethiopia"));
        assert_eq!(p.border_name("SOM"), None);

        p.close_detail();
        assert!(p.detail().is_none());
        assert_eq!(p.border_name("ETH"), None);
    }

    #[test]
    fn island_detail_needs_no_border_fetch() {
        let mut p = loaded();
        let fetch = p.select("ISL").unwrap();
        let effects = p.complete(
            fetch.id,
            200,
            br#"[{"cca3": "ISL", "name": {"common": "Iceland"}}]"#,
            now(),
        );
        assert_eq!(effects, vec![Effect::DetailOpened]);
        assert!(!p.loading());
    }

    #[test]
    fn rerun_replays_entry_kind() {
        let mut p = loaded();
        let entry = RecentSearchEntry::new(SearchKind::Language, "French", now());
        let fetch = p.rerun(&entry).unwrap();
        p.complete(fetch.id, 200, ALL.as_bytes(), now());
        assert_eq!(p.filter(), Some(&ActiveFilter::new(SearchKind::Language, "French")));
    }

    #[test]
    fn unknown_request_is_ignored() {
        let mut p = loaded();
        assert!(p.complete(999, 200, ALL.as_bytes(), now()).is_empty());
        assert_eq!(p.display().len(), 3);
    }

    #[test]
    fn titles_follow_filter() {
        assert_eq!(list_title(None), "All Countries");
        assert_eq!(
            list_title(Some(&ActiveFilter::new(SearchKind::Search, "ken"))),
            "Search results for: \"ken\""
        );
        assert_eq!(
            list_title(Some(&ActiveFilter::new(SearchKind::Region, "Asia"))),
            "Showing countries in: Asia"
        );
        assert_eq!(
            list_title(Some(&ActiveFilter::new(SearchKind::Language, "Arabic"))),
            "Showing countries speaking: Arabic"
        );
    }
}
