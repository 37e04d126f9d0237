//! Request building and response decoding for the REST Countries API.
//!
//! The client never performs I/O itself. [`CountryClient::request`] produces the
//! URL the plugin hands to Zellij's `web_request`, and [`CountryClient::decode`]
//! turns the `WebRequestResult` status and body back into [`Country`] records.

use crate::api::query::CountryQuery;
use crate::domain::country::Country;
use crate::domain::error::{CountryscopeError, Result};
use serde::Deserialize;

/// Public endpoint used when no `api_base_url` is configured.
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Fields requested for list views.
pub const DEFAULT_LIST_FIELDS: &[&str] = &[
    "name",
    "capital",
    "population",
    "region",
    "subregion",
    "flags",
    "cca3",
    "languages",
];

/// A GET request ready to be issued by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    /// The query this request answers, needed again for decoding.
    pub query: CountryQuery,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Country>),
    One(Box<Country>),
}

/// Builds requests and decodes responses for one API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryClient {
    base_url: String,
    list_fields: Vec<String>,
}

impl Default for CountryClient {
    fn default() -> Self {
        Self::new(
            DEFAULT_BASE_URL,
            DEFAULT_LIST_FIELDS.iter().map(|f| (*f).to_string()).collect(),
        )
    }
}

impl CountryClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, list_fields: Vec<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            list_fields,
        }
    }

    /// Builds the single GET request for `query`.
    ///
    /// Returns `None` for [`CountryQuery::ByCodes`] with no codes; callers treat
    /// that as an empty result without touching the network.
    ///
    /// # Examples
    ///
    /// ```
    /// use countryscope::api::{CountryClient, CountryQuery};
    ///
    /// let client = CountryClient::new("https://restcountries.com/v3.1", vec![]);
    /// let request = client.request(&CountryQuery::ByRegion("Africa".into())).unwrap();
    /// assert_eq!(request.url, "https://restcountries.com/v3.1/region/Africa");
    /// ```
    #[must_use]
    pub fn request(&self, query: &CountryQuery) -> Option<FetchRequest> {
        let path = query.path(&self.list_fields)?;
        Some(FetchRequest {
            url: format!("{}{}", self.base_url, path),
            query: query.clone(),
        })
    }

    /// Decodes a completed response for `query`.
    ///
    /// # Errors
    ///
    /// - [`CountryscopeError::NotFound`] for status 404
    /// - [`CountryscopeError::Http`] for any other non-2xx status
    /// - [`CountryscopeError::Decode`] when the body is not country JSON
    pub fn decode(&self, query: &CountryQuery, status: u16, body: &[u8]) -> Result<Vec<Country>> {
        let _span = tracing::debug_span!("decode_countries", %query, status, bytes = body.len())
            .entered();

        if status == 404 {
            return Err(CountryscopeError::NotFound);
        }
        if !(200..300).contains(&status) {
            return Err(CountryscopeError::Http { status });
        }

        let countries = match serde_json::from_slice::<OneOrMany>(body)? {
            OneOrMany::Many(countries) => countries,
            OneOrMany::One(country) => vec![*country],
        };

        let countries = match query {
            CountryQuery::ByLanguage(language) => countries
                .into_iter()
                .filter(|country| country.speaks(language))
                .collect(),
            _ => countries,
        };

        tracing::debug!(count = countries.len(), "decoded countries");
        Ok(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[
        {"cca3": "FRA", "name": {"common": "France"}, "region": "Europe",
         "languages": {"fra": "French"}},
        {"cca3": "SEN", "name": {"common": "Senegal"}, "region": "Africa",
         "languages": {"fra": "French"}},
        {"cca3": "KEN", "name": {"common": "Kenya"}, "region": "Africa",
         "languages": {"eng": "English", "swa": "Swahili"}},
        {"cca3": "ATA", "name": {"common": "Antarctica"}, "region": "Antarctic"}
    ]"#;

    fn client() -> CountryClient {
        CountryClient::new("https://example.test/v3.1/", vec![])
    }

    #[test]
    fn request_joins_base_and_path() {
        let request = client()
            .request(&CountryQuery::ByCode("KEN".into()))
            .unwrap();
        assert_eq!(request.url, "https://example.test/v3.1/alpha/KEN");
        assert_eq!(request.query, CountryQuery::ByCode("KEN".into()));
    }

    #[test]
    fn default_client_projects_full_list() {
        let request = CountryClient::default().request(&CountryQuery::All).unwrap();
        assert_eq!(
            request.url,
            "https://restcountries.com/v3.1/all?fields=name,capital,population,region,subregion,flags,cca3,languages"
        );
    }

    #[test]
    fn empty_code_list_needs_no_request() {
        assert!(client().request(&CountryQuery::ByCodes(vec![])).is_none());
    }

    #[test]
    fn decodes_array_and_single_object() {
        let all = client().decode(&CountryQuery::All, 200, BODY.as_bytes()).unwrap();
        assert_eq!(all.len(), 4);

        let one = client()
            .decode(
                &CountryQuery::ByCode("KEN".into()),
                200,
                br#"{"cca3": "KEN", "name": {"common": "Kenya"}}"#,
            )
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].cca3, "KEN");
    }

    #[test]
    fn language_query_keeps_exact_speakers_only() {
        let french = client()
            .decode(&CountryQuery::ByLanguage("French".into()), 200, BODY.as_bytes())
            .unwrap();
        let codes: Vec<_> = french.iter().map(|c| c.cca3.as_str()).collect();
        assert_eq!(codes, vec!["FRA", "SEN"]);

        let lower = client()
            .decode(&CountryQuery::ByLanguage("french".into()), 200, BODY.as_bytes())
            .unwrap();
        assert!(lower.is_empty());
    }

    #[test]
    fn status_codes_map_to_errors() {
        let query = CountryQuery::ByName("Wakanda".into());
        let not_found = client().decode(&query, 404, br#"{"status":404}"#).unwrap_err();
        assert!(not_found.is_not_found());

        let server = client().decode(&query, 503, b"").unwrap_err();
        assert!(matches!(server, CountryscopeError::Http { status: 503 }));

        let garbage = client().decode(&query, 200, b"<html>").unwrap_err();
        assert!(matches!(garbage, CountryscopeError::Decode(_)));
    }
}
