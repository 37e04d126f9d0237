//! Query dimensions supported by the country API.

use std::fmt;

/// One lookup against the REST Countries API.
///
/// Each variant maps to exactly one GET endpoint; see
/// [`crate::api::CountryClient::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryQuery {
    /// Every country.
    All,
    /// Every country, projected to the listed fields.
    AllWithFields(Vec<String>),
    /// Partial name match.
    ByName(String),
    /// Exact full-name match.
    ByFullName(String),
    /// Single country by alpha code.
    ByCode(String),
    /// Several countries by alpha code.
    ByCodes(Vec<String>),
    ByRegion(String),
    /// Every country, filtered locally to those speaking the language.
    ByLanguage(String),
    ByCapital(String),
    ByCurrency(String),
    ByTranslation(String),
}

impl CountryQuery {
    /// Path and query string relative to the API base.
    ///
    /// Returns `None` when the query needs no request at all.
    #[must_use]
    pub fn path(&self, list_fields: &[String]) -> Option<String> {
        let path = match self {
            Self::All | Self::ByLanguage(_) => all_path(list_fields),
            Self::AllWithFields(fields) => all_path(fields),
            Self::ByName(name) => format!("/name/{}", escape(name)),
            Self::ByFullName(name) => format!("/name/{}?fullText=true", escape(name)),
            Self::ByCode(code) => format!("/alpha/{}", escape(code)),
            Self::ByCodes(codes) if codes.is_empty() => return None,
            Self::ByCodes(codes) => format!("/alpha?codes={}", escape(&codes.join(","))),
            Self::ByRegion(region) => format!("/region/{}", escape(region)),
            Self::ByCapital(capital) => format!("/capital/{}", escape(capital)),
            Self::ByCurrency(currency) => format!("/currency/{}", escape(currency)),
            Self::ByTranslation(translation) => format!("/translation/{}", escape(translation)),
        };
        Some(path)
    }
}

impl fmt::Display for CountryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::AllWithFields(fields) => write!(f, "all[{}]", fields.join(",")),
            Self::ByName(v) => write!(f, "name:{v}"),
            Self::ByFullName(v) => write!(f, "fullname:{v}"),
            Self::ByCode(v) => write!(f, "code:{v}"),
            Self::ByCodes(v) => write!(f, "codes:{}", v.join(",")),
            Self::ByRegion(v) => write!(f, "region:{v}"),
            Self::ByLanguage(v) => write!(f, "language:{v}"),
            Self::ByCapital(v) => write!(f, "capital:{v}"),
            Self::ByCurrency(v) => write!(f, "currency:{v}"),
            Self::ByTranslation(v) => write!(f, "translation:{v}"),
        }
    }
}

fn all_path(fields: &[String]) -> String {
    if fields.is_empty() {
        "/all".to_string()
    } else {
        format!("/all?fields={}", fields.join(","))
    }
}

// Values go into the URL as typed; only spaces need escaping for the host's
// HTTP client to accept the URL.
fn escape(value: &str) -> String {
    value.replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn each_dimension_maps_to_one_endpoint() {
        let none: Vec<String> = Vec::new();
        let cases = [
            (CountryQuery::All, "/all"),
            (CountryQuery::ByName("Kenya".into()), "/name/Kenya"),
            (
                CountryQuery::ByFullName("Kenya".into()),
                "/name/Kenya?fullText=true",
            ),
            (CountryQuery::ByCode("KEN".into()), "/alpha/KEN"),
            (
                CountryQuery::ByCodes(fields(&["ETH", "SOM"])),
                "/alpha?codes=ETH,SOM",
            ),
            (CountryQuery::ByRegion("Africa".into()), "/region/Africa"),
            (CountryQuery::ByCapital("Nairobi".into()), "/capital/Nairobi"),
            (CountryQuery::ByCurrency("KES".into()), "/currency/KES"),
            (CountryQuery::ByTranslation("Kenia".into()), "/translation/Kenia"),
        ];
        for (query, expected) in cases {
            assert_eq!(query.path(&none).as_deref(), Some(expected), "{query}");
        }
    }

    #[test]
    fn list_fields_project_full_list_and_language_queries() {
        let list = fields(&["name", "cca3", "languages"]);
        assert_eq!(
            CountryQuery::All.path(&list).as_deref(),
            Some("/all?fields=name,cca3,languages")
        );
        assert_eq!(
            CountryQuery::ByLanguage("French".into()).path(&list).as_deref(),
            Some("/all?fields=name,cca3,languages")
        );
        assert_eq!(
            CountryQuery::ByRegion("Asia".into()).path(&list).as_deref(),
            Some("/region/Asia")
        );
    }

    #[test]
    fn empty_projections_and_code_lists() {
        let none: Vec<String> = Vec::new();
        assert_eq!(
            CountryQuery::AllWithFields(Vec::new()).path(&none).as_deref(),
            Some("/all")
        );
        assert_eq!(CountryQuery::ByCodes(Vec::new()).path(&none), None);
    }

    #[test]
    fn spaces_are_escaped() {
        assert_eq!(
            CountryQuery::ByName("united states".into())
                .path(&[])
                .as_deref(),
            Some("/name/united%20states")
        );
        assert_eq!(
            CountryQuery::ByName("côte d'ivoire".into())
                .path(&[])
                .as_deref(),
            Some("/name/côte%20d'ivoire")
        );
    }
}
