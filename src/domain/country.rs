//! Country record as returned by the REST Countries API.
//!
//! Records are read-only: they are decoded from API responses and never mutated
//! by the plugin. Every field except the `cca3` code defaults when absent, so
//! responses restricted with `?fields=` decode into the same type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder shown for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// One nation's descriptive data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// ISO 3166-1 alpha-3 code, the unique key.
    pub cca3: String,
    #[serde(default)]
    pub name: CountryName,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: u64,
    /// Language code to language name, e.g. `"fra" -> "French"`.
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub currencies: BTreeMap<String, Currency>,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub coat_of_arms: CoatOfArms,
    #[serde(default)]
    pub idd: Idd,
    #[serde(default)]
    pub borders: Vec<String>,
    #[serde(default)]
    pub maps: Maps,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoatOfArms {
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
}

/// International dialing prefix and suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idd {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maps {
    #[serde(default)]
    pub google_maps: Option<String>,
    #[serde(default)]
    pub open_street_maps: Option<String>,
}

impl Country {
    /// Common name, falling back to the code when the API omitted names.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.common.is_empty() {
            &self.cca3
        } else {
            &self.name.common
        }
    }

    /// Flag image reference, preferring SVG over PNG.
    #[must_use]
    pub fn flag_ref(&self) -> String {
        self.flags
            .svg
            .clone()
            .or_else(|| self.flags.png.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn primary_capital(&self) -> &str {
        self.capital.first().map_or(NOT_AVAILABLE, String::as_str)
    }

    /// Dialing code such as `+254`.
    ///
    /// The suffix is appended only when there is exactly one; countries like
    /// the United States list hundreds of area suffixes under a single root.
    #[must_use]
    pub fn dialing_code(&self) -> Option<String> {
        let root = self.idd.root.as_deref()?;
        match self.idd.suffixes.as_slice() {
            [single] => Some(format!("{root}{single}")),
            _ => Some(root.to_string()),
        }
    }

    #[must_use]
    pub fn language_names(&self) -> Vec<&str> {
        self.languages.values().map(String::as_str).collect()
    }

    /// Currency labels formatted as `"Name (symbol)"`.
    #[must_use]
    pub fn currency_labels(&self) -> Vec<String> {
        self.currencies
            .values()
            .map(|c| format!("{} ({})", c.name, c.symbol.as_deref().unwrap_or("-")))
            .collect()
    }

    /// Returns `true` if one of the language names equals `language` exactly.
    ///
    /// Matching is case-sensitive and against the names (`"French"`), never the
    /// codes (`"fra"`).
    #[must_use]
    pub fn speaks(&self, language: &str) -> bool {
        self.languages.values().any(|name| name == language)
    }
}

/// Formats a population with thousands separators, e.g. `53771300` → `53,771,300`.
#[must_use]
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kenya_json() -> &'static str {
        r#"{
            "name": {"common": "Kenya", "official": "Republic of Kenya"},
            "cca3": "KEN",
            "capital": ["Nairobi"],
            "region": "Africa",
            "subregion": "Eastern Africa",
            "population": 53771300,
            "languages": {"eng": "English", "swa": "Swahili"},
            "currencies": {"KES": {"name": "Kenyan shilling", "symbol": "Sh"}},
            "flags": {"png": "https://flagcdn.com/w320/ke.png", "svg": "https://flagcdn.com/ke.svg"},
            "coatOfArms": {"svg": "https://mainfacts.com/media/images/coats_of_arms/ke.svg"},
            "idd": {"root": "+2", "suffixes": ["54"]},
            "borders": ["ETH", "SOM", "SSD", "TZA", "UGA"],
            "maps": {"googleMaps": "https://goo.gl/maps/Ni9M7wcCxf9JgpH9A"}
        }"#
    }

    #[test]
    fn decodes_full_record() {
        let country: Country = serde_json::from_str(kenya_json()).unwrap();
        assert_eq!(country.cca3, "KEN");
        assert_eq!(country.display_name(), "Kenya");
        assert_eq!(country.primary_capital(), "Nairobi");
        assert_eq!(country.dialing_code().as_deref(), Some("+254"));
        assert_eq!(country.flag_ref(), "https://flagcdn.com/ke.svg");
        assert_eq!(country.currency_labels(), vec!["Kenyan shilling (Sh)"]);
        assert_eq!(country.borders.len(), 5);
        assert!(country.maps.google_maps.is_some());
        assert!(country.coat_of_arms.svg.is_some());
    }

    #[test]
    fn decodes_projected_record_with_defaults() {
        let country: Country =
            serde_json::from_str(r#"{"cca3": "ATA", "name": {"common": "Antarctica"}}"#).unwrap();
        assert_eq!(country.primary_capital(), NOT_AVAILABLE);
        assert_eq!(country.population, 0);
        assert!(country.languages.is_empty());
        assert!(country.dialing_code().is_none());
        assert_eq!(country.flag_ref(), "");
    }

    #[test]
    fn speaks_matches_language_names_exactly() {
        let country: Country = serde_json::from_str(kenya_json()).unwrap();
        assert!(country.speaks("English"));
        assert!(!country.speaks("english"));
        assert!(!country.speaks("eng"));
    }

    #[test]
    fn dialing_code_keeps_root_for_many_suffixes() {
        let mut country: Country = serde_json::from_str(kenya_json()).unwrap();
        country.idd.suffixes = vec!["201".to_string(), "202".to_string()];
        assert_eq!(country.dialing_code().as_deref(), Some("+2"));
    }

    #[test]
    fn population_gets_thousands_separators() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(53_771_300), "53,771,300");
    }
}
