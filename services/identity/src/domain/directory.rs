//! Language and country reference data with per-language names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name with a default and optional per-language translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub default: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl LocalizedName {
    pub fn plain(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            translations: BTreeMap::new(),
        }
    }

    /// Translation for `lang`, falling back to the default.
    pub fn get(&self, lang: &str) -> &str {
        self.translations
            .get(lang)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: LocalizedName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: String,
    pub name: LocalizedName,
    #[serde(default)]
    pub cities: Vec<City>,
}

impl State {
    pub fn city(&self, id: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub iso2: String,
    pub iso3: String,
    pub name: LocalizedName,
    #[serde(default)]
    pub states: Vec<State>,
}

impl Country {
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|state| state.id == id)
    }

    pub fn info(&self, lang: &str) -> CountryInfo {
        CountryInfo {
            iso2: self.iso2.clone(),
            iso3: self.iso3.clone(),
            name: self.name.get(lang).to_owned(),
        }
    }
}

// ── Localized projections ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryInfo {
    pub iso2: String,
    pub iso3: String,
    pub name: String,
}

/// `{id, name}` pair used for states and cities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateDetails {
    pub id: String,
    pub name: String,
    pub cities: Vec<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryDetails {
    pub country: CountryInfo,
    pub states: Vec<StateDetails>,
}

impl CountryDetails {
    pub fn localize(country: &Country, lang: &str) -> Self {
        Self {
            country: country.info(lang),
            states: country
                .states
                .iter()
                .map(|state| StateDetails {
                    id: state.id.clone(),
                    name: state.name.get(lang).to_owned(),
                    cities: state
                        .cities
                        .iter()
                        .map(|city| NamedRef {
                            id: city.id.clone(),
                            name: city.name.get(lang).to_owned(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Localized country / state / city resolved for one address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub country: Option<CountryInfo>,
    pub state: Option<NamedRef>,
    pub city: Option<NamedRef>,
}

impl Location {
    /// Resolve ids against `country`. Unknown state or city ids resolve to `None`.
    pub fn resolve(
        country: &Country,
        state_id: Option<&str>,
        city_id: Option<&str>,
        lang: &str,
    ) -> Self {
        let state = state_id.and_then(|id| country.state(id));
        let city = state.zip(city_id).and_then(|(state, id)| state.city(id));
        Self {
            country: Some(country.info(lang)),
            state: state.map(|s| NamedRef {
                id: s.id.clone(),
                name: s.name.get(lang).to_owned(),
            }),
            city: city.map(|c| NamedRef {
                id: c.id.clone(),
                name: c.name.get(lang).to_owned(),
            }),
        }
    }
}
