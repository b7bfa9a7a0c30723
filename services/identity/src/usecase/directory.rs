use std::collections::HashMap;

use crate::domain::directory::{Country, CountryDetails, CountryInfo, Language, Location};
use crate::domain::repository::DirectoryRepository;
use crate::domain::types::Address;
use crate::error::IdentityError;

pub struct GetLanguagesUseCase<D: DirectoryRepository> {
    pub directories: D,
}

impl<D: DirectoryRepository> GetLanguagesUseCase<D> {
    pub async fn execute(&self) -> Result<Vec<Language>, IdentityError> {
        self.directories.languages().await
    }
}

pub struct GetCountriesUseCase<D: DirectoryRepository> {
    pub directories: D,
}

impl<D: DirectoryRepository> GetCountriesUseCase<D> {
    pub async fn execute(&self, lang: &str) -> Result<Vec<CountryInfo>, IdentityError> {
        let countries = self.directories.countries().await?;
        Ok(countries.iter().map(|c| c.info(lang)).collect())
    }
}

pub struct GetCountryUseCase<D: DirectoryRepository> {
    pub directories: D,
}

impl<D: DirectoryRepository> GetCountryUseCase<D> {
    pub async fn execute(&self, lang: &str, iso3: &str) -> Result<CountryDetails, IdentityError> {
        let country = self
            .directories
            .find_country(iso3)
            .await?
            .ok_or(IdentityError::CountryNotFound)?;
        Ok(CountryDetails::localize(&country, lang))
    }
}

/// Countries preloaded for one response, so that enriching a page of users
/// costs one lookup per distinct country.
#[derive(Debug, Default)]
pub struct Locator {
    countries: HashMap<String, Country>,
    lang: String,
}

impl Locator {
    pub async fn load<D: DirectoryRepository>(
        directories: &D,
        mut codes: Vec<&str>,
        lang: &str,
    ) -> Result<Self, IdentityError> {
        codes.sort_unstable();
        codes.dedup();

        let mut countries = HashMap::with_capacity(codes.len());
        for code in codes {
            if let Some(country) = directories.find_country(code).await? {
                countries.insert(code.to_owned(), country);
            }
        }
        Ok(Self {
            countries,
            lang: lang.to_owned(),
        })
    }

    pub fn country(&self, iso3: Option<&str>) -> Option<CountryInfo> {
        iso3.and_then(|code| self.countries.get(code))
            .map(|country| country.info(&self.lang))
    }

    pub fn location(&self, address: Option<&Address>) -> Location {
        let Some(address) = address else {
            return Location::default();
        };
        match self.countries.get(&address.country_code) {
            Some(country) => Location::resolve(
                country,
                address.state_id.as_deref(),
                address.city_id.as_deref(),
                &self.lang,
            ),
            None => Location::default(),
        }
    }
}
