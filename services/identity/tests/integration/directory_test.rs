use prestige_identity::error::IdentityError;
use prestige_identity::usecase::directory::{
    GetCountriesUseCase, GetCountryUseCase, GetLanguagesUseCase,
};

use crate::helpers::MockDirectoryRepo;

#[tokio::test]
async fn should_list_languages() {
    let usecase = GetLanguagesUseCase {
        directories: MockDirectoryRepo::default(),
    };
    let languages = usecase.execute().await.unwrap();
    assert_eq!(languages.len(), 2);
    assert_eq!(languages[0].code, "en");
}

#[tokio::test]
async fn should_localize_country_names_with_fallback() {
    let usecase = GetCountriesUseCase {
        directories: MockDirectoryRepo::default(),
    };

    let german = usecase.execute("de").await.unwrap();
    assert_eq!(german[0].name, "Frankreich");
    assert_eq!(german[1].name, "Deutschland");

    let spanish = usecase.execute("es").await.unwrap();
    assert_eq!(spanish[0].name, "France");
}

#[tokio::test]
async fn should_return_country_with_states_and_cities() {
    let usecase = GetCountryUseCase {
        directories: MockDirectoryRepo::default(),
    };

    let details = usecase.execute("it", "fra").await.unwrap();
    assert_eq!(details.country.iso2, "FR");
    assert_eq!(details.states[0].cities[0].name, "Parigi");

    let result = usecase.execute("en", "XXX").await;
    assert!(matches!(result, Err(IdentityError::CountryNotFound)));
}
