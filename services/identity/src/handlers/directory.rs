use axum::extract::{Path, State};

use prestige_auth_types::headers::LangCode;
use prestige_core::envelope::ApiResponse;

use crate::domain::directory::{CountryDetails, CountryInfo, Language};
use crate::error::IdentityError;
use crate::state::{AppState, Repositories};
use crate::usecase::directory::{GetCountriesUseCase, GetCountryUseCase, GetLanguagesUseCase};

pub async fn get_languages<R: Repositories>(
    State(state): State<AppState<R>>,
) -> Result<ApiResponse<Vec<Language>>, IdentityError> {
    let usecase = GetLanguagesUseCase {
        directories: state.directory_repo(),
    };
    Ok(ApiResponse::ok(usecase.execute().await?))
}

pub async fn get_countries<R: Repositories>(
    lang: LangCode,
    State(state): State<AppState<R>>,
) -> Result<ApiResponse<Vec<CountryInfo>>, IdentityError> {
    let usecase = GetCountriesUseCase {
        directories: state.directory_repo(),
    };
    Ok(ApiResponse::ok(usecase.execute(lang.as_str()).await?))
}

/// Country with its states and cities, names localized by `x-lang-code`.
pub async fn get_country<R: Repositories>(
    lang: LangCode,
    State(state): State<AppState<R>>,
    Path(iso3): Path<String>,
) -> Result<ApiResponse<CountryDetails>, IdentityError> {
    let usecase = GetCountryUseCase {
        directories: state.directory_repo(),
    };
    let details = usecase.execute(lang.as_str(), iso3.trim()).await?;
    Ok(ApiResponse::ok(details))
}
