/// Error returned when configuration cannot be loaded.
#[derive(Debug, thiserror::Error)]
#[error("failed to load config from environment: {0}")]
pub struct ConfigError(#[from] envy::Error);

/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-case
/// env vars. A `.env` file in the working directory, if present, is loaded
/// first and never overrides variables already set.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Ok(envy::from_env()?)
    }

    /// Load from explicit key/value pairs instead of the process environment.
    fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }
}
