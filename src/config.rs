use crate::error::AppError;
use crate::store::postgrest::PostgrestConfig;

/// Runtime configuration, read once at startup.
///
/// Setting `POSTGREST_URL` switches the record store from the local SQLite
/// file to a remote PostgREST endpoint, in which case `POSTGREST_API_KEY`
/// must be set as well.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub postgrest: Option<PostgrestConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(3000);

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://unirev.db?mode=rwc".to_string());

        let postgrest = match std::env::var("POSTGREST_URL") {
            Ok(base_url) => {
                let api_key = std::env::var("POSTGREST_API_KEY").map_err(|_| {
                    AppError::Validation("POSTGREST_API_KEY is not set".to_string())
                })?;
                Some(PostgrestConfig { base_url, api_key })
            }
            Err(_) => None,
        };

        Ok(Self {
            port,
            database_url,
            postgrest,
        })
    }
}
