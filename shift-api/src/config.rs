/// Configuration management for the API server
///
/// Settings are layered: built-in defaults, then an optional `shift.toml`
/// (or any format the `config` crate understands) in the working directory,
/// then `SHIFT__SECTION__KEY` environment variables. A `.env` file is loaded
/// first when present.
///
/// # Environment Variables
///
/// - `SHIFT__API__HOST`, `SHIFT__API__PORT`: bind address (default 0.0.0.0:8080)
/// - `SHIFT__API__CORS_ORIGINS`: comma-separated origins, `*` for any
/// - `SHIFT__API__PRODUCTION`: enables HSTS
/// - `SHIFT__API__LOG_JSON`: JSON log lines instead of the pretty format
/// - `DATABASE_URL`: PostgreSQL connection string; without it documents live in memory
/// - `JWT_SECRET`: token signing key, at least 32 characters (required)
/// - `SUGGESTIONS_API_KEY`: key for the text generation endpoint; without it
///   `/v1/suggestions` answers 503
///
/// # Example
///
/// ```no_run
/// use shift_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use shift_assistant::generators::http::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::env;
use std::time::Duration;

/// Shortest accepted JWT secret
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    pub jwt: JwtConfig,

    #[serde(default)]
    pub suggestions: SuggestionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Adds HSTS; only enable behind HTTPS
    #[serde(default)]
    pub production: bool,

    #[serde(default)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; `None` selects the in-memory store
    #[serde(default)]
    pub url: Option<String>,

    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    pub model: String,
    pub base_url: String,

    /// Upper bound on one suggestion request
    pub timeout_seconds: u64,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 60,
        }
    }
}

impl SuggestionsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Whether a generator can be built from these settings
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

impl Config {
    /// Loads `.env`, `shift.*` and the environment
    ///
    /// # Errors
    ///
    /// Fails when a value has the wrong type or [`Config::validate`] rejects
    /// the result.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::load("shift")
    }

    /// Loads settings with `file` (without extension) as the optional file layer
    pub fn load(file: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("api.host", "0.0.0.0")?
            .set_default("api.port", 8080)?
            .set_default("api.cors_origins", vec!["*"])?
            .set_default("api.production", false)?
            .set_default("api.log_json", false)?
            .set_default("database.max_connections", 10)?
            .set_default("suggestions.model", DEFAULT_MODEL)?
            .set_default("suggestions.base_url", DEFAULT_BASE_URL)?
            .set_default("suggestions.timeout_seconds", 60)?
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("SHIFT")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.cors_origins")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?
            .set_override_option("suggestions.api_key", env::var("SUGGESTIONS_API_KEY").ok())?
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        if self.suggestions.timeout_seconds == 0 {
            anyhow::bail!("suggestions.timeout_seconds must be positive");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
                log_json: false,
            },
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            suggestions: SuggestionsConfig::default(),
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = config();
        assert!(config.validate().is_ok());

        config.jwt.secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_suggestions_defaults() {
        let suggestions = SuggestionsConfig::default();
        assert!(!suggestions.is_configured());
        assert_eq!(suggestions.timeout(), Duration::from_secs(60));
        assert_eq!(suggestions.model, DEFAULT_MODEL);

        let empty_key = SuggestionsConfig {
            api_key: Some(String::new()),
            ..SuggestionsConfig::default()
        };
        assert!(!empty_key.is_configured());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = config();
        config.suggestions.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
