//! Process configuration — collaborator endpoints and host identity.
//!
//! Everything is read from the environment once at startup and immutable
//! afterwards. Every turn depends on valid collaborator endpoints, so a
//! missing required variable is fatal: `main` logs the error and exits
//! instead of serving requests with partial configuration.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default webhook listen port.
const DEFAULT_PORT: u16 = 3978;

/// Hosted intent-classification service configuration.
#[derive(Debug, Clone)]
pub struct LuisConfig {
    /// Application id of the published language model.
    pub app_id: String,
    /// Regional endpoint base, e.g. `https://westus.api.cognitive.microsoft.com`.
    pub endpoint: String,
    /// Subscription key sent with every query.
    pub endpoint_key: SecretString,
    /// Query the staging slot instead of the production slot.
    pub staging: bool,
    /// Ask the service to include all intents, not just the top one.
    pub verbose: bool,
}

/// Hosted knowledge-base service configuration.
#[derive(Debug, Clone)]
pub struct QnaConfig {
    /// Knowledge base id.
    pub kb_id: String,
    /// Endpoint host, e.g. `https://myhelpdesk.azurewebsites.net/qnamaker`.
    pub host: String,
    /// Endpoint key sent as the authorization header.
    pub endpoint_key: SecretString,
    /// Number of ranked answers to request. Only the top one is used.
    pub top: usize,
}

/// Identity of this bot on the host channel, used to authenticate outbound
/// replies. Absent in local-emulator use, where replies go out unauthenticated.
#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_password: SecretString,
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub luis: LuisConfig,
    pub qna: QnaConfig,
    pub credentials: Option<AppCredentials>,
    /// Webhook listen port.
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `LUIS_APP_ID`, `LUIS_ENDPOINT`, `LUIS_ENDPOINT_KEY`,
    /// `QNA_KB_ID`, `QNA_HOST`, `QNA_ENDPOINT_KEY`.
    /// Optional: `LUIS_STAGING`, `LUIS_VERBOSE`, `QNA_TOP`,
    /// `MICROSOFT_APP_ID` + `MICROSOFT_APP_PASSWORD` (both or neither),
    /// `PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let luis = LuisConfig {
            app_id: require_env("LUIS_APP_ID")?,
            endpoint: require_env("LUIS_ENDPOINT")?,
            endpoint_key: SecretString::from(require_env("LUIS_ENDPOINT_KEY")?),
            staging: env_flag("LUIS_STAGING", false),
            verbose: env_flag("LUIS_VERBOSE", true),
        };

        let qna = QnaConfig {
            kb_id: require_env("QNA_KB_ID")?,
            host: require_env("QNA_HOST")?,
            endpoint_key: SecretString::from(require_env("QNA_ENDPOINT_KEY")?),
            top: env_parsed("QNA_TOP", 1)?,
        };

        let app_id = std::env::var("MICROSOFT_APP_ID").ok().filter(|s| !s.is_empty());
        let app_password = std::env::var("MICROSOFT_APP_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty());
        let credentials = match (app_id, app_password) {
            (Some(app_id), Some(password)) => Some(AppCredentials {
                app_id,
                app_password: SecretString::from(password),
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "MICROSOFT_APP_ID".to_string(),
                    message: "MICROSOFT_APP_ID and MICROSOFT_APP_PASSWORD must be set together"
                        .to_string(),
                });
            }
        };

        Ok(Self {
            luis,
            qna,
            credentials,
            port: env_parsed("PORT", DEFAULT_PORT)?,
        })
    }
}

/// Read a required environment variable.
fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Read an optional boolean flag ("1"/"true"/"yes" count as true).
fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

/// Read an optional value parsed from its string form.
fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse {v:?}"),
        }),
        Err(_) => Ok(default),
    }
}
