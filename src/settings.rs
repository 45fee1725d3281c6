use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, path::PathBuf, str::FromStr};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Credentials of third-party services the site would talk to if the
/// mocked integrations were real. Only their presence is ever reported.
#[derive(Deserialize, Clone, Default)]
pub struct IntegrationKeys {
    #[serde(default)]
    pub sendgrid_api_key: Option<String>,
    #[serde(default)]
    pub twilio_sid: Option<String>,
    #[serde(default)]
    pub twilio_token: Option<String>,
    #[serde(default)]
    pub twilio_from: Option<String>,
    #[serde(default)]
    pub google_places_api_key: Option<String>,
    #[serde(default)]
    pub trading_api_key: Option<String>,
    #[serde(default)]
    pub alpha_vantage_api_key: Option<String>,
}

impl IntegrationKeys {
    pub fn sendgrid_configured(&self) -> bool {
        is_set(&self.sendgrid_api_key)
    }

    pub fn twilio_configured(&self) -> bool {
        is_set(&self.twilio_sid) && is_set(&self.twilio_token) && is_set(&self.twilio_from)
    }

    pub fn places_configured(&self) -> bool {
        is_set(&self.google_places_api_key)
    }

    pub fn trading_configured(&self) -> bool {
        is_set(&self.trading_api_key) || is_set(&self.alpha_vantage_api_key)
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_db_connect_retries")]
    pub db_connect_retries: u32,

    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_true")]
    pub trust_forwarded_headers: bool,

    #[serde(default = "default_contacts_file")]
    pub contacts_file: PathBuf,

    #[serde(default = "default_projects_file")]
    pub projects_file: PathBuf,

    #[serde(default)]
    pub relay_url: Option<String>,

    #[serde(default)]
    pub relay_cc: Option<String>,

    #[serde(default = "default_relay_timeout")]
    pub relay_timeout_secs: u64,

    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default)]
    pub scraping_enabled: bool,

    #[serde(default = "default_mock_delay_min")]
    pub mock_delay_min_ms: u64,

    #[serde(default = "default_mock_delay_max")]
    pub mock_delay_max_ms: u64,

    #[serde(default = "default_scrape_review_delay")]
    pub scrape_review_delay_ms: u64,

    #[serde(default = "default_evict_interval")]
    pub rate_limit_evict_interval_secs: u64,

    #[serde(default)]
    pub integrations: IntegrationKeys,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_db_connect_retries() -> u32 {
    3
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_true() -> bool {
    true
}
fn default_contacts_file() -> PathBuf {
    PathBuf::from("contacts.json")
}
fn default_projects_file() -> PathBuf {
    PathBuf::from("seed/projects.json")
}
fn default_relay_timeout() -> u64 {
    10
}
fn default_mock_delay_min() -> u64 {
    500
}
fn default_mock_delay_max() -> u64 {
    1500
}
fn default_scrape_review_delay() -> u64 {
    2000
}
fn default_evict_interval() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            database_url: None,
            db_connect_retries: default_db_connect_retries(),
            redis_url: None,
            cors_allowed_origins: default_cors_origins(),
            trust_forwarded_headers: default_true(),
            contacts_file: default_contacts_file(),
            projects_file: default_projects_file(),
            relay_url: None,
            relay_cc: None,
            relay_timeout_secs: default_relay_timeout(),
            admin_password: None,
            scraping_enabled: false,
            mock_delay_min_ms: default_mock_delay_min(),
            mock_delay_max_ms: default_mock_delay_max(),
            scrape_review_delay_ms: default_scrape_review_delay(),
            rate_limit_evict_interval_secs: default_evict_interval(),
            integrations: IntegrationKeys::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.apply_legacy_env();

        config.validate()?;
        Ok(config)
    }

    /// The site historically read a handful of unprefixed variables; they
    /// still fill any value the prefixed sources left empty.
    fn apply_legacy_env(&mut self) {
        fill_from_env(&mut self.database_url, "DATABASE_URL");
        fill_from_env(&mut self.redis_url, "REDIS_URL");
        fill_from_env(&mut self.relay_url, "FORMSPREE_URL");
        fill_from_env(&mut self.admin_password, "ADMIN_PASSWORD");

        if !self.scraping_enabled {
            self.scraping_enabled = env::var("ENABLE_SCRAPING").is_ok_and(|v| v == "true");
        }

        let keys = &mut self.integrations;
        fill_from_env(&mut keys.sendgrid_api_key, "SENDGRID_API_KEY");
        fill_from_env(&mut keys.twilio_sid, "TWILIO_SID");
        fill_from_env(&mut keys.twilio_token, "TWILIO_TOKEN");
        fill_from_env(&mut keys.twilio_from, "TWILIO_FROM");
        fill_from_env(&mut keys.google_places_api_key, "GOOGLE_PLACES_API_KEY");
        fill_from_env(&mut keys.trading_api_key, "TRADING_API_KEY");
        fill_from_env(&mut keys.alpha_vantage_api_key, "ALPHA_VANTAGE_API_KEY");
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.mock_delay_min_ms > self.mock_delay_max_ms {
            errors.push("MOCK_DELAY_MIN_MS must not exceed MOCK_DELAY_MAX_MS");
        }
        if self.relay_timeout_secs == 0 {
            errors.push("RELAY_TIMEOUT_SECS must be positive");
        }
        if self.scraping_enabled && !is_set(&self.admin_password) {
            errors.push("ADMIN_PASSWORD must be set when scraping is enabled");
        }
        if let Some(url) = self.relay_url.as_deref().filter(|u| !u.trim().is_empty()) {
            if url::Url::parse(url).is_err() {
                errors.push("RELAY_URL is not a valid URL");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn is_development(&self) -> bool {
        self.env == AppEnvironment::Development
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn relay_url(&self) -> Option<&str> {
        self.relay_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

fn fill_from_env(current: &mut Option<String>, env_key: &str) {
    if !is_set(current) {
        if let Ok(value) = env::var(env_key) {
            if !value.trim().is_empty() {
                *current = Some(value);
            }
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self.as_deref() {
            None | Some("") => "[MISSING]",
            Some(_) => "[REDACTED]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("redis_url", &self.redis_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_forwarded_headers", &self.trust_forwarded_headers)
            .field("contacts_file", &self.contacts_file)
            .field("projects_file", &self.projects_file)
            .field("relay_url", &self.relay_url.redact())
            .field("relay_timeout_secs", &self.relay_timeout_secs)
            .field("admin_password", &self.admin_password.redact())
            .field("scraping_enabled", &self.scraping_enabled)
            .field("mock_delay_ms", &(self.mock_delay_min_ms, self.mock_delay_max_ms))
            .finish()
    }
}

impl fmt::Debug for IntegrationKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationKeys")
            .field("sendgrid", &self.sendgrid_configured())
            .field("twilio", &self.twilio_configured())
            .field("google_places", &self.places_configured())
            .field("trading", &self.trading_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_origins_split_comma_separated_entries() {
        let config = AppConfig {
            cors_allowed_origins: vec!["https://a.dev, https://b.dev".into(), " ".into()],
            ..AppConfig::default()
        };

        assert_eq!(config.cors_origins(), vec!["https://a.dev", "https://b.dev"]);
    }

    #[test]
    fn production_rejects_wildcard_cors() {
        let config = AppConfig {
            env: AppEnvironment::Production,
            ..AppConfig::default()
        };

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Wildcard CORS"));
    }

    #[test]
    fn scraping_requires_admin_password() {
        let config = AppConfig {
            scraping_enabled: true,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            scraping_enabled: true,
            admin_password: Some("operator-secret".into()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_mock_delay_is_rejected() {
        let config = AppConfig {
            mock_delay_min_ms: 900,
            mock_delay_max_ms: 100,
            ..AppConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_urls_count_as_unset() {
        let config = AppConfig {
            database_url: Some("  ".into()),
            relay_url: Some(String::new()),
            ..AppConfig::default()
        };

        assert!(config.database_url().is_none());
        assert!(config.relay_url().is_none());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig {
            admin_password: Some("hunter2-hunter2".into()),
            database_url: Some("postgres://user:pw@localhost/db".into()),
            ..AppConfig::default()
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("user:pw"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn twilio_needs_all_three_credentials() {
        let keys = IntegrationKeys {
            twilio_sid: Some("sid".into()),
            twilio_token: Some("token".into()),
            ..IntegrationKeys::default()
        };
        assert!(!keys.twilio_configured());

        let keys = IntegrationKeys {
            twilio_from: Some("+84900000000".into()),
            ..keys
        };
        assert!(keys.twilio_configured());
    }
}
