use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub genai: GenAiConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Local directory objects are written under.
    pub uploads_dir: String,
    /// Public URL prefix that maps onto `uploads_dir`.
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GenAiConfig {
    #[serde(default)]
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub image_model: Option<String>,
    pub text_model: Option<String>,
}

/// SMTP settings for certificate delivery. A missing credential is not a
/// startup error; it surfaces when a send is attempted.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub from_address: Option<String>,
    pub from_name: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://clubdesk.db")?
            .set_default("database.max_connections", 10)?
            .set_default("storage.uploads_dir", "uploads")?
            .set_default("storage.public_base_url", "http://localhost:8080/uploads")?
            .set_default("genai.enabled", false)?
            .set_default("email.smtp_port", 587)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with CLUBDESK__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("CLUBDESK").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://clubdesk.db".to_string(),
                max_connections: 10,
            },
            storage: StorageConfig {
                uploads_dir: "uploads".to_string(),
                public_base_url: "http://localhost:8080/uploads".to_string(),
            },
            genai: GenAiConfig::default(),
            email: EmailConfig::default(),
        }
    }
}
